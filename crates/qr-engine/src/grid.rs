//! Module grid provider backed by the `qrcode` crate.
//!
//! All symbol math (segmenting, error correction, masking) lives in
//! `qrcode`; this module only picks a version, checks limits and exposes
//! the resulting boolean grid.

use imageproc::rect::Rect;
use qrcode::types::QrError as EncodeError;
use qrcode::{Color, EcLevel, QrCode, Version};
use tracing::debug;

use crate::{QrError, Result, MAX_DATA_BYTES};

/// Side length of a finder pattern, in modules.
pub const FINDER_PATTERN_MODULES: usize = 7;

/// Finder pattern plus its one-module light separator.
pub const FINDER_ZONE_MODULES: usize = FINDER_PATTERN_MODULES + 1;

/// How the provider should choose the symbol version.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    pub ec_level: EcLevel,
    /// Upper bound for automatic version selection (1..=40).
    pub max_version: i16,
    /// Encode at exactly this version instead of the smallest fitting one.
    pub force_version: Option<i16>,
    /// Produce a Micro QR symbol (M1..M4).
    pub micro: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::H,
            max_version: 20,
            force_version: None,
            micro: false,
        }
    }
}

/// Immutable square grid of dark/light modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    size: usize,
    modules: Vec<bool>,
    version: Option<Version>,
}

impl ModuleGrid {
    /// Encode `data` into a module grid.
    pub fn encode(data: &str, opts: &EncodeOptions) -> Result<Self> {
        if data.is_empty() {
            return Err(QrError::InvalidData("data is empty".into()));
        }
        if data.len() > MAX_DATA_BYTES {
            return Err(QrError::InvalidData(format!(
                "data is {} bytes, the largest symbol holds {MAX_DATA_BYTES}",
                data.len()
            )));
        }

        let code = if opts.micro {
            encode_micro(data, opts.ec_level)?
        } else if let Some(version) = opts.force_version {
            if !(1..=40).contains(&version) {
                return Err(QrError::UnsupportedVersion(format!(
                    "version {version} is outside 1..=40"
                )));
            }
            QrCode::with_version(data, Version::Normal(version), opts.ec_level)
                .map_err(map_encode_error)?
        } else {
            let code = QrCode::with_error_correction_level(data, opts.ec_level)
                .map_err(map_encode_error)?;
            if let Version::Normal(v) = code.version() {
                if v > opts.max_version {
                    return Err(QrError::EncodingCapacity(format!(
                        "needs version {v}, maximum allowed is {}",
                        opts.max_version
                    )));
                }
            }
            code
        };

        debug!(
            version = ?code.version(),
            width = code.width(),
            ec_level = ?opts.ec_level,
            "Encoded module grid"
        );

        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();
        Ok(Self {
            size: code.width(),
            modules,
            version: Some(code.version()),
        })
    }

    /// Build a grid from row-major modules (`true` = dark).
    pub fn from_modules(size: usize, modules: Vec<bool>) -> Result<Self> {
        if size == 0 {
            return Err(QrError::InvalidGrid("grid is empty".into()));
        }
        if modules.len() != size * size {
            return Err(QrError::InvalidGrid(format!(
                "expected {} modules for a {size}x{size} grid, got {}",
                size * size,
                modules.len()
            )));
        }
        Ok(Self {
            size,
            modules,
            version: None,
        })
    }

    /// Modules per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Symbol version, when the grid came from the encoder.
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    pub fn is_micro(&self) -> bool {
        matches!(self.version, Some(Version::Micro(_)))
    }

    /// Whether the module at column `x`, row `y` is dark. Out of range is light.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.modules[y * self.size + x]
    }

    /// Iterate over the coordinates of all dark modules, row by row.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(|(i, _)| (i % self.size, i / self.size))
    }

    /// Finder zones of this grid (one for Micro QR, three otherwise).
    pub fn finder_zones(&self) -> Vec<FinderZone> {
        FinderZone::for_grid(self)
    }
}

fn encode_micro(data: &str, ec_level: EcLevel) -> Result<QrCode> {
    if ec_level == EcLevel::H {
        return Err(QrError::UnsupportedVersion(
            "Micro QR supports error levels L, M and Q only".into(),
        ));
    }
    let mut last_err = None;
    for v in 1..=4 {
        match QrCode::with_version(data, Version::Micro(v), ec_level) {
            Ok(code) => return Ok(code),
            Err(e) => last_err = Some(e),
        }
    }
    Err(QrError::EncodingCapacity(format!(
        "does not fit any Micro QR version at level {ec_level:?} ({})",
        last_err.map(|e| e.to_string()).unwrap_or_default()
    )))
}

fn map_encode_error(e: EncodeError) -> QrError {
    match e {
        EncodeError::DataTooLong => QrError::EncodingCapacity(e.to_string()),
        EncodeError::InvalidVersion => QrError::UnsupportedVersion(
            "version does not exist or does not support this error level".into(),
        ),
        other => QrError::InvalidData(other.to_string()),
    }
}

/// Corner a finder pattern sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
}

/// A finder pattern and its separator, in module coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinderZone {
    pub corner: Corner,
    /// Column of the zone's top-left module.
    pub x: usize,
    /// Row of the zone's top-left module.
    pub y: usize,
}

impl FinderZone {
    pub fn for_grid(grid: &ModuleGrid) -> Vec<FinderZone> {
        let n = grid.size();
        if grid.is_micro() || n < FINDER_ZONE_MODULES * 2 {
            return vec![FinderZone {
                corner: Corner::TopLeft,
                x: 0,
                y: 0,
            }];
        }
        let far = n - FINDER_ZONE_MODULES;
        vec![
            FinderZone { corner: Corner::TopLeft, x: 0, y: 0 },
            FinderZone { corner: Corner::TopRight, x: far, y: 0 },
            FinderZone { corner: Corner::BottomLeft, x: 0, y: far },
        ]
    }

    /// Top-left module of the 7x7 pattern itself (the separator sits on the inner side).
    pub fn pattern_origin(&self) -> (usize, usize) {
        match self.corner {
            Corner::TopLeft => (self.x, self.y),
            Corner::TopRight => (self.x + 1, self.y),
            Corner::BottomLeft => (self.x, self.y + 1),
        }
    }

    /// Whether module `(x, y)` falls inside this zone.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.x..self.x + FINDER_ZONE_MODULES).contains(&x)
            && (self.y..self.y + FINDER_ZONE_MODULES).contains(&y)
    }

    /// Zone bounds on a canvas with the given quiet zone and module size.
    pub fn pixel_rect(&self, quiet_zone: u32, module_px: u32) -> Rect {
        let side = FINDER_ZONE_MODULES as u32 * module_px;
        Rect::at(
            ((self.x as u32 + quiet_zone) * module_px) as i32,
            ((self.y as u32 + quiet_zone) * module_px) as i32,
        )
        .of_size(side, side)
    }
}

/// Rough level-H estimate of the version an ASCII URL needs.
///
/// Only used for density warnings; the encoder picks the real version.
pub fn estimate_min_version(data: &str) -> i16 {
    const THRESHOLDS: &[(i16, usize)] = &[
        (1, 9),
        (2, 16),
        (3, 26),
        (4, 36),
        (5, 68),
        (6, 86),
        (7, 108),
        (8, 124),
        (9, 157),
        (10, 189),
    ];
    let len = data.len();
    THRESHOLDS
        .iter()
        .find(|(_, capacity)| len <= *capacity)
        .map_or(10, |(version, _)| *version)
}
