//! Raster composition: logo and plate overlay, backing card, cutout and
//! finder-corner rounding.
//!
//! Every stage blends with straight-alpha "over".

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use imageproc::rect::Rect;
use tracing::{debug, warn};

use crate::geometry::{fill_rounded_rect, rounded_rect_coverage, Area, RasterImage, RenderedImage};
use crate::grid::{FinderZone, FINDER_PATTERN_MODULES};
use crate::{QrError, Result, RECOMMENDED_MAX_LOGO_FRACTION};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Rounded backing plate drawn behind the logo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateStyle {
    pub color: Rgba<u8>,
    /// Corner radius as a fraction of the plate's shorter side.
    pub corner_radius_fraction: f32,
    /// Margin around the logo as a fraction of the logo's longer side.
    pub padding_fraction: f32,
}

impl Default for PlateStyle {
    fn default() -> Self {
        Self {
            color: Rgba([255, 255, 255, 234]),
            corner_radius_fraction: 0.25,
            padding_fraction: 0.10,
        }
    }
}

/// Logo placed at the centre of the symbol.
#[derive(Debug, Clone)]
pub struct LogoOverlay {
    pub image: DynamicImage,
    /// Logo width as a fraction of the canvas width.
    pub max_width_fraction: f32,
    pub plate: Option<PlateStyle>,
}

impl LogoOverlay {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            max_width_fraction: 0.20,
            plate: None,
        }
    }

    /// Decode a logo from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| QrError::LogoLoad(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), w = image.width(), h = image.height(), "Loaded logo");
        Ok(Self::new(image))
    }

    /// Decode a logo from encoded image bytes (PNG, JPEG).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes).map_err(|e| QrError::LogoLoad(e.to_string()))?;
        Ok(Self::new(image))
    }

    pub fn with_width_fraction(mut self, fraction: f32) -> Self {
        self.max_width_fraction = fraction;
        self
    }

    pub fn with_plate(mut self, plate: PlateStyle) -> Self {
        self.plate = Some(plate);
        self
    }

    /// Wider than scanners reliably tolerate, even at level H.
    pub fn exceeds_recommended_width(&self) -> bool {
        self.max_width_fraction > RECOMMENDED_MAX_LOGO_FRACTION
    }
}

/// Semi-transparent card behind the whole symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardStyle {
    pub color: Rgba<u8>,
    /// Margin around the symbol as a fraction of its shorter side.
    pub padding_fraction: f32,
    /// Corner radius as a fraction of the card's shorter side.
    pub corner_radius_fraction: f32,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            color: Rgba([255, 255, 255, 216]),
            padding_fraction: 0.06,
            corner_radius_fraction: 0.10,
        }
    }
}

/// Composite `logo` (and its plate) at the centre of a raster image.
///
/// Vector images carry no pixels to composite onto and are rejected.
pub fn overlay(image: RenderedImage, logo: &LogoOverlay) -> Result<RasterImage> {
    let RenderedImage::Raster(mut raster) = image else {
        return Err(QrError::UnsupportedFormat);
    };
    composite_logo(&mut raster, logo);
    Ok(raster)
}

/// Draw plate then logo; returns the box they cover.
pub(crate) fn composite_logo(raster: &mut RasterImage, logo: &LogoOverlay) -> Rect {
    if logo.exceeds_recommended_width() {
        warn!(
            fraction = logo.max_width_fraction,
            recommended = RECOMMENDED_MAX_LOGO_FRACTION,
            "Logo is wider than recommended, scanning may be unreliable"
        );
    }

    let (w, h) = (raster.width(), raster.height());
    let target = ((w as f32 * logo.max_width_fraction.max(0.0)).round() as u32).max(1);
    // Longer side becomes `target`; aspect ratio is kept.
    let scaled = logo
        .image
        .resize(target, target, FilterType::Lanczos3)
        .to_rgba8();
    let (lw, lh) = scaled.dimensions();
    let lx = w.saturating_sub(lw) / 2;
    let ly = h.saturating_sub(lh) / 2;

    let mut covered = Rect::at(lx as i32, ly as i32).of_size(lw, lh);

    if let Some(plate) = &logo.plate {
        let pad = (lw.max(lh) as f32 * plate.padding_fraction.max(0.0)).round() as u32;
        let (pw, ph) = (lw + 2 * pad, lh + 2 * pad);
        let area = Area::new(lx as f32 - pad as f32, ly as f32 - pad as f32, pw as f32, ph as f32);
        let radius = pw.min(ph) as f32 * plate.corner_radius_fraction;
        fill_rounded_rect(raster.pixels_mut(), area, radius, plate.color);
        covered = Rect::at(area.x as i32, area.y as i32).of_size(pw, ph);
    }

    overlay_image(raster.pixels_mut(), &scaled, lx, ly);

    debug!(lw, lh, lx, ly, plate = logo.plate.is_some(), "Composited logo");
    covered
}

/// Alpha-composite `top` onto `base` with its top-left corner at `(x, y)`.
///
/// Pixels falling outside `base` are dropped.
pub fn overlay_image(base: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let target_x = x + dx;
        let target_y = y + dy;
        if target_x < base.width() && target_y < base.height() {
            let bg = base.get_pixel_mut(target_x, target_y);
            *bg = blend_over(*bg, *pixel);
        }
    }
}

/// Put the symbol on a rounded card, growing the canvas by the card padding.
pub fn apply_card(raster: RasterImage, card: &CardStyle) -> RasterImage {
    let (w, h) = (raster.width(), raster.height());
    let pad = (w.min(h) as f32 * card.padding_fraction.max(0.0)).round() as u32;
    let (cw, ch) = (w + 2 * pad, h + 2 * pad);

    let mut canvas = RgbaImage::new(cw, ch);
    let radius = cw.min(ch) as f32 * card.corner_radius_fraction;
    fill_rounded_rect(&mut canvas, Area::new(0.0, 0.0, cw as f32, ch as f32), radius, card.color);
    overlay_image(&mut canvas, raster.pixels(), pad, pad);

    debug!(pad, cw, ch, "Applied backing card");
    RasterImage::from_pixels(canvas)
}

/// Clear a centred disc to fully transparent.
pub fn apply_cutout(raster: &mut RasterImage, radius: u32) {
    let center = ((raster.width() / 2) as i32, (raster.height() / 2) as i32);
    // Drawing replaces pixels outright, no blending.
    draw_filled_circle_mut(raster.pixels_mut(), center, radius as i32, TRANSPARENT);
    debug!(radius, "Cleared logo cutout");
}

/// Cutout radius covering at least the logo's half-width.
pub fn cutout_radius(side: u32, cutout_fraction: f32, logo_fraction: Option<f32>) -> u32 {
    let base = (side as f32 * cutout_fraction.max(0.0)).round() as u32;
    let logo = logo_fraction.map_or(0, |f| (side as f32 * f.max(0.0) * 0.52).round() as u32);
    base.max(logo)
}

/// Round the outer corners of each 7x7 finder pattern by clearing alpha
/// outside a rounded square. Colours are untouched.
pub fn round_finder_corners(
    raster: &mut RasterImage,
    zones: &[FinderZone],
    quiet_zone: u32,
    module_px: u32,
    radius_fraction: f32,
) {
    let eye_px = FINDER_PATTERN_MODULES as u32 * module_px;
    let radius = eye_px as f32 * radius_fraction.clamp(0.0, 0.5);
    if radius <= 0.0 {
        return;
    }
    let pixels = raster.pixels_mut();
    for zone in zones {
        let (mx, my) = zone.pattern_origin();
        let x0 = (mx as u32 + quiet_zone) * module_px;
        let y0 = (my as u32 + quiet_zone) * module_px;
        let area = Area::new(x0 as f32, y0 as f32, eye_px as f32, eye_px as f32);
        for y in y0..(y0 + eye_px).min(pixels.height()) {
            for x in x0..(x0 + eye_px).min(pixels.width()) {
                let keep = rounded_rect_coverage(area, radius, x as f32 + 0.5, y as f32 + 0.5);
                if keep < 1.0 {
                    let p = pixels.get_pixel_mut(x, y);
                    p[3] = (f32::from(p[3]) * keep).round() as u8;
                }
            }
        }
    }
    debug!(radius, zones = zones.len(), "Rounded finder corners");
}

/// Straight-alpha "over": `src` on top of `dst`.
pub fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match (dst[3], src[3]) {
        (_, 255) | (0, _) => return src,
        (_, 0) => return dst,
        _ => {}
    }
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |i: usize| {
        let c = (f32::from(src[i]) * sa + f32::from(dst[i]) * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
