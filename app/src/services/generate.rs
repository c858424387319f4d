//! QR artifact generation: styled PNG and flat SVG written to disk.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use qr_engine::compose::{CardStyle, LogoOverlay, PlateStyle};
use qr_engine::grid::estimate_min_version;
use qr_engine::{
    encode_png, encode_svg, parse_hex_color, render_vector, EncodeOptions, ModuleGrid, Pipeline,
    RenderStyle, Stage,
};
use tracing::{info, warn};

use crate::config::defaults;
use crate::config::validation::{parse_error_level, validate_generate_args};

/// Everything needed to produce the PNG and SVG artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateArgs {
    pub data: String,
    /// Centred logo; `None` renders without one.
    pub logo: Option<PathBuf>,
    pub png_out: PathBuf,
    pub svg_out: PathBuf,
    pub max_version: i16,
    /// 0 = automatic.
    pub force_version: i16,
    pub error_level: String,
    pub color: String,
    pub card: bool,
    pub box_size: u32,
    pub svg_scale: u32,
    pub plate: bool,
    pub border: u32,
    pub module_radius: f32,
    pub logo_scale: f32,
    pub logo_pad: f32,
    pub eye_radius_scale: f32,
    pub logo_cutout: bool,
    pub cutout_radius_scale: f32,
    pub micro: bool,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            data: defaults::DATA.into(),
            logo: Some(PathBuf::from(defaults::LOGO)),
            png_out: PathBuf::from(defaults::PNG_OUT),
            svg_out: PathBuf::from(defaults::SVG_OUT),
            max_version: defaults::MAX_VERSION,
            force_version: defaults::FORCE_VERSION,
            error_level: defaults::ERROR_LEVEL.into(),
            color: defaults::COLOR.into(),
            card: false,
            box_size: defaults::BOX_SIZE,
            svg_scale: defaults::SVG_SCALE,
            plate: false,
            border: defaults::BORDER,
            module_radius: defaults::MODULE_RADIUS,
            logo_scale: defaults::LOGO_SCALE,
            logo_pad: defaults::LOGO_PAD,
            eye_radius_scale: defaults::EYE_RADIUS_SCALE,
            logo_cutout: true,
            cutout_radius_scale: defaults::CUTOUT_RADIUS_SCALE,
            micro: false,
        }
    }
}

/// Paths of the written artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub png: PathBuf,
    pub svg: PathBuf,
}

/// Validate, warn about contrast and density, then write both artifacts.
pub fn generate(args: &GenerateArgs) -> Result<Generated> {
    validate_generate_args(args).map_err(anyhow::Error::msg)?;
    warn_contrast(args.card);
    warn_density(args);

    let png = make_png(args)?;
    let svg = make_svg(args)?;
    info!(png = %png.display(), svg = %svg.display(), "Generated QR artifacts");
    Ok(Generated { png, svg })
}

/// Render the styled raster symbol and write it as a transparent PNG.
pub fn make_png(args: &GenerateArgs) -> Result<PathBuf> {
    ensure_out_dir(&args.png_out)?;
    let grid = encode_grid(args)?;
    let color = parse_hex_color(&args.color)?;

    let pipeline = if args.micro {
        // Micro symbols are too small for rounding or a logo.
        let style = RenderStyle::raster_default()
            .with_color(color)
            .with_corner_radius(0.0)
            .with_quiet_zone(args.border)
            .with_module_px((args.box_size / 2).max(defaults::MICRO_MIN_BOX_SIZE));
        Pipeline::new(style)
    } else {
        let style = RenderStyle::raster_default()
            .with_color(color)
            .with_corner_radius(args.module_radius)
            .with_quiet_zone(args.border)
            .with_module_px(args.box_size);
        build_stages(args, Pipeline::new(style))?
    };
    check_png_side(&grid, &pipeline)?;

    let image = pipeline.run(&grid)?;
    let bytes = encode_png(&image)?;
    std::fs::write(&args.png_out, bytes)
        .with_context(|| format!("failed to write {}", args.png_out.display()))?;
    Ok(args.png_out.clone())
}

/// Render the flat vector symbol and write it as SVG.
pub fn make_svg(args: &GenerateArgs) -> Result<PathBuf> {
    ensure_out_dir(&args.svg_out)?;
    let grid = encode_grid(args)?;
    let style = RenderStyle::vector_default()
        .with_color(parse_hex_color(&args.color)?)
        .with_quiet_zone(args.border)
        .with_module_px(args.svg_scale);
    let svg = encode_svg(&render_vector(&grid, &style));
    std::fs::write(&args.svg_out, svg)
        .with_context(|| format!("failed to write {}", args.svg_out.display()))?;
    Ok(args.svg_out.clone())
}

fn encode_grid(args: &GenerateArgs) -> Result<ModuleGrid> {
    let opts = EncodeOptions {
        ec_level: parse_error_level(&args.error_level).map_err(anyhow::Error::msg)?,
        max_version: args.max_version,
        force_version: (args.force_version > 0).then_some(args.force_version),
        micro: args.micro,
    };
    let grid = ModuleGrid::encode(&args.data, &opts).with_context(|| {
        if opts.force_version.is_some() {
            "data too long for the forced version; raise force_version or use a shorter URL"
        } else {
            "failed to encode data"
        }
    })?;
    Ok(grid)
}

fn build_stages(args: &GenerateArgs, mut pipeline: Pipeline) -> Result<Pipeline> {
    if args.eye_radius_scale > 0.0 {
        pipeline = pipeline.with_stage(Stage::RoundFinderCorners {
            radius_fraction: args.eye_radius_scale,
        });
    }
    if args.card {
        pipeline = pipeline.with_stage(Stage::Card(CardStyle::default()));
    }

    let Some(logo_path) = &args.logo else {
        return Ok(pipeline);
    };
    if !logo_path.exists() {
        warn!(path = %logo_path.display(), "Logo not found, rendering without logo");
        return Ok(pipeline);
    }

    let mut logo = LogoOverlay::from_path(logo_path)?.with_width_fraction(args.logo_scale);
    if args.plate {
        logo = logo.with_plate(PlateStyle {
            padding_fraction: args.logo_pad,
            ..PlateStyle::default()
        });
    }
    if args.logo_cutout {
        pipeline = pipeline.with_stage(Stage::Cutout {
            radius_fraction: args.cutout_radius_scale,
        });
    }
    Ok(pipeline.with_stage(Stage::Logo(logo)))
}

/// Reject canvases too large to allocate before any pixel is drawn.
fn check_png_side(grid: &ModuleGrid, pipeline: &Pipeline) -> Result<()> {
    let style = &pipeline.style;
    let symbol = (grid.size() as u64 + 2 * u64::from(style.quiet_zone_modules))
        * u64::from(style.module_size());
    let card_pad = pipeline.stages().iter().find_map(|stage| match stage {
        Stage::Card(card) => Some((symbol as f32 * card.padding_fraction.max(0.0)).round() as u64),
        _ => None,
    });
    let side = symbol + 2 * card_pad.unwrap_or(0);
    if side > u64::from(defaults::MAX_PNG_SIDE) {
        bail!(
            "PNG would be {side} px wide, the limit is {} px; lower box_size or border",
            defaults::MAX_PNG_SIDE
        );
    }
    Ok(())
}

fn ensure_out_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    Ok(())
}

/// White modules on a transparent background vanish on light surfaces.
pub fn warn_contrast(card: bool) {
    if !card {
        warn!(
            "Light foreground: place the code on a dark background, \
             or pass --card to put a card behind it"
        );
    }
}

fn warn_density(args: &GenerateArgs) {
    let estimated = estimate_min_version(&args.data);
    if !args.micro && estimated > args.max_version {
        warn!(
            estimated,
            max = args.max_version,
            "Long data, the symbol may get dense; use a shorter link"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("qr-generate-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn args_in(dir: &Path) -> GenerateArgs {
        GenerateArgs {
            logo: None,
            png_out: dir.join("out/qr.png"),
            svg_out: dir.join("out/qr.svg"),
            box_size: 8,
            ..Default::default()
        }
    }

    fn write_logo(dir: &Path) -> PathBuf {
        let path = dir.join("logo.png");
        RgbaImage::from_pixel(32, 32, Rgba([10, 120, 200, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn generate_writes_both_artifacts() {
        let dir = temp_dir();
        let out = generate(&args_in(&dir)).unwrap();
        assert!(out.png.exists());
        let svg = std::fs::read_to_string(&out.svg).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("fill=\"#fffffa\""));
    }

    #[test]
    fn png_is_transparent_rgba() {
        let dir = temp_dir();
        let path = make_png(&args_in(&dir)).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!(img.color(), image::ColorType::Rgba8);
        assert_eq!(img.to_rgba8().get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn missing_logo_renders_without_logo() {
        let dir = temp_dir();
        let args = GenerateArgs {
            logo: Some(dir.join("nope.png")),
            ..args_in(&dir)
        };
        let with_missing = std::fs::read(make_png(&args).unwrap()).unwrap();
        let plain = std::fs::read(make_png(&args_in(&dir)).unwrap()).unwrap();
        assert_eq!(with_missing, plain);
    }

    #[test]
    fn corrupt_logo_is_an_error() {
        let dir = temp_dir();
        let logo = dir.join("logo.png");
        std::fs::write(&logo, b"not an image").unwrap();
        let args = GenerateArgs {
            logo: Some(logo),
            ..args_in(&dir)
        };
        let err = make_png(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to load logo"), "{err:#}");
    }

    #[test]
    fn logo_lands_in_the_centre() {
        let dir = temp_dir();
        let args = GenerateArgs {
            logo: Some(write_logo(&dir)),
            plate: true,
            ..args_in(&dir)
        };
        let img = image::open(make_png(&args).unwrap()).unwrap().to_rgba8();
        let (cx, cy) = (img.width() / 2, img.height() / 2);
        assert_eq!(img.get_pixel(cx, cy), &Rgba([10, 120, 200, 255]));
    }

    #[test]
    fn card_enlarges_png() {
        let dir = temp_dir();
        let plain = image::open(make_png(&args_in(&dir)).unwrap()).unwrap();
        let args = GenerateArgs {
            card: true,
            ..args_in(&dir)
        };
        let carded = image::open(make_png(&args).unwrap()).unwrap();
        assert!(carded.width() > plain.width());
    }

    #[test]
    fn micro_mode_makes_a_small_symbol() {
        let dir = temp_dir();
        let args = GenerateArgs {
            data: "12345".into(),
            error_level: "l".into(),
            micro: true,
            ..args_in(&dir)
        };
        let img = image::open(make_png(&args).unwrap()).unwrap();
        // at most 17 modules + 2x2 quiet zone at 8 px
        assert!(img.width() <= (17 + 4) * 8);
    }

    #[test]
    fn forced_version_too_small_fails() {
        let dir = temp_dir();
        let args = GenerateArgs {
            data: "https://example.com/this/does/not/fit".into(),
            force_version: 1,
            ..args_in(&dir)
        };
        let err = make_png(&args).unwrap_err();
        assert!(err.to_string().contains("forced version"), "{err:#}");
    }

    #[test]
    fn oversized_png_is_an_error() {
        let dir = temp_dir();
        let args = GenerateArgs {
            data: "hi".into(),
            force_version: 40,
            border: 32,
            box_size: 200,
            ..args_in(&dir)
        };
        assert_eq!(validate_generate_args(&args), Ok(()));
        let err = make_png(&args).unwrap_err();
        assert!(err.to_string().contains("limit is 16384 px"), "{err:#}");
        assert!(!args.png_out.exists());
    }

    #[test]
    fn card_margin_counts_towards_png_limit() {
        // 181 modules + 2x2 quiet zone at 85 px is 15725 px, about 17600 px with the card
        let args = GenerateArgs {
            data: "hi".into(),
            force_version: 40,
            box_size: 85,
            logo: None,
            ..Default::default()
        };
        let grid = encode_grid(&args).unwrap();
        let style = RenderStyle::raster_default().with_module_px(args.box_size);
        assert!(check_png_side(&grid, &Pipeline::new(style)).is_ok());

        let carded = Pipeline::new(style).with_stage(Stage::Card(CardStyle::default()));
        let err = check_png_side(&grid, &carded).unwrap_err();
        assert!(err.to_string().contains("limit is 16384 px"), "{err:#}");
    }

    #[test]
    fn invalid_args_are_rejected_before_writing() {
        let dir = temp_dir();
        let args = GenerateArgs {
            color: "white".into(),
            ..args_in(&dir)
        };
        assert!(generate(&args).is_err());
        assert!(!args.png_out.exists());
    }

    #[test]
    fn svg_is_identical_across_runs() {
        let dir = temp_dir();
        let args = args_in(&dir);
        let a = std::fs::read_to_string(make_svg(&args).unwrap()).unwrap();
        let b = std::fs::read_to_string(make_svg(&args).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
