//! Generate the white-on-transparent QR artifacts (PNG + SVG).
//!
//! ```bash
//! make-qr --data http://qr.example.com/x --logo assets/logo.png --plate
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use qr_redirect_lib::config::defaults;
use qr_redirect_lib::services::generate::{generate, GenerateArgs};

#[derive(Parser)]
#[command(name = "make-qr")]
#[command(about = "Generate a white QR code on a transparent background, with a centred logo")]
struct Args {
    /// Data to encode (a short URL is recommended).
    #[arg(long, default_value = defaults::DATA)]
    data: String,

    /// Centred logo (PNG). Pass an empty string for no logo.
    #[arg(long, default_value = defaults::LOGO)]
    logo: String,

    /// PNG output path.
    #[arg(long, default_value = defaults::PNG_OUT)]
    png: PathBuf,

    /// SVG output path.
    #[arg(long, default_value = defaults::SVG_OUT)]
    svg: PathBuf,

    /// Maximum QR version for automatic selection, to limit density.
    #[arg(long, default_value_t = defaults::MAX_VERSION)]
    max_version: i16,

    /// Force the QR version (0 = automatic). Fails if the data does not fit.
    #[arg(long, default_value_t = defaults::FORCE_VERSION)]
    force_version: i16,

    /// Error-correction level (h/q/m/l). H is recommended with a logo.
    #[arg(long, default_value = defaults::ERROR_LEVEL)]
    error_level: String,

    /// Module colour (#rgb, #rrggbb or #rrggbbaa).
    #[arg(long, default_value = defaults::COLOR)]
    color: String,

    /// Put a rounded semi-transparent white card behind the code.
    #[arg(long)]
    card: bool,

    /// Pixels per module in the PNG.
    #[arg(long, default_value_t = defaults::BOX_SIZE)]
    box_size: u32,

    /// SVG units per module.
    #[arg(long, default_value_t = defaults::SVG_SCALE)]
    svg_scale: u32,

    /// Draw a rounded white plate behind the logo.
    #[arg(long)]
    plate: bool,

    /// Quiet zone in modules.
    #[arg(long, default_value_t = defaults::BORDER)]
    border: u32,

    /// PNG module rounding (0 = square, 0.5 = dot).
    #[arg(long, default_value_t = defaults::MODULE_RADIUS)]
    module_radius: f32,

    /// Logo width relative to the code width (0.18-0.22 advised).
    #[arg(long, default_value_t = defaults::LOGO_SCALE)]
    logo_scale: f32,

    /// Plate margin around the logo (0.08-0.12 advised).
    #[arg(long, default_value_t = defaults::LOGO_PAD)]
    logo_pad: f32,

    /// Finder corner rounding relative to 7 modules (0-0.5).
    #[arg(long, default_value_t = defaults::EYE_RADIUS_SCALE)]
    eye_radius_scale: f32,

    /// Keep the modules behind the logo instead of clearing a disc.
    #[arg(long)]
    no_cutout: bool,

    /// Cutout radius relative to the code width.
    #[arg(long, default_value_t = defaults::CUTOUT_RADIUS_SCALE)]
    cutout_radius_scale: f32,

    /// Generate a Micro QR (no rounding, no logo).
    #[arg(long)]
    micro: bool,
}

impl From<Args> for GenerateArgs {
    fn from(a: Args) -> Self {
        Self {
            data: a.data,
            logo: (!a.logo.is_empty()).then(|| PathBuf::from(a.logo)),
            png_out: a.png,
            svg_out: a.svg,
            max_version: a.max_version,
            force_version: a.force_version,
            error_level: a.error_level,
            color: a.color,
            card: a.card,
            box_size: a.box_size,
            svg_scale: a.svg_scale,
            plate: a.plate,
            border: a.border,
            module_radius: a.module_radius,
            logo_scale: a.logo_scale,
            logo_pad: a.logo_pad,
            eye_radius_scale: a.eye_radius_scale,
            logo_cutout: !a.no_cutout,
            cutout_radius_scale: a.cutout_radius_scale,
            micro: a.micro,
        }
    }
}

fn main() -> ExitCode {
    qr_redirect_lib::init_tracing();

    let args = GenerateArgs::from(Args::parse());
    match generate(&args) {
        Ok(out) => {
            println!("PNG: {}", out.png.display());
            println!("SVG: {}", out.svg.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Generation failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
