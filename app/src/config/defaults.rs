//! Default values for the generator CLI and the redirect server.

/// Short redirect URL encoded by default.
pub const DATA: &str = "http://localhost:8000/x";
pub const LOGO: &str = "assets/logo.png";
pub const PNG_OUT: &str = "out/qr_white.png";
pub const SVG_OUT: &str = "out/qr_white.svg";

/// Module colour (off-white).
pub const COLOR: &str = "#fffffa";

/// Version cap for automatic selection; keeps the symbol from getting dense.
pub const MAX_VERSION: i16 = 20;
/// 0 = pick the smallest version that fits.
pub const FORCE_VERSION: i16 = 0;
pub const ERROR_LEVEL: &str = "h";

/// Pixels per module in the PNG.
pub const BOX_SIZE: u32 = 60;
/// SVG output units per module.
pub const SVG_SCALE: u32 = 10;
/// Quiet zone in modules; 6-8 gives a more airy look.
pub const BORDER: u32 = 2;
/// PNG module rounding (0 = square, 0.5 = dot).
pub const MODULE_RADIUS: f32 = 0.35;

/// Logo width as a fraction of the symbol width (0.18-0.22 advised).
pub const LOGO_SCALE: f32 = 0.20;
/// Plate margin as a fraction of the logo (0.08-0.12 advised).
pub const LOGO_PAD: f32 = 0.10;
/// Finder corner rounding as a fraction of 7 modules.
pub const EYE_RADIUS_SCALE: f32 = 0.0;
/// Cutout radius as a fraction of the symbol width.
pub const CUTOUT_RADIUS_SCALE: f32 = 0.10;

/// Micro QR PNGs use at least this many pixels per module.
pub const MICRO_MIN_BOX_SIZE: u32 = 8;

/// Largest PNG side, in pixels, including the card margin.
pub const MAX_PNG_SIDE: u32 = 16384;

pub const SERVER_HOST: &str = "0.0.0.0";
pub const SERVER_PORT: u16 = 8000;
pub const REDIRECT_FILE: &str = "redirect.json";
pub const REDIRECT_PATH: &str = "x";
