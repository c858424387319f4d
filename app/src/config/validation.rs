//! Option value validation.

use qr_engine::EcLevel;
use regex::Regex;
use std::sync::LazyLock;

use crate::services::generate::GenerateArgs;

static RE_HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$").unwrap()
});
static RE_SHORT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap());

/// Validate every generator option. Returns the first problem found.
pub fn validate_generate_args(args: &GenerateArgs) -> Result<(), String> {
    if args.data.trim().is_empty() {
        return Err("data: must not be empty".into());
    }
    validate_int_range("max_version", i64::from(args.max_version), 1, 40)?;
    validate_int_range("force_version", i64::from(args.force_version), 0, 40)?;
    validate_int_range("box_size", i64::from(args.box_size), 1, 200)?;
    validate_int_range("svg_scale", i64::from(args.svg_scale), 1, 200)?;
    validate_int_range("border", i64::from(args.border), 0, 32)?;
    validate_float_range("module_radius", args.module_radius, 0.0, 0.5)?;
    validate_float_range("logo_scale", args.logo_scale, 0.01, 1.0)?;
    validate_float_range("logo_pad", args.logo_pad, 0.0, 1.0)?;
    validate_float_range("eye_radius_scale", args.eye_radius_scale, 0.0, 0.5)?;
    validate_float_range("cutout_radius_scale", args.cutout_radius_scale, 0.0, 0.5)?;
    validate_hex_color(&args.color).map_err(|e| format!("color: {e}"))?;
    let level = parse_error_level(&args.error_level).map_err(|e| format!("error_level: {e}"))?;
    if args.micro && level == EcLevel::H {
        return Err("error_level: Micro QR has no level H, use l, m or q".into());
    }
    Ok(())
}

/// Map `h`/`q`/`m`/`l` (any case) to an error-correction level.
pub fn parse_error_level(value: &str) -> Result<EcLevel, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "h" => Ok(EcLevel::H),
        "q" => Ok(EcLevel::Q),
        "m" => Ok(EcLevel::M),
        "l" => Ok(EcLevel::L),
        _ => Err(format!("must be one of h, q, m, l (got {value:?})")),
    }
}

pub fn validate_hex_color(value: &str) -> Result<(), String> {
    if !RE_HEX_COLOR.is_match(value) {
        return Err("must be #rgb, #rrggbb or #rrggbbaa".into());
    }
    Ok(())
}

/// Short redirect path: 1-64 URL-safe characters, no slashes.
pub fn validate_short_path(value: &str) -> Result<(), String> {
    if !RE_SHORT_PATH.is_match(value) {
        return Err("must be 1-64 characters of [A-Za-z0-9_-]".into());
    }
    Ok(())
}

fn validate_int_range(name: &str, value: i64, min: i64, max: i64) -> Result<(), String> {
    if !(min..=max).contains(&value) {
        return Err(format!("{name}: must be between {min} and {max}"));
    }
    Ok(())
}

fn validate_float_range(name: &str, value: f32, min: f32, max: f32) -> Result<(), String> {
    if !(min..=max).contains(&value) {
        return Err(format!("{name}: must be between {min} and {max}"));
    }
    Ok(())
}
