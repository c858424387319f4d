//! Render style: colours, rounding, quiet zone and scale.

use image::Rgba;

use crate::{QrError, Result};

/// Off-white used for modules; pure white reads as grey on some print runs.
pub const DEFAULT_MODULE_COLOR: Rgba<u8> = Rgba([0xff, 0xff, 0xfa, 0xff]);

/// Canvas background. Light modules are never painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    Transparent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub module_color: Rgba<u8>,
    pub background: Background,
    /// Corner radius as a fraction of the module side (0 = square, 0.5 = circle).
    pub corner_radius_fraction: f32,
    pub quiet_zone_modules: u32,
    /// Pixels per module for raster output, output units per module for vector output.
    pub module_px: u32,
}

impl RenderStyle {
    /// Rounded off-white modules, 60 px each, two-module quiet zone.
    pub fn raster_default() -> Self {
        Self {
            module_color: DEFAULT_MODULE_COLOR,
            background: Background::Transparent,
            corner_radius_fraction: 0.35,
            quiet_zone_modules: 2,
            module_px: 60,
        }
    }

    /// Flat squares at 10 units per module.
    pub fn vector_default() -> Self {
        Self {
            corner_radius_fraction: 0.0,
            module_px: 10,
            ..Self::raster_default()
        }
    }

    pub fn with_color(mut self, color: Rgba<u8>) -> Self {
        self.module_color = color;
        self
    }

    pub fn with_corner_radius(mut self, fraction: f32) -> Self {
        self.corner_radius_fraction = fraction;
        self
    }

    pub fn with_quiet_zone(mut self, modules: u32) -> Self {
        self.quiet_zone_modules = modules;
        self
    }

    pub fn with_module_px(mut self, px: u32) -> Self {
        self.module_px = px;
        self
    }

    /// Corner radius fraction clamped to `[0, 0.5]`.
    pub fn corner_radius(&self) -> f32 {
        if self.corner_radius_fraction.is_nan() {
            return 0.0;
        }
        self.corner_radius_fraction.clamp(0.0, 0.5)
    }

    /// Module size with a floor of one pixel.
    pub fn module_size(&self) -> u32 {
        self.module_px.max(1)
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::raster_default()
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>> {
    let hex = s.trim().trim_start_matches('#');
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return Err(QrError::InvalidColor(s.to_string())),
    };
    let channel = |i: usize| {
        expanded
            .get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .ok_or_else(|| QrError::InvalidColor(s.to_string()))
    };
    let alpha = if expanded.len() == 8 { channel(6)? } else { 0xff };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

/// `#rrggbb` form of a colour, alpha dropped.
pub fn to_hex_rgb(color: Rgba<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_color_short_form() {
        assert_eq!(parse_hex_color("#fff").unwrap(), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn parse_hex_color_long_form() {
        assert_eq!(parse_hex_color("#fffffa").unwrap(), DEFAULT_MODULE_COLOR);
        assert_eq!(parse_hex_color("102030").unwrap(), Rgba([0x10, 0x20, 0x30, 255]));
    }

    #[test]
    fn parse_hex_color_with_alpha() {
        assert_eq!(parse_hex_color("#ffffffeb").unwrap(), Rgba([255, 255, 255, 0xeb]));
    }

    #[test]
    fn parse_hex_color_rejects_garbage() {
        assert!(parse_hex_color("#ggg").is_err());
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("").is_err());
    }

    #[test]
    fn corner_radius_is_clamped() {
        assert_eq!(RenderStyle::default().with_corner_radius(0.9).corner_radius(), 0.5);
        assert_eq!(RenderStyle::default().with_corner_radius(-1.0).corner_radius(), 0.0);
        assert_eq!(RenderStyle::default().with_corner_radius(f32::NAN).corner_radius(), 0.0);
    }

    #[test]
    fn vector_default_uses_flat_squares() {
        let style = RenderStyle::vector_default();
        assert_eq!(style.corner_radius(), 0.0);
        assert_eq!(style.module_color, RenderStyle::raster_default().module_color);
    }

    #[test]
    fn hex_rgb_drops_alpha() {
        assert_eq!(to_hex_rgb(Rgba([255, 255, 250, 10])), "#fffffa");
    }
}
