//! Output encoders: RGBA PNG bytes and self-contained SVG text.

use std::fmt::Write;
use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::geometry::{PathPrimitive, RasterImage, VectorImage};
use crate::style::to_hex_rgb;
use crate::Result;

/// Encode a raster image as an RGBA8 PNG.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgba8(image.pixels().clone())
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)?;
    Ok(png_bytes)
}

/// Encode a vector image as an SVG document.
///
/// Flat squares share a single compound path; rounded squares become
/// individual `<rect>` elements. No background is drawn.
pub fn encode_svg(image: &VectorImage) -> String {
    let vb = image.view_box;
    let fill = to_hex_rgb(image.fill);
    let opacity = if image.fill[3] < 255 {
        format!(" fill-opacity=\"{}\"", format_unit(f32::from(image.fill[3]) / 255.0))
    } else {
        String::new()
    };

    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" stroke=\"none\">",
        vb.width * image.scale,
        vb.height * image.scale,
        vb.width,
        vb.height
    );

    let mut squares = String::new();
    let mut rounded = String::new();
    for path in &image.paths {
        match *path {
            PathPrimitive::Square { x, y } => {
                if !squares.is_empty() {
                    squares.push(' ');
                }
                let _ = write!(squares, "M{x},{y}h1v1h-1z");
            }
            PathPrimitive::RoundedSquare { x, y, radius } => {
                let r = format_unit(radius);
                let _ = writeln!(
                    rounded,
                    "\t<rect x=\"{x}\" y=\"{y}\" width=\"1\" height=\"1\" rx=\"{r}\" ry=\"{r}\"/>"
                );
            }
        }
    }

    if !squares.is_empty() {
        let _ = writeln!(svg, "\t<path d=\"{squares}\" fill=\"{fill}\"{opacity}/>");
    }
    if !rounded.is_empty() {
        let _ = writeln!(svg, "\t<g fill=\"{fill}\"{opacity}>");
        svg.push_str(&rounded);
        svg.push_str("\t</g>\n");
    }
    svg.push_str("</svg>\n");
    svg
}

/// Fixed three-decimal formatting with trailing zeros trimmed.
fn format_unit(v: f32) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() { "0".into() } else { s.to_string() }
}
