//! Geometry renderer: module grid to rounded raster pixels or vector paths.

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::compose::blend_over;
use crate::grid::ModuleGrid;
use crate::style::{Background, RenderStyle};

/// Composited RGBA canvas (straight alpha).
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    pub fn from_pixels(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }
}

/// Logical coordinate space of a vector image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewBox {
    pub width: u32,
    pub height: u32,
}

/// One dark module in vector form, in module units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathPrimitive {
    Square { x: u32, y: u32 },
    RoundedSquare { x: u32, y: u32, radius: f32 },
}

impl PathPrimitive {
    pub fn origin(&self) -> (u32, u32) {
        match *self {
            PathPrimitive::Square { x, y } | PathPrimitive::RoundedSquare { x, y, .. } => (x, y),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorImage {
    pub paths: Vec<PathPrimitive>,
    pub view_box: ViewBox,
    pub fill: Rgba<u8>,
    /// Output units per module, used for the document's width/height.
    pub scale: u32,
}

/// Which variant `render` should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Raster,
    Vector,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedImage {
    Raster(RasterImage),
    Vector(VectorImage),
}

impl RenderedImage {
    pub fn kind(&self) -> OutputKind {
        match self {
            RenderedImage::Raster(_) => OutputKind::Raster,
            RenderedImage::Vector(_) => OutputKind::Vector,
        }
    }
}

/// Render `grid` in the requested output form.
pub fn render(grid: &ModuleGrid, style: &RenderStyle, kind: OutputKind) -> RenderedImage {
    match kind {
        OutputKind::Raster => RenderedImage::Raster(render_raster(grid, style)),
        OutputKind::Vector => RenderedImage::Vector(render_vector(grid, style)),
    }
}

/// Draw every dark module as an anti-aliased rounded square on a transparent canvas.
///
/// Light modules and the quiet zone stay `(0, 0, 0, 0)`.
pub fn render_raster(grid: &ModuleGrid, style: &RenderStyle) -> RasterImage {
    let module = style.module_size();
    let quiet = style.quiet_zone_modules;
    let side = (grid.size() as u32 + 2 * quiet) * module;
    let radius = style.corner_radius() * module as f32;

    debug!(
        modules = grid.size(),
        side,
        module_px = module,
        radius,
        "Rendering raster symbol"
    );

    let mut canvas = match style.background {
        Background::Transparent => RgbaImage::new(side, side),
    };
    for (x, y) in grid.dark_modules() {
        let left = (x as u32 + quiet) * module;
        let top = (y as u32 + quiet) * module;
        fill_rounded_rect(
            &mut canvas,
            Area::new(left as f32, top as f32, module as f32, module as f32),
            radius,
            style.module_color,
        );
    }
    RasterImage::from_pixels(canvas)
}

/// Emit one primitive per dark module in a `size + 2 * quiet_zone` viewBox.
pub fn render_vector(grid: &ModuleGrid, style: &RenderStyle) -> VectorImage {
    let quiet = style.quiet_zone_modules;
    let side = grid.size() as u32 + 2 * quiet;
    let radius = style.corner_radius();

    let paths = grid
        .dark_modules()
        .map(|(x, y)| {
            let (x, y) = (x as u32 + quiet, y as u32 + quiet);
            if radius > 0.0 {
                PathPrimitive::RoundedSquare { x, y, radius }
            } else {
                PathPrimitive::Square { x, y }
            }
        })
        .collect::<Vec<_>>();

    debug!(side, primitives = paths.len(), "Rendering vector symbol");

    VectorImage {
        paths,
        view_box: ViewBox {
            width: side,
            height: side,
        },
        fill: style.module_color,
        scale: style.module_size(),
    }
}

/// Axis-aligned area in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Area {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Signed distance from `(px, py)` to a rounded rectangle (negative inside).
fn rounded_rect_distance(area: Area, radius: f32, px: f32, py: f32) -> f32 {
    let hx = area.w / 2.0;
    let hy = area.h / 2.0;
    let r = radius.clamp(0.0, hx.min(hy));
    let qx = (px - (area.x + hx)).abs() - (hx - r);
    let qy = (py - (area.y + hy)).abs() - (hy - r);
    let outside = qx.max(0.0).hypot(qy.max(0.0));
    let inside = qx.max(qy).min(0.0);
    outside + inside - r
}

/// Fraction of the pixel whose centre is `(px, py)` covered by the rounded rectangle.
pub(crate) fn rounded_rect_coverage(area: Area, radius: f32, px: f32, py: f32) -> f32 {
    (0.5 - rounded_rect_distance(area, radius, px, py)).clamp(0.0, 1.0)
}

/// Pixel range `[start, end)` touched by the span `[from, from + len)`, clipped to `limit`.
fn pixel_span(from: f32, len: f32, limit: u32) -> std::ops::Range<u32> {
    let start = from.floor().max(0.0) as u32;
    let end = ((from + len).ceil().max(0.0) as u32).min(limit);
    start.min(end)..end
}

/// Blend a rounded rectangle of `color` over `canvas`, anti-aliased at the edges.
pub(crate) fn fill_rounded_rect(canvas: &mut RgbaImage, area: Area, radius: f32, color: Rgba<u8>) {
    for py in pixel_span(area.y, area.h, canvas.height()) {
        for px in pixel_span(area.x, area.w, canvas.width()) {
            let coverage = rounded_rect_coverage(area, radius, px as f32 + 0.5, py as f32 + 0.5);
            if coverage <= 0.0 {
                continue;
            }
            let mut src = color;
            src[3] = (f32::from(color[3]) * coverage).round() as u8;
            let dst = canvas.get_pixel_mut(px, py);
            *dst = blend_over(*dst, src);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::EncodeOptions;

    fn checker(size: usize) -> ModuleGrid {
        let modules = (0..size * size).map(|i| (i % size + i / size) % 2 == 0).collect();
        ModuleGrid::from_modules(size, modules).unwrap()
    }

    #[test]
    fn raster_canvas_includes_quiet_zone() {
        let grid = checker(21);
        let style = RenderStyle::default().with_module_px(4).with_quiet_zone(2);
        let img = render_raster(&grid, &style);
        assert_eq!(img.width(), (21 + 4) * 4);
        assert_eq!(img.height(), img.width());
    }

    #[test]
    fn raster_quiet_zone_is_transparent() {
        let grid = checker(21);
        let style = RenderStyle::default().with_module_px(4).with_quiet_zone(3);
        assert_eq!(style.background, Background::Transparent);
        let img = render_raster(&grid, &style);
        for y in 0..12 {
            for x in 0..img.width() {
                assert_eq!(img.pixels().get_pixel(x, y)[3], 0, "({x}, {y})");
            }
        }
    }

    #[test]
    fn raster_module_centres_match_grid() {
        let grid = ModuleGrid::encode("http://localhost:8000/x", &EncodeOptions::default()).unwrap();
        let style = RenderStyle::default().with_module_px(8).with_quiet_zone(2);
        let img = render_raster(&grid, &style);
        for y in 0..grid.size() {
            for x in 0..grid.size() {
                let px = (x as u32 + 2) * 8 + 4;
                let py = (y as u32 + 2) * 8 + 4;
                let pixel = *img.pixels().get_pixel(px, py);
                if grid.is_dark(x, y) {
                    assert_eq!(pixel, style.module_color, "dark module ({x}, {y})");
                } else {
                    assert_eq!(pixel, Rgba([0, 0, 0, 0]), "light module ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn square_modules_fill_their_cell() {
        let grid = ModuleGrid::from_modules(1, vec![true]).unwrap();
        let style = RenderStyle::default()
            .with_module_px(6)
            .with_quiet_zone(0)
            .with_corner_radius(0.0);
        let img = render_raster(&grid, &style);
        assert!(img.pixels().pixels().all(|p| *p == style.module_color));
    }

    #[test]
    fn circular_modules_clear_their_corners() {
        let grid = ModuleGrid::from_modules(1, vec![true]).unwrap();
        let style = RenderStyle::default()
            .with_module_px(20)
            .with_quiet_zone(0)
            .with_corner_radius(0.5);
        let img = render_raster(&grid, &style);
        assert_eq!(img.pixels().get_pixel(0, 0)[3], 0);
        assert_eq!(img.pixels().get_pixel(19, 19)[3], 0);
        assert_eq!(img.pixels().get_pixel(10, 10)[3], 255);
        // edge pixels are partially covered
        let edge = img.pixels().get_pixel(10, 0)[3];
        assert!(edge > 0 && edge < 255, "edge alpha {edge}");
    }

    #[test]
    fn vector_emits_one_primitive_per_dark_module() {
        let grid = checker(21);
        let style = RenderStyle::vector_default().with_quiet_zone(4);
        let img = render_vector(&grid, &style);
        assert_eq!(img.paths.len(), grid.dark_modules().count());
        assert_eq!(img.view_box, ViewBox { width: 29, height: 29 });
        assert_eq!(img.paths[0], PathPrimitive::Square { x: 4, y: 4 });
    }

    #[test]
    fn vector_rounding_follows_style() {
        let grid = checker(3);
        let style = RenderStyle::vector_default().with_quiet_zone(0).with_corner_radius(0.25);
        let img = render_vector(&grid, &style);
        assert!(matches!(img.paths[0], PathPrimitive::RoundedSquare { radius, .. } if radius == 0.25));
    }

    #[test]
    fn raster_and_vector_encode_same_modules() {
        let grid = ModuleGrid::encode("same data", &EncodeOptions::default()).unwrap();
        let vector = render_vector(&grid, &RenderStyle::vector_default().with_quiet_zone(0));
        let style = RenderStyle::default().with_module_px(3).with_quiet_zone(0);
        let raster = render_raster(&grid, &style);
        for path in &vector.paths {
            let (x, y) = path.origin();
            assert_eq!(raster.pixels().get_pixel(x * 3 + 1, y * 3 + 1)[3], 255);
        }
        let opaque_centres = (0..grid.size())
            .flat_map(|y| (0..grid.size()).map(move |x| (x, y)))
            .filter(|&(x, y)| raster.pixels().get_pixel(x as u32 * 3 + 1, y as u32 * 3 + 1)[3] == 255)
            .count();
        assert_eq!(opaque_centres, vector.paths.len());
    }

    #[test]
    fn render_dispatches_on_kind() {
        let grid = checker(21);
        let style = RenderStyle::default().with_module_px(2);
        assert_eq!(render(&grid, &style, OutputKind::Raster).kind(), OutputKind::Raster);
        assert_eq!(render(&grid, &style, OutputKind::Vector).kind(), OutputKind::Vector);
    }

    #[test]
    fn pixel_span_clips_to_canvas() {
        assert_eq!(pixel_span(-3.0, 5.0, 10), 0..2);
        assert_eq!(pixel_span(8.5, 5.0, 10), 8..10);
        assert_eq!(pixel_span(12.0, 5.0, 10), 10..10);
    }
}
