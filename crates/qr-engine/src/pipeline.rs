//! Linear raster pipeline: module draw, then optional stages.

use imageproc::rect::Rect;
use tracing::{debug, warn};

use crate::compose::{self, CardStyle, LogoOverlay};
use crate::geometry::{render_raster, RasterImage};
use crate::grid::{Corner, ModuleGrid};
use crate::style::RenderStyle;
use crate::Result;

/// Optional raster stage.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Round the outer corners of the finder patterns (radius as a fraction of 7 modules).
    RoundFinderCorners { radius_fraction: f32 },
    /// Backing card behind the symbol.
    Card(CardStyle),
    /// Clear a centred disc; radius as a fraction of the canvas side.
    Cutout { radius_fraction: f32 },
    /// Plate and logo at the centre.
    Logo(LogoOverlay),
}

impl Stage {
    fn order(&self) -> u8 {
        match self {
            Stage::RoundFinderCorners { .. } => 0,
            Stage::Card(_) => 1,
            Stage::Cutout { .. } => 2,
            Stage::Logo(_) => 3,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Stage::RoundFinderCorners { .. } => "round_finder_corners",
            Stage::Card(_) => "card",
            Stage::Cutout { .. } => "cutout",
            Stage::Logo(_) => "logo",
        }
    }
}

/// Render style plus the stages to run after the module draw.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub style: RenderStyle,
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(style: RenderStyle) -> Self {
        Self {
            style,
            stages: Vec::new(),
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Render the grid and apply stages in the order
    /// finder corners, card, cutout, logo.
    pub fn run(&self, grid: &ModuleGrid) -> Result<RasterImage> {
        let mut image = render_raster(grid, &self.style);
        let quiet = self.style.quiet_zone_modules;
        let module = self.style.module_size();

        let mut stages: Vec<&Stage> = self.stages.iter().collect();
        stages.sort_by_key(|s| s.order());

        let logo_fraction = stages.iter().find_map(|s| match s {
            Stage::Logo(logo) => Some(logo.max_width_fraction),
            _ => None,
        });

        // Offset of the symbol inside the canvas, grows when a card is added.
        let mut offset = 0u32;
        for stage in stages {
            debug!(stage = stage.name(), "Running pipeline stage");
            match stage {
                Stage::RoundFinderCorners { radius_fraction } => {
                    compose::round_finder_corners(
                        &mut image,
                        &grid.finder_zones(),
                        quiet,
                        module,
                        *radius_fraction,
                    );
                }
                Stage::Card(card) => {
                    let before = image.width();
                    image = compose::apply_card(image, card);
                    offset += (image.width() - before) / 2;
                }
                Stage::Cutout { radius_fraction } => {
                    let side = image.width().min(image.height());
                    let radius = compose::cutout_radius(side, *radius_fraction, logo_fraction);
                    compose::apply_cutout(&mut image, radius);
                }
                Stage::Logo(logo) => {
                    let covered = compose::composite_logo(&mut image, logo);
                    warn_on_finder_overlap(grid, quiet, module, offset, covered);
                }
            }
        }
        Ok(image)
    }
}

/// Finder zones hit by `covered`, with the symbol drawn `offset` pixels
/// in from the canvas edge.
pub fn finder_overlaps(
    grid: &ModuleGrid,
    quiet: u32,
    module: u32,
    offset: u32,
    covered: Rect,
) -> Vec<Corner> {
    grid.finder_zones()
        .into_iter()
        .filter(|zone| {
            let rect = zone.pixel_rect(quiet, module);
            let rect = Rect::at(rect.left() + offset as i32, rect.top() + offset as i32)
                .of_size(rect.width(), rect.height());
            rect.intersect(covered).is_some()
        })
        .map(|zone| zone.corner)
        .collect()
}

/// Logo size is advisory: overlap with a finder zone is logged, not rejected.
fn warn_on_finder_overlap(grid: &ModuleGrid, quiet: u32, module: u32, offset: u32, covered: Rect) {
    for corner in finder_overlaps(grid, quiet, module, offset, covered) {
        warn!(?corner, "Logo overlaps a finder pattern; reduce the logo size");
    }
}
