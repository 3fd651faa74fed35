use std::mem;

use egui::{Pos2, Vec2};

use crate::error::CanvasResult;
use crate::snapshot::{PixelRect, RegionSnapshot};
use crate::surface::Surface;
use crate::tools::{Tool, ToolContext};

/// A selected rectangle together with the pixels captured when it was made
#[derive(Debug, Clone)]
pub struct SelectedRegion {
    /// Current position; same size as the captured pixels
    rect: PixelRect,
    pixels: RegionSnapshot,
}

impl SelectedRegion {
    fn new(pixels: RegionSnapshot) -> Self {
        Self {
            rect: pixels.rect(),
            pixels,
        }
    }

    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    pub fn pixels(&self) -> &RegionSnapshot {
        &self.pixels
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        self.rect.contains(pos)
    }
}

#[derive(Debug, Clone, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    /// Button held, dragging out a new selection
    Selecting { anchor: Pos2, current: Pos2 },
    /// Button held, moving an existing region
    Dragging {
        region: SelectedRegion,
        /// Where the region was when the drag started
        origin: PixelRect,
        /// Press point relative to the region's top-left
        grab: Vec2,
    },
    /// Resting state after a completed selection or drag
    RegionSelected(SelectedRegion),
}

#[derive(Debug, Clone, Default)]
pub struct SelectionTool {
    state: SelectionState,
}

impl SelectionTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected_region(&self) -> Option<&SelectedRegion> {
        match &self.state {
            SelectionState::RegionSelected(region) | SelectionState::Dragging { region, .. } => Some(region),
            _ => None,
        }
    }

    fn drag_target(pos: Pos2, grab: Vec2) -> (i32, i32) {
        let top_left = pos - grab;
        (top_left.x.floor() as i32, top_left.y.floor() as i32)
    }
}

impl Tool for SelectionTool {
    fn name(&self) -> &'static str {
        "Select"
    }

    fn on_pointer_down<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()> {
        // On failure the current selection is kept as is
        ctx.history.checkpoint(&*ctx.surface)?;

        self.state = match mem::take(&mut self.state) {
            SelectionState::RegionSelected(region) if region.contains(pos) => {
                let grab = pos - region.rect().min();
                log::debug!("Dragging region {:?}, grabbed at {:?}", region.rect(), grab);
                SelectionState::Dragging {
                    origin: region.rect(),
                    region,
                    grab,
                }
            }
            previous => {
                if let SelectionState::RegionSelected(region) = previous {
                    log::debug!("Discarding region {:?}", region.rect());
                }
                SelectionState::Selecting {
                    anchor: pos,
                    current: pos,
                }
            }
        };
        Ok(())
    }

    fn on_pointer_move<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()> {
        match &mut self.state {
            SelectionState::Selecting { anchor, current } => {
                *current = pos;
                ctx.renderer
                    .preview_selection(ctx.surface, ctx.history, *anchor, pos, &ctx.outline)
            }
            SelectionState::Dragging { region, origin, grab } => {
                let (x, y) = Self::drag_target(pos, *grab);
                region.rect = origin.moved_to(x, y);
                ctx.renderer.preview_drag(
                    ctx.surface,
                    ctx.history,
                    &region.pixels,
                    *origin,
                    (x, y),
                    Some(&ctx.outline),
                )
            }
            SelectionState::Idle | SelectionState::RegionSelected(_) => Ok(()),
        }
    }

    fn on_pointer_up<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()> {
        let result = match mem::take(&mut self.state) {
            SelectionState::Selecting { anchor, .. } => {
                // Commit the clean frame; the outline only lives in previews
                let restored = ctx.renderer.restore_base(ctx.surface, ctx.history);
                let [width, height] = ctx.surface.size();
                let rect = PixelRect::from_corners(anchor, pos).clamped(width, height);
                if rect.is_empty() {
                    log::debug!("Empty selection at {:?}", rect);
                } else {
                    let region = SelectedRegion::new(ctx.surface.capture_region(rect));
                    log::debug!("Selected region {:?}", region.rect());
                    self.state = SelectionState::RegionSelected(region);
                }
                restored.map(|_| ())
            }
            SelectionState::Dragging {
                mut region,
                origin,
                grab,
            } => {
                let (x, y) = Self::drag_target(pos, grab);
                region.rect = origin.moved_to(x, y);
                let result = ctx
                    .renderer
                    .preview_drag(ctx.surface, ctx.history, &region.pixels, origin, (x, y), None);
                log::debug!("Moved region {:?} -> {:?}", origin, region.rect());
                self.state = SelectionState::RegionSelected(region);
                result
            }
            other => {
                self.state = other;
                Ok(())
            }
        };
        let finished = ctx.renderer.finish_gesture(ctx.surface, ctx.history);
        result.and(finished)
    }

    fn deactivate(&mut self) {
        self.state = SelectionState::Idle;
    }

    fn is_busy(&self) -> bool {
        matches!(
            self.state,
            SelectionState::Selecting { .. } | SelectionState::Dragging { .. }
        )
    }

    fn current_state_name(&self) -> &'static str {
        match self.state {
            SelectionState::Idle => "Idle",
            SelectionState::Selecting { .. } => "Selecting",
            SelectionState::Dragging { .. } => "Dragging",
            SelectionState::RegionSelected(_) => "RegionSelected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::History;
    use crate::renderer::Renderer;
    use crate::stroke::{DashPattern, StrokeStyle};
    use crate::surface::RasterSurface;
    use egui::{Color32, pos2};

    struct Fixture {
        surface: RasterSurface,
        history: History,
        renderer: Renderer,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                surface: RasterSurface::new(64, 64),
                history: History::new(),
                renderer: Renderer::new(),
            }
        }

        fn ctx(&mut self) -> ToolContext<'_, RasterSurface> {
            ToolContext {
                surface: &mut self.surface,
                history: &mut self.history,
                renderer: &mut self.renderer,
                style: StrokeStyle::new(Color32::BLACK, 1.0),
                outline: StrokeStyle::new(Color32::BLUE, 1.0).dashed(DashPattern::new(6.0, 6.0)),
            }
        }
    }

    #[test]
    fn test_select_then_drag_states() {
        let mut fx = Fixture::new();
        let mut tool = SelectionTool::new();

        tool.on_pointer_down(pos2(5.0, 5.0), &mut fx.ctx()).unwrap();
        assert_eq!(tool.current_state_name(), "Selecting");
        tool.on_pointer_move(pos2(25.0, 15.0), &mut fx.ctx()).unwrap();
        tool.on_pointer_up(pos2(25.0, 15.0), &mut fx.ctx()).unwrap();
        assert_eq!(tool.current_state_name(), "RegionSelected");
        assert_eq!(tool.selected_region().unwrap().rect(), PixelRect::new(5, 5, 20, 10));

        tool.on_pointer_down(pos2(10.0, 8.0), &mut fx.ctx()).unwrap();
        assert_eq!(tool.current_state_name(), "Dragging");
        tool.on_pointer_move(pos2(40.0, 38.0), &mut fx.ctx()).unwrap();
        tool.on_pointer_up(pos2(40.0, 38.0), &mut fx.ctx()).unwrap();
        assert_eq!(tool.selected_region().unwrap().rect(), PixelRect::new(35, 35, 20, 10));
    }

    #[test]
    fn test_press_outside_starts_new_selection() {
        let mut fx = Fixture::new();
        let mut tool = SelectionTool::new();
        tool.on_pointer_down(pos2(5.0, 5.0), &mut fx.ctx()).unwrap();
        tool.on_pointer_up(pos2(15.0, 15.0), &mut fx.ctx()).unwrap();

        tool.on_pointer_down(pos2(40.0, 40.0), &mut fx.ctx()).unwrap();
        assert!(matches!(tool.state(), SelectionState::Selecting { .. }));
        assert!(tool.selected_region().is_none());
    }

    #[test]
    fn test_zero_area_selection_selects_nothing() {
        let mut fx = Fixture::new();
        let mut tool = SelectionTool::new();
        tool.on_pointer_down(pos2(5.0, 5.0), &mut fx.ctx()).unwrap();
        tool.on_pointer_up(pos2(5.0, 30.0), &mut fx.ctx()).unwrap();
        assert!(matches!(tool.state(), SelectionState::Idle));
    }

    #[test]
    fn test_outline_is_not_committed() {
        let mut fx = Fixture::new();
        let mut tool = SelectionTool::new();
        tool.on_pointer_down(pos2(5.0, 5.0), &mut fx.ctx()).unwrap();
        tool.on_pointer_move(pos2(30.0, 30.0), &mut fx.ctx()).unwrap();
        assert_ne!(fx.surface.to_image(), RasterSurface::new(64, 64).to_image());

        tool.on_pointer_up(pos2(30.0, 30.0), &mut fx.ctx()).unwrap();
        assert_eq!(fx.surface.to_image(), RasterSurface::new(64, 64).to_image());
    }

    #[test]
    fn test_deactivate_discards_region() {
        let mut fx = Fixture::new();
        let mut tool = SelectionTool::new();
        tool.on_pointer_down(pos2(5.0, 5.0), &mut fx.ctx()).unwrap();
        tool.on_pointer_up(pos2(15.0, 15.0), &mut fx.ctx()).unwrap();
        tool.deactivate();
        assert!(tool.selected_region().is_none());
        assert!(!tool.is_busy());
    }
}
