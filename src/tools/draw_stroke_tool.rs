use egui::Pos2;

use crate::error::CanvasResult;
use crate::surface::Surface;
use crate::tools::{Tool, ToolContext, ToolKind};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DrawStrokeState {
    #[default]
    Idle,
    Drawing {
        /// End of the last committed segment
        last: Pos2,
    },
}

/// Pencil, brush and eraser. Every move is committed to the surface at once.
#[derive(Debug, Clone)]
pub struct DrawStrokeTool {
    kind: ToolKind,
    state: DrawStrokeState,
}

impl DrawStrokeTool {
    pub fn new(kind: ToolKind) -> Self {
        debug_assert!(kind.is_freehand());
        Self {
            kind,
            state: DrawStrokeState::Idle,
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn state(&self) -> DrawStrokeState {
        self.state
    }
}

impl Tool for DrawStrokeTool {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn on_pointer_down<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()> {
        ctx.history.checkpoint(&*ctx.surface)?;
        self.state = DrawStrokeState::Drawing { last: pos };
        Ok(())
    }

    fn on_pointer_move<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()> {
        if let DrawStrokeState::Drawing { last } = &mut self.state {
            ctx.renderer.extend_stroke(ctx.surface, *last, pos, &ctx.style);
            *last = pos;
        }
        Ok(())
    }

    fn on_pointer_up<S: Surface>(&mut self, _pos: Pos2, _ctx: &mut ToolContext<'_, S>) -> CanvasResult<()> {
        // Segments are already on the surface
        self.state = DrawStrokeState::Idle;
        Ok(())
    }

    fn deactivate(&mut self) {
        self.state = DrawStrokeState::Idle;
    }

    fn is_busy(&self) -> bool {
        matches!(self.state, DrawStrokeState::Drawing { .. })
    }

    fn current_state_name(&self) -> &'static str {
        match self.state {
            DrawStrokeState::Idle => "Idle",
            DrawStrokeState::Drawing { .. } => "Drawing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::History;
    use crate::renderer::Renderer;
    use crate::stroke::StrokeStyle;
    use crate::surface::RasterSurface;
    use egui::{Color32, pos2};

    #[test]
    fn test_moves_are_committed_immediately() {
        let mut surface = RasterSurface::new(20, 20);
        let mut history = History::new();
        let mut renderer = Renderer::new();
        let mut ctx = ToolContext {
            surface: &mut surface,
            history: &mut history,
            renderer: &mut renderer,
            style: StrokeStyle::new(Color32::BLACK, 1.0),
            outline: StrokeStyle::new(Color32::BLUE, 1.0),
        };
        let mut tool = DrawStrokeTool::new(ToolKind::Pencil);

        tool.on_pointer_down(pos2(2.0, 2.0), &mut ctx).unwrap();
        tool.on_pointer_move(pos2(10.0, 2.0), &mut ctx).unwrap();
        assert_eq!(tool.state(), DrawStrokeState::Drawing { last: pos2(10.0, 2.0) });
        tool.on_pointer_move(pos2(10.0, 10.0), &mut ctx).unwrap();

        // Both segments stay, nothing is restored in between
        assert_eq!(ctx.surface.pixels().get_pixel(6, 2)[3], 255);
        assert_eq!(ctx.surface.pixels().get_pixel(10, 6)[3], 255);

        tool.on_pointer_up(pos2(10.0, 10.0), &mut ctx).unwrap();
        assert_eq!(tool.state(), DrawStrokeState::Idle);
        assert_eq!(ctx.history.undo_stack().len(), 1);
    }
}
