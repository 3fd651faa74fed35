use egui::Pos2;

use crate::error::CanvasResult;
use crate::renderer::{Shape, ShapeKind};
use crate::surface::Surface;
use crate::tools::{Tool, ToolContext, ToolKind};

/// Line, rectangle and ellipse. Each move repaints the checkpoint and the
/// shape on top of it; the frame at release is the committed result.
#[derive(Debug, Clone)]
pub struct ShapeTool {
    kind: ToolKind,
    shape: ShapeKind,
    gesture: Option<Shape>,
}

impl ShapeTool {
    pub fn new(kind: ToolKind, shape: ShapeKind) -> Self {
        Self {
            kind,
            shape,
            gesture: None,
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    /// The shape currently being previewed
    pub fn gesture(&self) -> Option<&Shape> {
        self.gesture.as_ref()
    }
}

impl Tool for ShapeTool {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn on_pointer_down<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()> {
        ctx.history.checkpoint(&*ctx.surface)?;
        self.gesture = Some(Shape::new(self.shape, pos, pos));
        Ok(())
    }

    fn on_pointer_move<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()> {
        if let Some(shape) = &mut self.gesture {
            shape.current = pos;
            ctx.renderer.preview_shape(ctx.surface, ctx.history, shape, &ctx.style)?;
        }
        Ok(())
    }

    fn on_pointer_up<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()> {
        let Some(mut shape) = self.gesture.take() else {
            return Ok(());
        };
        shape.current = pos;
        let queued = ctx.renderer.preview_shape(ctx.surface, ctx.history, &shape, &ctx.style);
        let finished = ctx.renderer.finish_gesture(ctx.surface, ctx.history);
        log::debug!("{} committed {:?} -> {:?}", self.kind.name(), shape.anchor, shape.current);
        queued.and(finished)
    }

    fn deactivate(&mut self) {
        self.gesture = None;
    }

    fn is_busy(&self) -> bool {
        self.gesture.is_some()
    }

    fn current_state_name(&self) -> &'static str {
        if self.gesture.is_some() { "Previewing" } else { "Idle" }
    }
}
