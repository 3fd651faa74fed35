use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::error::CanvasResult;
use crate::history::History;
use crate::renderer::{Renderer, ShapeKind};
use crate::stroke::StrokeStyle;
use crate::surface::Surface;

/// The closed set of tools the toolbar offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Pencil,
    Brush,
    Eraser,
    Line,
    Rectangle,
    Ellipse,
    Select,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Pencil,
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Select,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Pencil => "Pencil",
            ToolKind::Brush => "Brush",
            ToolKind::Eraser => "Eraser",
            ToolKind::Line => "Line",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Ellipse => "Ellipse",
            ToolKind::Select => "Select",
        }
    }

    /// Toolbar glyph
    pub fn icon(&self) -> &'static str {
        match self {
            ToolKind::Pencil => "✏",
            ToolKind::Brush => "🖌",
            ToolKind::Eraser => "⌫",
            ToolKind::Line => "╱",
            ToolKind::Rectangle => "▭",
            ToolKind::Ellipse => "◯",
            ToolKind::Select => "⬚",
        }
    }

    /// Pencil, brush and eraser paint directly with every move
    pub fn is_freehand(&self) -> bool {
        matches!(self, ToolKind::Pencil | ToolKind::Brush | ToolKind::Eraser)
    }

    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
            _ => None,
        }
    }
}

/// Everything a tool may touch while handling a pointer event
pub struct ToolContext<'a, S: Surface> {
    pub surface: &'a mut S,
    pub history: &'a mut History,
    pub renderer: &'a mut Renderer,
    /// Style for strokes and shapes
    pub style: StrokeStyle,
    /// Style for the selection outline
    pub outline: StrokeStyle,
}

/// Tool trait defines the interface for all drawing tools
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Handle pointer press on the surface
    fn on_pointer_down<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()>;

    /// Handle pointer movement while the pointer is held down
    fn on_pointer_move<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()>;

    /// Handle pointer release; also used when the pointer leaves the surface
    fn on_pointer_up<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()>;

    /// Called when the tool is deselected, after any gesture was finished
    fn deactivate(&mut self) {}

    /// A gesture is in progress
    fn is_busy(&self) -> bool;

    fn current_state_name(&self) -> &'static str;
}

// Tool implementations
mod draw_stroke_tool;
pub use draw_stroke_tool::{DrawStrokeState, DrawStrokeTool};

mod shape_tool;
pub use shape_tool::ShapeTool;

mod selection_tool;
pub use selection_tool::{SelectedRegion, SelectionState, SelectionTool};

/// Enum representing all available tool types
/// This allows us to avoid using Box<dyn Tool> and simplifies memory management
#[derive(Debug, Clone)]
pub enum ToolType {
    DrawStroke(DrawStrokeTool),
    Shape(ShapeTool),
    Selection(SelectionTool),
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::DrawStroke(tool) => tool.name(),
            Self::Shape(tool) => tool.name(),
            Self::Selection(tool) => tool.name(),
        }
    }

    fn on_pointer_down<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()> {
        match self {
            Self::DrawStroke(tool) => tool.on_pointer_down(pos, ctx),
            Self::Shape(tool) => tool.on_pointer_down(pos, ctx),
            Self::Selection(tool) => tool.on_pointer_down(pos, ctx),
        }
    }

    fn on_pointer_move<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()> {
        match self {
            Self::DrawStroke(tool) => tool.on_pointer_move(pos, ctx),
            Self::Shape(tool) => tool.on_pointer_move(pos, ctx),
            Self::Selection(tool) => tool.on_pointer_move(pos, ctx),
        }
    }

    fn on_pointer_up<S: Surface>(&mut self, pos: Pos2, ctx: &mut ToolContext<'_, S>) -> CanvasResult<()> {
        match self {
            Self::DrawStroke(tool) => tool.on_pointer_up(pos, ctx),
            Self::Shape(tool) => tool.on_pointer_up(pos, ctx),
            Self::Selection(tool) => tool.on_pointer_up(pos, ctx),
        }
    }

    fn deactivate(&mut self) {
        match self {
            Self::DrawStroke(tool) => tool.deactivate(),
            Self::Shape(tool) => tool.deactivate(),
            Self::Selection(tool) => tool.deactivate(),
        }
    }

    fn is_busy(&self) -> bool {
        match self {
            Self::DrawStroke(tool) => tool.is_busy(),
            Self::Shape(tool) => tool.is_busy(),
            Self::Selection(tool) => tool.is_busy(),
        }
    }

    fn current_state_name(&self) -> &'static str {
        match self {
            Self::DrawStroke(tool) => tool.current_state_name(),
            Self::Shape(tool) => tool.current_state_name(),
            Self::Selection(tool) => tool.current_state_name(),
        }
    }
}

/// Factory function to create a new tool of the specified kind
pub fn new_tool(kind: ToolKind) -> ToolType {
    match (kind, kind.shape_kind()) {
        (ToolKind::Select, _) => ToolType::Selection(SelectionTool::new()),
        (_, Some(shape)) => ToolType::Shape(ShapeTool::new(kind, shape)),
        _ => ToolType::DrawStroke(DrawStrokeTool::new(kind)),
    }
}

// Helper methods for ToolType
impl ToolType {
    pub fn kind(&self) -> ToolKind {
        match self {
            Self::DrawStroke(tool) => tool.kind(),
            Self::Shape(tool) => tool.kind(),
            Self::Selection(_) => ToolKind::Select,
        }
    }

    pub fn as_selection_tool(&self) -> Option<&SelectionTool> {
        match self {
            Self::Selection(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn is_selection_tool(&self) -> bool {
        matches!(self, Self::Selection(_))
    }
}
