use egui::{Color32, Pos2};

use crate::snapshot::PixelRect;
use crate::state::ToolSettings;
use crate::tools::ToolKind;

/// Cursor the front-end should show over the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Pencil,
    Brush,
    Eraser,
    Crosshair,
    /// Over a selected region that can be dragged
    Move,
    /// Pointer is not over the surface
    Default,
}

/// Circle following the pointer, sized like the stroke it would paint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushPreview {
    pub center: Pos2,
    pub diameter: f32,
    pub fill: Color32,
    pub border: Color32,
}

/// Everything the UI needs to give feedback about the tool under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualHint {
    pub cursor: CursorKind,
    pub brush_preview: Option<BrushPreview>,
    /// Resting selection to outline on top of the surface
    pub selection_outline: Option<PixelRect>,
}

/// What the selection tool currently holds, as seen by the hint
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionHint {
    pub region: Option<PixelRect>,
    pub dragging: bool,
}

const ERASER_BORDER: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);

/// Map tool settings and pointer state to cursor and preview feedback.
///
/// `hover` is the pointer position in surface coordinates, `None` when the
/// pointer is off the surface.
pub fn visual_hint(
    settings: &ToolSettings,
    eraser_scale: f32,
    hover: Option<Pos2>,
    selection: SelectionHint,
) -> VisualHint {
    let selection_outline = if selection.dragging { None } else { selection.region };

    let Some(pos) = hover else {
        return VisualHint {
            cursor: CursorKind::Default,
            brush_preview: None,
            selection_outline,
        };
    };

    let over_region = selection.region.is_some_and(|rect| rect.contains(pos));
    let cursor = match settings.tool {
        ToolKind::Pencil => CursorKind::Pencil,
        ToolKind::Brush => CursorKind::Brush,
        ToolKind::Eraser => CursorKind::Eraser,
        ToolKind::Select if selection.dragging || over_region => CursorKind::Move,
        ToolKind::Line | ToolKind::Rectangle | ToolKind::Ellipse | ToolKind::Select => CursorKind::Crosshair,
    };

    let brush_preview = settings.tool.is_freehand().then(|| {
        let (fill, border) = if settings.tool == ToolKind::Eraser {
            (Color32::WHITE, ERASER_BORDER)
        } else {
            (settings.color, Color32::BLACK)
        };
        BrushPreview {
            center: pos,
            diameter: settings.effective_width(eraser_scale),
            fill,
            border,
        }
    });

    VisualHint {
        cursor,
        brush_preview,
        selection_outline,
    }
}
