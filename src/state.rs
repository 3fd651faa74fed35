use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::stroke::StrokeStyle;
use crate::tools::ToolKind;

/// What the toolbar controls. Persisted across runs by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct ToolSettings {
    pub tool: ToolKind,
    /// Brush size in pixels, always positive
    pub brush_size: u32,
    pub color: Color32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::from_config(&CanvasConfig::default())
    }
}

impl ToolSettings {
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            tool: config.tool,
            brush_size: config.initial_brush_size(),
            color: config.initial_color(),
        }
    }

    /// Width the current tool actually paints with
    pub fn effective_width(&self, eraser_scale: f32) -> f32 {
        let size = self.brush_size.max(1) as f32;
        if self.tool == ToolKind::Eraser {
            size * eraser_scale
        } else {
            size
        }
    }

    pub fn stroke_style(&self, eraser_scale: f32) -> StrokeStyle {
        let width = self.effective_width(eraser_scale);
        if self.tool == ToolKind::Eraser {
            StrokeStyle::eraser(width)
        } else {
            StrokeStyle::new(self.color, width)
        }
    }
}
