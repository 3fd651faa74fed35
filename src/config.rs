use std::fs;
use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::stroke::DashPattern;
use crate::tools::ToolKind;

/// Brush sizes applied when a tool is selected from the toolbar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPresets {
    pub pencil: Option<u32>,
    pub brush: Option<u32>,
}

impl ToolPresets {
    /// Pencil 1 px, brush 5 px
    pub fn classic() -> Self {
        Self {
            pencil: Some(1),
            brush: Some(5),
        }
    }

    pub fn size_for(&self, tool: ToolKind) -> Option<u32> {
        match tool {
            ToolKind::Pencil => self.pencil,
            ToolKind::Brush => self.brush,
            _ => None,
        }
    }
}

/// Canvas configuration. Every field has a default, so a config file only
/// needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old configs
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub tool: ToolKind,
    pub brush_size: u32,
    pub color: [u8; 3],
    /// Effective eraser width relative to the brush size
    pub eraser_scale: f32,
    pub selection_accent: [u8; 3],
    /// `[dash, gap]` of the selection outline, in pixels
    pub selection_dash: [f32; 2],
    pub export_file_name: String,
    pub presets: ToolPresets,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            tool: ToolKind::Pencil,
            brush_size: 5,
            color: [0, 0, 0],
            eraser_scale: 2.0,
            selection_accent: [0, 0, 255],
            selection_dash: [6.0, 6.0],
            export_file_name: "drawing.png".to_owned(),
            presets: ToolPresets::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse a JSON config document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load the config at `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn initial_color(&self) -> Color32 {
        let [r, g, b] = self.color;
        Color32::from_rgb(r, g, b)
    }

    pub fn accent_color(&self) -> Color32 {
        let [r, g, b] = self.selection_accent;
        Color32::from_rgb(r, g, b)
    }

    pub fn dash_pattern(&self) -> DashPattern {
        let [dash, gap] = self.selection_dash;
        DashPattern::new(dash, gap)
    }

    /// Brush size clamped to at least one pixel
    pub fn initial_brush_size(&self) -> u32 {
        self.brush_size.max(1)
    }
}
