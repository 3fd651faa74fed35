#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod file_handler;
pub mod hint;
pub mod history;
pub mod input;
pub mod panels;
pub mod preview;
pub mod raster;
pub mod renderer;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod stroke;
pub mod surface;
pub mod tools;

pub use app::PaintApp;
pub use config::CanvasConfig;
pub use error::{CanvasError, CanvasResult, ConfigError};
pub use file_handler::ImportSource;
pub use hint::{CursorKind, VisualHint, visual_hint};
pub use history::History;
pub use input::{InputEvent, ToolbarEvent};
pub use renderer::Renderer;
pub use session::Session;
pub use snapshot::{PixelRect, Snapshot};
pub use state::ToolSettings;
pub use stroke::StrokeStyle;
pub use surface::{RasterSurface, Surface};
pub use tools::{Tool, ToolKind, ToolType};
