use thiserror::Error;

/// Errors produced by the canvas core.
///
/// Undo/redo on an empty stack is not an error: those operations report
/// `Ok(false)` instead.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// The imported file is not an image we can use
    #[error("Please upload a valid image file ({0})")]
    UnsupportedImport(String),

    #[error("Failed to decode imported image: {0}")]
    ImportDecode(#[source] image::ImageError),

    #[error("Failed to encode canvas snapshot: {0}")]
    SnapshotEncode(#[source] image::ImageError),

    /// Restoring a snapshot failed; the visible frame was left untouched
    #[error("Failed to decode canvas snapshot: {0}")]
    SnapshotDecode(#[source] image::ImageError),

    /// A history or destructive action was requested mid-gesture
    #[error("Cannot {action} while a {gesture} is in progress")]
    Busy {
        action: &'static str,
        gesture: &'static str,
    },

    #[error("No checkpoint to preview against")]
    NoCheckpoint,

    #[error("Brush size must be a positive number of pixels, got {0}")]
    InvalidBrushSize(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The browser refused to hand the export to the user
    #[error("Failed to download {0}")]
    Download(String),
}

/// Result type for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
