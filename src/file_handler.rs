use std::io::Cursor;
use std::path::Path;

use eframe::egui;
use image::{ImageFormat, RgbaImage};

use crate::error::{CanvasError, CanvasResult};

/// Extensions accepted when a file carries no MIME type
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// An image file handed to the canvas for import
#[derive(Debug, Clone)]
pub struct ImportSource {
    pub name: String,
    /// MIME type, empty when unknown
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImportSource {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// Check if a file is an image based on MIME type or extension
pub fn is_image_file(name: &str, mime: &str) -> bool {
    if !mime.is_empty() {
        return mime.starts_with("image/");
    }
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Validate and decode an import. Nothing is touched on failure.
pub fn decode_import(source: &ImportSource) -> CanvasResult<RgbaImage> {
    if !is_image_file(&source.name, &source.mime) {
        log::warn!("Rejected import of {} ({:?})", source.name, source.mime);
        return Err(CanvasError::UnsupportedImport(source.name.clone()));
    }
    let decoded = image::load_from_memory(&source.bytes).map_err(|err| {
        log::error!("Failed to decode image {}: {}", source.name, err);
        CanvasError::ImportDecode(err)
    })?;
    log::debug!("Decoded {}: {}x{}", source.name, decoded.width(), decoded.height());
    Ok(decoded.to_rgba8())
}

/// PNG bytes of a flattened image
pub fn encode_png(image: &RgbaImage) -> CanvasResult<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(CanvasError::SnapshotEncode)?;
    Ok(bytes.into_inner())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn export_to(path: &Path, png: &[u8]) -> CanvasResult<()> {
    std::fs::write(path, png)?;
    log::info!("Exported {} bytes to {}", png.len(), path.display());
    Ok(())
}

/// Read a file picked by the user. The MIME type is left empty so the
/// extension decides whether it is an image.
#[cfg(not(target_arch = "wasm32"))]
pub fn read_import(path: &Path) -> CanvasResult<ImportSource> {
    let bytes = std::fs::read(path)?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(ImportSource::new(path.display().to_string(), "", bytes))
}

/// Ask the user for an image file to import
#[cfg(not(target_arch = "wasm32"))]
pub fn pick_image_file() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open image")
        .add_filter("Images", &IMAGE_EXTENSIONS[..])
        .pick_file()
}

/// Hand PNG bytes to the browser as a download called `name`
#[cfg(target_arch = "wasm32")]
pub fn download_png(name: &str, png: &[u8]) -> CanvasResult<()> {
    use eframe::wasm_bindgen::{JsCast as _, JsValue};

    fn failed(err: JsValue) -> CanvasError {
        CanvasError::Download(format!("{:?}", err))
    }

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(png));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("image/png");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(failed)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(failed)?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| CanvasError::Download(name.to_owned()))?;
    let link = document
        .create_element("a")
        .map_err(failed)?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|element| failed(element.into()))?;
    link.set_href(&url);
    link.set_download(name);
    link.click();

    web_sys::Url::revoke_object_url(&url).map_err(failed)?;
    log::info!("Offered {} bytes as {}", png.len(), name);
    Ok(())
}

/// Collects files dropped onto the window until the app takes them
#[derive(Debug, Default)]
pub struct FileHandler {
    pending: Vec<ImportSource>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue newly dropped files. Returns true if any arrived.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let mut any = false;
        for file in dropped {
            let name = match (&file.path, file.name.is_empty()) {
                (Some(path), _) => path.display().to_string(),
                (None, false) => file.name.clone(),
                (None, true) => "unknown".to_owned(),
            };
            match Self::read_dropped(&file) {
                Some(bytes) => {
                    self.pending.push(ImportSource::new(name, file.mime.clone(), bytes));
                    any = true;
                }
                None => log::warn!("Dropped file has no accessible data: {}", name),
            }
        }
        any
    }

    fn read_dropped(file: &egui::DroppedFile) -> Option<Vec<u8>> {
        if let Some(bytes) = &file.bytes {
            return Some(bytes.to_vec());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = &file.path {
            match std::fs::read(path) {
                Ok(bytes) => return Some(bytes),
                Err(err) => log::error!("Failed to read {}: {}", path.display(), err),
            }
        }

        None
    }

    /// Take the queued files, oldest first
    pub fn take_pending(&mut self) -> Vec<ImportSource> {
        std::mem::take(&mut self.pending)
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop an image to paint it onto the canvas:\n".to_owned();
            for file in &i.raw.hovered_files {
                match &file.path {
                    Some(path) => text += &format!("\n{}", path.display()),
                    None if !file.mime.is_empty() => text += &format!("\n{}", file.mime),
                    None => text += "\n(Path not available)",
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(20.0),
            Color32::WHITE,
        );
    }
}
