use egui::{ColorImage, Context, Rect, TextureHandle, TextureOptions};

use crate::config::CanvasConfig;
use crate::error::CanvasResult;
use crate::file_handler::{FileHandler, ImportSource};
use crate::input::{InputHandler, ToolbarEvent};
use crate::panels::{central_panel, tools_panel};
use crate::session::Session;
use crate::state::ToolSettings;
use crate::surface::{RasterSurface, Surface};

/// The eframe front-end around a drawing [`Session`]
pub struct PaintApp {
    session: Session,
    input: InputHandler,
    files: FileHandler,
    /// Surface pixels on the GPU, with the revision they were uploaded at
    texture: Option<(TextureHandle, u64)>,
    /// Last message for the user, errors included
    status: Option<String>,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: CanvasConfig) -> Self {
        let mut app = Self::with_config(config);
        if let Some(storage) = cc.storage {
            if let Some(settings) = eframe::get_value::<ToolSettings>(storage, eframe::APP_KEY) {
                log::debug!("Restoring tool settings {:?}", settings);
                let result = app.session.apply_settings(settings);
                app.report(result);
            }
        }
        app
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        let session = Session::new(config);
        let input = InputHandler::new(Rect::NOTHING, session.surface().size());
        Self {
            session,
            input,
            files: FileHandler::new(),
            texture: None,
            status: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn input(&self) -> &InputHandler {
        &self.input
    }

    /// Log a failure and show it to the user
    fn report(&mut self, result: CanvasResult<()>) {
        if let Err(err) = result {
            log::error!("{}", err);
            self.status = Some(err.to_string());
        }
    }

    pub fn handle_toolbar(&mut self, event: ToolbarEvent) {
        log::debug!("Toolbar: {:?}", event);
        let result = self.session.handle_toolbar(event);
        if result.is_ok() {
            self.status = None;
        }
        self.report(result);
    }

    /// Feed this frame's pointer input to the session
    pub fn handle_canvas_input(&mut self, ctx: &Context, canvas_rect: Rect) {
        self.input.set_canvas_rect(canvas_rect);
        let events = self.input.process_input(ctx);
        for err in self.session.handle_events(events) {
            self.report(Err(err));
        }
        for event in self.input.process_shortcuts(ctx) {
            self.handle_toolbar(event);
        }
    }

    pub fn import(&mut self, source: &ImportSource) {
        let result = self.session.import_image(source);
        if result.is_ok() {
            self.status = Some(format!("Imported {}", source.name));
        }
        self.report(result);
    }

    /// Write the surface as PNG next to the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn export(&mut self) {
        let path = std::path::PathBuf::from(self.session.export_file_name());
        let result = self
            .session
            .export_png()
            .and_then(|png| crate::file_handler::export_to(&path, &png));
        if result.is_ok() {
            self.status = Some(format!("Saved {}", path.display()));
        }
        self.report(result);
    }

    /// Offer the surface as a PNG download
    #[cfg(target_arch = "wasm32")]
    pub fn export(&mut self) {
        let name = self.session.export_file_name().to_owned();
        let result = self
            .session
            .export_png()
            .and_then(|png| crate::file_handler::download_png(&name, &png));
        if result.is_ok() {
            self.status = Some(format!("Downloaded {}", name));
        }
        self.report(result);
    }

    /// Pick an image with the native file dialog and import it
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_image(&mut self) {
        let Some(path) = crate::file_handler::pick_image_file() else {
            log::debug!("Open image cancelled");
            return;
        };
        match crate::file_handler::read_import(&path) {
            Ok(source) => self.import(&source),
            Err(err) => self.report(Err(err)),
        }
    }

    /// Texture with the current surface pixels, re-uploaded when they change
    pub fn canvas_texture(&mut self, ctx: &Context) -> &TextureHandle {
        let surface: &RasterSurface = self.session.surface();
        let revision = surface.revision();
        let [width, height] = surface.size();

        let image = || {
            ColorImage::from_rgba_unmultiplied([width as usize, height as usize], surface.pixels().as_raw())
        };

        let (handle, uploaded) = self
            .texture
            .get_or_insert_with(|| (ctx.load_texture("canvas", image(), TextureOptions::NEAREST), revision));
        if *uploaded != revision {
            handle.set(image(), TextureOptions::NEAREST);
            *uploaded = revision;
            log::trace!("Uploaded canvas texture at revision {}", revision);
        }
        handle
    }

    fn take_dropped_files(&mut self, ctx: &Context) {
        if !self.files.check_for_dropped_files(ctx) {
            return;
        }
        for source in self.files.take_pending() {
            self.import(&source);
        }
        ctx.request_repaint();
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self.session.settings());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.take_dropped_files(ctx);
        self.files.preview_files_being_dropped(ctx);
    }
}
