use egui::{Color32, Pos2};

use crate::config::CanvasConfig;
use crate::error::{CanvasError, CanvasResult};
use crate::file_handler::{self, ImportSource};
use crate::hint::{SelectionHint, VisualHint, visual_hint};
use crate::history::History;
use crate::input::{InputEvent, ToolbarEvent};
use crate::renderer::Renderer;
use crate::state::ToolSettings;
use crate::stroke::StrokeStyle;
use crate::surface::{RasterSurface, Surface};
use crate::tools::{SelectionState, Tool, ToolContext, ToolKind, ToolType, new_tool};

/// The single owner of everything a drawing session needs: surface,
/// history, renderer, active tool and toolbar settings.
///
/// Pointer, toolbar and file events all go through here.
#[derive(Debug)]
pub struct Session<S: Surface = RasterSurface> {
    config: CanvasConfig,
    settings: ToolSettings,
    surface: S,
    history: History,
    renderer: Renderer,
    tool: ToolType,
    /// Pointer position over the surface, if any
    hover: Option<Pos2>,
    /// Last position seen during the current gesture
    last_position: Option<Pos2>,
    held: bool,
}

impl Session<RasterSurface> {
    /// A blank raster surface of the configured size
    pub fn new(config: CanvasConfig) -> Self {
        let surface = RasterSurface::new(config.width, config.height);
        Self::with_surface(config, surface)
    }
}

impl<S: Surface> Session<S> {
    pub fn with_surface(config: CanvasConfig, surface: S) -> Self {
        let settings = ToolSettings::from_config(&config);
        log::debug!(
            "New session {:?} with {} at size {}",
            surface.size(),
            settings.tool.name(),
            settings.brush_size
        );
        Self {
            tool: new_tool(settings.tool),
            settings,
            config,
            surface,
            history: History::new(),
            renderer: Renderer::new(),
            hover: None,
            last_position: None,
            held: false,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn tool(&self) -> &ToolType {
        &self.tool
    }

    /// A pointer gesture is in progress
    pub fn is_busy(&self) -> bool {
        self.held || self.tool.is_busy()
    }

    pub fn handle_event(&mut self, event: InputEvent) -> CanvasResult<()> {
        match event {
            InputEvent::PointerDown { position } => self.pointer_down(position),
            InputEvent::PointerMove { position } => self.pointer_move(position),
            InputEvent::PointerUp { position } => self.pointer_up(position),
            InputEvent::PointerLeave { last_known } => self.pointer_leave(last_known),
        }
    }

    /// Handle every pointer event of one UI frame. Preview frames superseded
    /// within the batch are dropped; only the latest one is drawn. Returns
    /// the failures in event order.
    pub fn handle_events<I>(&mut self, events: I) -> Vec<CanvasError>
    where
        I: IntoIterator<Item = InputEvent>,
    {
        self.renderer.hold_frames();
        let mut errors: Vec<CanvasError> = events
            .into_iter()
            .filter_map(|event| self.handle_event(event).err())
            .collect();
        if let Err(err) = self.renderer.release_frames(&mut self.surface, &self.history) {
            errors.push(err);
        }
        errors
    }

    pub fn handle_toolbar(&mut self, event: ToolbarEvent) -> CanvasResult<()> {
        match event {
            ToolbarEvent::ToolSelected(kind) => self.select_tool(kind),
            ToolbarEvent::BrushSizeChanged(size) => self.set_brush_size(size),
            ToolbarEvent::ColorChanged(color) => {
                self.set_color(color);
                Ok(())
            }
            ToolbarEvent::Undo => self.undo().map(|_| ()),
            ToolbarEvent::Redo => self.redo().map(|_| ()),
            ToolbarEvent::Clear => self.clear(),
        }
    }

    fn outline_style(&self) -> StrokeStyle {
        StrokeStyle::new(self.config.accent_color(), 1.0).dashed(self.config.dash_pattern())
    }

    /// Run a tool handler with a context borrowed from this session
    fn with_tool<F>(&mut self, f: F) -> CanvasResult<()>
    where
        F: FnOnce(&mut ToolType, &mut ToolContext<'_, S>) -> CanvasResult<()>,
    {
        let style = self.settings.stroke_style(self.config.eraser_scale);
        let outline = self.outline_style();
        let mut ctx = ToolContext {
            surface: &mut self.surface,
            history: &mut self.history,
            renderer: &mut self.renderer,
            style,
            outline,
        };
        f(&mut self.tool, &mut ctx)
    }

    pub fn pointer_down(&mut self, pos: Pos2) -> CanvasResult<()> {
        if self.held {
            // The release never arrived; finish that gesture first
            let last = self.last_position.unwrap_or(pos);
            self.pointer_up(last)?;
        }
        self.hover = Some(pos);
        self.with_tool(|tool, ctx| tool.on_pointer_down(pos, ctx))?;
        self.held = true;
        self.last_position = Some(pos);
        Ok(())
    }

    pub fn pointer_move(&mut self, pos: Pos2) -> CanvasResult<()> {
        self.hover = Some(pos);
        if !self.held {
            return Ok(());
        }
        self.last_position = Some(pos);
        self.with_tool(|tool, ctx| tool.on_pointer_move(pos, ctx))
    }

    pub fn pointer_up(&mut self, pos: Pos2) -> CanvasResult<()> {
        if !self.held {
            return Ok(());
        }
        self.held = false;
        self.last_position = None;
        self.with_tool(|tool, ctx| tool.on_pointer_up(pos, ctx))
    }

    /// Leaving the surface ends the gesture exactly like a release
    pub fn pointer_leave(&mut self, last_known: Pos2) -> CanvasResult<()> {
        self.hover = None;
        self.pointer_up(last_known)
    }

    /// Switch tools. An in-progress gesture is finished as if released and
    /// any selected region is dropped.
    pub fn select_tool(&mut self, kind: ToolKind) -> CanvasResult<()> {
        let finished = match (self.held, self.last_position) {
            (true, Some(last)) => self.pointer_up(last),
            _ => Ok(()),
        };
        self.held = false;
        self.tool.deactivate();
        self.renderer.end_gesture();

        self.tool = new_tool(kind);
        self.settings.tool = kind;
        if let Some(size) = self.config.presets.size_for(kind) {
            self.settings.brush_size = size.max(1);
        }
        log::info!("Tool selected: {} (size {})", kind.name(), self.settings.brush_size);
        finished
    }

    pub fn set_brush_size(&mut self, size: u32) -> CanvasResult<()> {
        if size == 0 {
            return Err(CanvasError::InvalidBrushSize(size));
        }
        self.settings.brush_size = size;
        Ok(())
    }

    pub fn set_color(&mut self, color: Color32) {
        self.settings.color = color;
    }

    /// Adopt persisted settings. Ends any gesture like a tool change.
    pub fn apply_settings(&mut self, settings: ToolSettings) -> CanvasResult<()> {
        self.select_tool(settings.tool)?;
        self.settings = settings;
        self.settings.brush_size = settings.brush_size.max(1);
        Ok(())
    }

    fn ensure_idle(&self, action: &'static str) -> CanvasResult<()> {
        if self.is_busy() {
            log::debug!("Refusing to {} during {}", action, self.tool.current_state_name());
            return Err(CanvasError::Busy {
                action,
                gesture: self.tool.name(),
            });
        }
        Ok(())
    }

    /// Step back one checkpoint. `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self) -> CanvasResult<bool> {
        self.ensure_idle("undo")?;
        let changed = self.history.undo(&mut self.surface)?;
        if changed {
            self.tool.deactivate();
        }
        Ok(changed)
    }

    /// Step forward one checkpoint. `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self) -> CanvasResult<bool> {
        self.ensure_idle("redo")?;
        let changed = self.history.redo(&mut self.surface)?;
        if changed {
            self.tool.deactivate();
        }
        Ok(changed)
    }

    /// Wipe the surface; undoable
    pub fn clear(&mut self) -> CanvasResult<()> {
        self.ensure_idle("clear")?;
        self.history.checkpoint(&self.surface)?;
        self.surface.clear();
        self.tool.deactivate();
        log::debug!("Cleared surface");
        Ok(())
    }

    /// Paint an image file scaled over the whole surface; undoable. A file
    /// that is not a usable image leaves everything untouched.
    pub fn import_image(&mut self, source: &ImportSource) -> CanvasResult<()> {
        self.ensure_idle("import")?;
        let image = file_handler::decode_import(source)?;
        self.history.checkpoint(&self.surface)?;
        self.surface.draw_image_fill(&image);
        self.tool.deactivate();
        log::info!(
            "Imported {} ({}x{}) onto {:?}",
            source.name,
            image.width(),
            image.height(),
            self.surface.size()
        );
        Ok(())
    }

    /// PNG bytes of the flattened surface
    pub fn export_png(&self) -> CanvasResult<Vec<u8>> {
        let png = file_handler::encode_png(&self.surface.to_image())?;
        log::info!("Exported {} bytes as {}", png.len(), self.config.export_file_name);
        Ok(png)
    }

    pub fn export_file_name(&self) -> &str {
        &self.config.export_file_name
    }

    pub fn visual_hint(&self) -> VisualHint {
        let selection = match self.tool.as_selection_tool().map(|tool| tool.state()) {
            Some(SelectionState::RegionSelected(region)) => SelectionHint {
                region: Some(region.rect()),
                dragging: false,
            },
            Some(SelectionState::Dragging { region, .. }) => SelectionHint {
                region: Some(region.rect()),
                dragging: true,
            },
            _ => SelectionHint::default(),
        };
        visual_hint(&self.settings, self.config.eraser_scale, self.hover, selection)
    }
}
