use egui::{Button, DragValue};

use crate::PaintApp;
use crate::components::ToolButton;
use crate::input::ToolbarEvent;
use crate::tools::{Tool, ToolKind};

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            // Collect the requests first, the panel only borrows the app immutably
            let mut events = Vec::new();
            let session = app.session();
            let settings = *session.settings();
            let busy = session.is_busy();

            ui.horizontal_wrapped(|ui| {
                for kind in ToolKind::ALL {
                    if ToolButton::new(kind, settings.tool == kind).show(ui).clicked() {
                        events.push(ToolbarEvent::ToolSelected(kind));
                    }
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Size");
                let mut size = settings.brush_size;
                if ui.add(DragValue::new(&mut size).range(1..=100).suffix(" px")).changed() {
                    events.push(ToolbarEvent::BrushSizeChanged(size));
                }
            });
            ui.horizontal(|ui| {
                ui.label("Color");
                let mut color = settings.color;
                if ui.color_edit_button_srgba(&mut color).changed() {
                    events.push(ToolbarEvent::ColorChanged(color));
                }
            });
            ui.separator();

            let history = session.history();
            ui.horizontal(|ui| {
                if ui.add_enabled(history.can_undo() && !busy, Button::new("Undo")).clicked() {
                    events.push(ToolbarEvent::Undo);
                }
                if ui.add_enabled(history.can_redo() && !busy, Button::new("Redo")).clicked() {
                    events.push(ToolbarEvent::Redo);
                }
                if ui.add_enabled(!busy, Button::new("Clear")).clicked() {
                    events.push(ToolbarEvent::Clear);
                }
            });
            ui.horizontal(|ui| {
                ui.label(format!("Undo stack size: {}", history.undo_stack().len()));
                ui.label(format!("Redo stack size: {}", history.redo_stack().len()));
            });
            ui.separator();

            #[cfg(not(target_arch = "wasm32"))]
            let open = ui.add_enabled(!busy, Button::new("Open image…")).clicked();
            let export = ui.button(format!("Save as {}", session.export_file_name())).clicked();

            ui.separator();
            let tool = session.tool();
            ui.horizontal(|ui| {
                ui.strong(tool.name());
                ui.label(format!("(State: {})", tool.current_state_name()));
            });
            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }

            for event in events {
                app.handle_toolbar(event);
            }
            #[cfg(not(target_arch = "wasm32"))]
            if open {
                app.open_image();
            }
            if export {
                app.export();
            }
        });
}
