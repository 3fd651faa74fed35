use egui::{Color32, CursorIcon, Rect, Sense, Stroke, pos2, vec2};

use crate::PaintApp;
use crate::hint::CursorKind;
use crate::surface::Surface;

fn cursor_icon(cursor: CursorKind) -> CursorIcon {
    match cursor {
        CursorKind::Pencil | CursorKind::Crosshair => CursorIcon::Crosshair,
        CursorKind::Brush | CursorKind::Eraser => CursorIcon::Cell,
        CursorKind::Move => CursorIcon::Move,
        CursorKind::Default => CursorIcon::Default,
    }
}

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let [width, height] = app.session().surface().size();
        let (response, painter) = ui.allocate_painter(vec2(width as f32, height as f32), Sense::drag());
        let canvas_rect = response.rect;

        app.handle_canvas_input(ctx, canvas_rect);

        // The surface is transparent; show it on white paper
        painter.rect_filled(canvas_rect, 0.0, Color32::WHITE);
        let texture = app.canvas_texture(ctx).id();
        painter.image(
            texture,
            canvas_rect,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        let hint = app.session().visual_hint();
        let input = app.input();
        if response.hovered() {
            ctx.set_cursor_icon(cursor_icon(hint.cursor));
        }

        if let Some(rect) = hint.selection_outline {
            let config = app.session().config();
            let dash = config.dash_pattern();
            let corners = [rect.min(), pos2(rect.max().x, rect.min().y), rect.max(), pos2(rect.min().x, rect.max().y), rect.min()]
                .map(|corner| input.to_screen(corner));
            painter.extend(egui::Shape::dashed_line(
                &corners,
                Stroke::new(1.0, config.accent_color()),
                dash.dash(),
                dash.gap(),
            ));
        }

        if let Some(preview) = hint.brush_preview {
            let center = input.to_screen(preview.center);
            let scale = canvas_rect.width() / width.max(1) as f32;
            let radius = preview.diameter * scale / 2.0;
            painter.circle(center, radius, preview.fill, Stroke::new(1.0, preview.border));
        }
    });
}
