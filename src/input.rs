use egui::{Color32, Context, Key, KeyboardShortcut, Modifiers, PointerButton, Pos2, Rect, Vec2};

use crate::tools::ToolKind;

/// Pointer events in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button was pressed over the surface
    PointerDown { position: Pos2 },
    /// Pointer moved over the surface, held or not
    PointerMove { position: Pos2 },
    /// Primary button was released
    PointerUp { position: Pos2 },
    /// Pointer left the surface; ends a gesture like `PointerUp`
    PointerLeave { last_known: Pos2 },
}

impl InputEvent {
    pub fn position(&self) -> Pos2 {
        match self {
            InputEvent::PointerDown { position }
            | InputEvent::PointerMove { position }
            | InputEvent::PointerUp { position } => *position,
            InputEvent::PointerLeave { last_known } => *last_known,
        }
    }
}

/// Discrete toolbar requests. Settings are last-write-wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolbarEvent {
    ToolSelected(ToolKind),
    BrushSizeChanged(u32),
    ColorChanged(Color32),
    Undo,
    Redo,
    Clear,
}

const UNDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
const REDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::Z);
const REDO_ALT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);

/// Handles converting raw egui input into surface-relative InputEvents
#[derive(Debug)]
pub struct InputHandler {
    /// Screen rect the surface is shown in
    canvas_rect: Rect,
    /// Surface size in pixels
    surface_size: Vec2,
    last_position: Option<Pos2>,
    /// A press started on the surface and has not ended yet
    held: bool,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect, surface_size: [u32; 2]) -> Self {
        Self {
            canvas_rect,
            surface_size: Vec2::new(surface_size[0] as f32, surface_size[1] as f32),
            last_position: None,
            held: false,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    /// Screen position to surface pixel coordinates
    pub fn to_surface(&self, screen: Pos2) -> Pos2 {
        let size = self.canvas_rect.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return Pos2::ZERO;
        }
        let offset = screen - self.canvas_rect.min;
        Pos2::new(
            offset.x * self.surface_size.x / size.x,
            offset.y * self.surface_size.y / size.y,
        )
    }

    /// Surface pixel coordinates back to screen position
    pub fn to_screen(&self, surface: Pos2) -> Pos2 {
        let size = self.canvas_rect.size();
        let scale = Vec2::new(
            size.x / self.surface_size.x.max(1.0),
            size.y / self.surface_size.y.max(1.0),
        );
        self.canvas_rect.min + surface.to_vec2() * scale
    }

    /// Process raw egui input and generate our InputEvents
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let hover = input
                .pointer
                .hover_pos()
                .filter(|pos| self.canvas_rect.contains(*pos))
                .map(|pos| self.to_surface(pos));

            match hover {
                Some(position) => {
                    if Some(position) != self.last_position {
                        events.push(InputEvent::PointerMove { position });
                    }
                    self.last_position = Some(position);
                }
                None => {
                    if let Some(last_known) = self.last_position.take() {
                        events.push(InputEvent::PointerLeave { last_known });
                        self.held = false;
                    }
                }
            }

            if input.pointer.button_pressed(PointerButton::Primary) {
                if let Some(position) = hover {
                    events.push(InputEvent::PointerDown { position });
                    self.held = true;
                }
            }
            if input.pointer.button_released(PointerButton::Primary) && self.held {
                let position = hover.or(self.last_position).unwrap_or(Pos2::ZERO);
                events.push(InputEvent::PointerUp { position });
                self.held = false;
            }
        });

        events
    }

    /// Undo/redo keyboard shortcuts
    pub fn process_shortcuts(&self, ctx: &Context) -> Vec<ToolbarEvent> {
        let mut events = Vec::new();
        ctx.input_mut(|input| {
            // Most specific first so Cmd+Shift+Z is not taken as undo
            if input.consume_shortcut(&REDO) || input.consume_shortcut(&REDO_ALT) {
                events.push(ToolbarEvent::Redo);
            }
            if input.consume_shortcut(&UNDO) {
                events.push(ToolbarEvent::Undo);
            }
        });
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_surface_mapping_is_scaled() {
        let handler = InputHandler::new(Rect::from_min_size(pos2(100.0, 50.0), Vec2::new(400.0, 300.0)), [800, 600]);
        assert_eq!(handler.to_surface(pos2(100.0, 50.0)), pos2(0.0, 0.0));
        assert_eq!(handler.to_surface(pos2(300.0, 200.0)), pos2(400.0, 300.0));
        assert_eq!(handler.to_screen(pos2(400.0, 300.0)), pos2(300.0, 200.0));
    }

    #[test]
    fn test_leave_reports_last_position() {
        let event = InputEvent::PointerLeave {
            last_known: pos2(7.0, 9.0),
        };
        assert_eq!(event.position(), pos2(7.0, 9.0));
    }
}
