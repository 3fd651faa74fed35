use canvas_paint::tools::SelectionState;
use canvas_paint::{CanvasConfig, CanvasError, CursorKind, PixelRect, Session, Surface, ToolKind};
use egui::pos2;
use image::Rgba;

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// 80x60 surface with one red pixel at (6, 6) and the select tool active
fn session() -> Session {
    let mut session = Session::new(CanvasConfig {
        width: 80,
        height: 60,
        brush_size: 1,
        color: [255, 0, 0],
        ..CanvasConfig::default()
    });
    session.pointer_down(pos2(6.0, 6.0)).unwrap();
    session.pointer_move(pos2(6.2, 6.0)).unwrap();
    session.pointer_up(pos2(6.2, 6.0)).unwrap();
    assert_eq!(*session.surface().pixels().get_pixel(6, 6), RED);
    assert_eq!(session.surface().pixels().get_pixel(7, 6)[3], 0);

    session.select_tool(ToolKind::Select).unwrap();
    session
}

fn select(session: &mut Session, from: egui::Pos2, to: egui::Pos2) {
    session.pointer_down(from).unwrap();
    session.pointer_move(to).unwrap();
    session.pointer_up(to).unwrap();
}

fn selected_rect(session: &Session) -> Option<PixelRect> {
    match session.tool().as_selection_tool()?.state() {
        SelectionState::RegionSelected(region) => Some(region.rect()),
        _ => None,
    }
}

#[test]
fn test_select_then_drag_preserves_grab_offset() {
    let mut session = session();
    select(&mut session, pos2(5.0, 5.0), pos2(25.0, 15.0));
    assert_eq!(selected_rect(&session), Some(PixelRect::new(5, 5, 20, 10)));

    session.pointer_down(pos2(10.0, 8.0)).unwrap();
    session.pointer_move(pos2(40.0, 38.0)).unwrap();
    session.pointer_up(pos2(40.0, 38.0)).unwrap();

    assert_eq!(selected_rect(&session), Some(PixelRect::new(35, 35, 20, 10)));
    let pixels = session.surface().pixels();
    assert_eq!(pixels.get_pixel(6, 6)[3], 0);
    assert_eq!(*pixels.get_pixel(36, 36), RED);
}

#[test]
fn test_committed_frames_have_no_outline() {
    let mut session = session();
    let before = session.surface().to_image();

    session.pointer_down(pos2(5.0, 5.0)).unwrap();
    session.pointer_move(pos2(25.0, 15.0)).unwrap();
    // The in-progress frame shows the outline
    assert_ne!(session.surface().to_image(), before);
    session.pointer_up(pos2(25.0, 15.0)).unwrap();
    assert_eq!(session.surface().to_image(), before);

    let hint = session.visual_hint();
    assert_eq!(hint.selection_outline, Some(PixelRect::new(5, 5, 20, 10)));
    // Hit testing includes the right and bottom edges
    assert_eq!(hint.cursor, CursorKind::Move);

    session.pointer_move(pos2(26.0, 15.0)).unwrap();
    assert_eq!(session.visual_hint().cursor, CursorKind::Crosshair);
}

#[test]
fn test_drag_is_undoable() {
    let mut session = session();
    let before = session.surface().to_image();
    select(&mut session, pos2(5.0, 5.0), pos2(25.0, 15.0));
    select(&mut session, pos2(10.0, 8.0), pos2(40.0, 38.0));
    assert_ne!(session.surface().to_image(), before);

    assert!(session.undo().unwrap());
    assert_eq!(session.surface().to_image(), before);
    // The region no longer matches the pixels and is dropped
    assert_eq!(selected_rect(&session), None);
}

#[test]
fn test_selection_clamped_to_surface() {
    let mut session = session();
    select(&mut session, pos2(70.0, 50.0), pos2(120.0, 90.0));
    assert_eq!(selected_rect(&session), Some(PixelRect::new(70, 50, 10, 10)));

    select(&mut session, pos2(-20.0, 10.0), pos2(-5.0, 30.0));
    assert_eq!(selected_rect(&session), None);
}

#[test]
fn test_leaving_surface_finishes_selection() {
    let mut session = session();
    session.pointer_down(pos2(5.0, 5.0)).unwrap();
    session.pointer_move(pos2(25.0, 15.0)).unwrap();
    session.pointer_leave(pos2(25.0, 15.0)).unwrap();

    assert!(!session.is_busy());
    assert_eq!(selected_rect(&session), Some(PixelRect::new(5, 5, 20, 10)));
}

#[test]
fn test_tool_change_discards_region() {
    let mut session = session();
    select(&mut session, pos2(5.0, 5.0), pos2(25.0, 15.0));
    session.select_tool(ToolKind::Select).unwrap();
    assert_eq!(selected_rect(&session), None);
}

#[test]
fn test_undo_refused_while_dragging() {
    let mut session = session();
    select(&mut session, pos2(5.0, 5.0), pos2(25.0, 15.0));
    session.pointer_down(pos2(10.0, 8.0)).unwrap();
    session.pointer_move(pos2(20.0, 20.0)).unwrap();

    let depth = session.history().undo_stack().len();
    assert!(matches!(session.undo(), Err(CanvasError::Busy { .. })));
    assert_eq!(session.history().undo_stack().len(), depth);
    assert_eq!(session.visual_hint().cursor, CursorKind::Move);
}
