use canvas_paint::{CanvasConfig, Session, Surface, ToolKind};
use egui::pos2;
use image::RgbaImage;

fn session() -> Session {
    Session::new(CanvasConfig {
        width: 60,
        height: 40,
        ..CanvasConfig::default()
    })
}

fn scribble(session: &mut Session, y: f32) {
    session.pointer_down(pos2(5.0, y)).unwrap();
    session.pointer_move(pos2(30.0, y)).unwrap();
    session.pointer_move(pos2(50.0, y + 5.0)).unwrap();
    session.pointer_up(pos2(50.0, y + 5.0)).unwrap();
}

#[test]
fn test_n_checkpoints_then_n_undos_restore_first_state() {
    let mut session = session();
    let first = session.surface().to_image();

    for y in [5.0, 15.0, 25.0] {
        scribble(&mut session, y);
    }
    assert_eq!(session.history().undo_stack().len(), 3);

    for _ in 0..3 {
        assert!(session.undo().unwrap());
    }
    assert_eq!(session.surface().to_image(), first);
    assert!(session.history().undo_stack().is_empty());
    assert_eq!(session.history().redo_stack().len(), 3);
}

#[test]
fn test_undo_redo_round_trip() {
    let mut session = session();
    scribble(&mut session, 5.0);
    scribble(&mut session, 20.0);
    let drawn = session.surface().to_image();

    assert!(session.undo().unwrap());
    assert_ne!(session.surface().to_image(), drawn);
    assert_eq!(session.history().undo_stack().len(), 1);
    assert_eq!(session.history().redo_stack().len(), 1);

    assert!(session.redo().unwrap());
    assert_eq!(session.surface().to_image(), drawn);
    assert_eq!(session.history().undo_stack().len(), 2);
    assert!(session.history().redo_stack().is_empty());
}

#[test]
fn test_undo_on_empty_history_is_noop() {
    let mut session = session();
    let revision = session.surface().revision();

    assert!(!session.undo().unwrap());
    assert!(!session.redo().unwrap());
    assert_eq!(session.surface().revision(), revision);
    assert!(session.history().undo_stack().is_empty());
    assert!(session.history().redo_stack().is_empty());
}

#[test]
fn test_new_edit_after_undo_clears_redo() {
    let mut session = session();
    scribble(&mut session, 5.0);
    scribble(&mut session, 15.0);
    session.undo().unwrap();
    session.undo().unwrap();
    assert_eq!(session.history().redo_stack().len(), 2);

    scribble(&mut session, 25.0);
    assert!(session.history().redo_stack().is_empty());
    assert!(!session.redo().unwrap());
}

#[test]
fn test_clear_is_undoable() {
    let mut session = session();
    scribble(&mut session, 10.0);
    let drawn = session.surface().to_image();

    session.clear().unwrap();
    assert_eq!(session.surface().to_image(), RgbaImage::new(60, 40));

    session.undo().unwrap();
    assert_eq!(session.surface().to_image(), drawn);
}

#[test]
fn test_eraser_restores_background() {
    let mut session = session();
    scribble(&mut session, 10.0);
    assert_eq!(session.surface().pixels().get_pixel(20, 10)[3], 255);

    session.select_tool(ToolKind::Eraser).unwrap();
    scribble(&mut session, 10.0);
    assert_eq!(session.surface().pixels().get_pixel(20, 10)[3], 0);
}

#[test]
fn test_leaving_surface_ends_stroke() {
    let mut session = session();
    session.pointer_down(pos2(5.0, 5.0)).unwrap();
    session.pointer_move(pos2(20.0, 5.0)).unwrap();
    session.pointer_leave(pos2(20.0, 5.0)).unwrap();
    assert!(!session.is_busy());

    // Moves after leaving do not paint
    let before = session.surface().to_image();
    session.pointer_move(pos2(20.0, 30.0)).unwrap();
    assert_eq!(session.surface().to_image(), before);
    assert!(session.undo().unwrap());
}
