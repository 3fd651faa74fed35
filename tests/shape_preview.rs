use canvas_paint::stroke::StrokeStyle;
use canvas_paint::{CanvasConfig, InputEvent, RasterSurface, Session, Surface, ToolKind};
use egui::{Pos2, pos2};

fn session_with(tool: ToolKind) -> Session {
    let mut session = Session::new(CanvasConfig {
        width: 50,
        height: 50,
        brush_size: 2,
        ..CanvasConfig::default()
    });
    session.select_tool(tool).unwrap();
    session
}

fn drag(session: &mut Session, from: Pos2, moves: &[Pos2]) {
    session.pointer_down(from).unwrap();
    for &pos in moves {
        session.pointer_move(pos).unwrap();
    }
    let last = moves.last().copied().unwrap_or(from);
    session.pointer_up(last).unwrap();
}

#[test]
fn test_line_preview_leaves_only_final_line() {
    let mut session = session_with(ToolKind::Line);
    drag(
        &mut session,
        pos2(10.0, 10.0),
        &[pos2(20.0, 10.0), pos2(20.0, 20.0), pos2(30.0, 30.0)],
    );

    let mut expected = RasterSurface::new(50, 50);
    let style = session.settings().stroke_style(session.config().eraser_scale);
    expected.stroke_line(pos2(10.0, 10.0), pos2(30.0, 30.0), &style);

    assert_eq!(session.surface().to_image(), expected.to_image());
    assert_eq!(session.history().undo_stack().len(), 1);
    assert!(!session.renderer().frames().is_pending());
}

#[test]
fn test_rectangle_and_ellipse_symmetric_under_corner_swap() {
    for tool in [ToolKind::Rectangle, ToolKind::Ellipse] {
        let mut forward = session_with(tool);
        drag(&mut forward, pos2(10.0, 10.0), &[pos2(25.0, 40.0), pos2(40.0, 30.0)]);

        let mut backward = session_with(tool);
        drag(&mut backward, pos2(40.0, 30.0), &[pos2(5.0, 5.0), pos2(10.0, 10.0)]);

        assert_eq!(forward.surface().to_image(), backward.surface().to_image(), "{tool:?}");
    }
}

#[test]
fn test_shape_preview_keeps_earlier_drawing() {
    let mut session = session_with(ToolKind::Pencil);
    drag(&mut session, pos2(2.0, 45.0), &[pos2(45.0, 45.0)]);
    let stroke_pixel = *session.surface().pixels().get_pixel(20, 45);
    assert_eq!(stroke_pixel[3], 255);

    session.select_tool(ToolKind::Rectangle).unwrap();
    drag(&mut session, pos2(5.0, 5.0), &[pos2(30.0, 30.0), pos2(20.0, 20.0)]);

    assert_eq!(*session.surface().pixels().get_pixel(20, 45), stroke_pixel);
    // The bigger intermediate rectangle is gone
    assert_eq!(session.surface().pixels().get_pixel(30, 15)[3], 0);
    assert_eq!(session.surface().pixels().get_pixel(20, 15)[3], 255);
}

#[test]
fn test_zero_extent_shape_draws_nothing() {
    let mut session = session_with(ToolKind::Ellipse);
    drag(&mut session, pos2(10.0, 10.0), &[pos2(10.0, 10.0)]);
    assert_eq!(session.surface().to_image(), RasterSurface::new(50, 50).to_image());
}

#[test]
fn test_dashed_outline_style() {
    let style = StrokeStyle::new(egui::Color32::BLUE, 1.0).dashed(canvas_paint::stroke::DashPattern::new(6.0, 6.0));
    let mut surface = RasterSurface::new(30, 5);
    surface.stroke_line(pos2(0.0, 2.0), pos2(29.0, 2.0), &style);

    let lit: Vec<bool> = (0..30).map(|x| surface.pixels().get_pixel(x, 2)[3] > 0).collect();
    assert!(lit[1]);
    assert!(!lit[9]);
    assert!(lit[13]);
}

#[test]
fn test_moves_in_one_frame_draw_only_the_last_preview() {
    let mut session = session_with(ToolKind::Rectangle);
    let errors = session.handle_events([
        InputEvent::PointerDown {
            position: pos2(5.0, 5.0),
        },
        InputEvent::PointerMove {
            position: pos2(40.0, 40.0),
        },
        InputEvent::PointerMove {
            position: pos2(30.0, 10.0),
        },
        InputEvent::PointerMove {
            position: pos2(20.0, 20.0),
        },
    ]);
    assert!(errors.is_empty());
    assert_eq!(session.renderer().frames().dropped(), 2);
    assert!(!session.renderer().frames().is_pending());

    let style = session.settings().stroke_style(session.config().eraser_scale);
    let mut expected = RasterSurface::new(50, 50);
    expected.stroke_rect(pos2(5.0, 5.0), pos2(20.0, 20.0), &style);
    assert_eq!(session.surface().to_image(), expected.to_image());

    let errors = session.handle_events([InputEvent::PointerUp {
        position: pos2(20.0, 20.0),
    }]);
    assert!(errors.is_empty());
    assert!(!session.is_busy());
    assert_eq!(session.surface().to_image(), expected.to_image());
}
