use canvas_paint::file_handler::encode_png;
use canvas_paint::{CanvasConfig, CanvasError, ImportSource, Session, Surface};
use egui::pos2;
use image::{Rgba, RgbaImage};

fn session() -> Session {
    Session::new(CanvasConfig {
        width: 8,
        height: 6,
        ..CanvasConfig::default()
    })
}

fn red_png() -> Vec<u8> {
    encode_png(&RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]))).unwrap()
}

#[test]
fn test_import_fills_surface_and_undoes() {
    let mut session = session();
    session
        .import_image(&ImportSource::new("red.png", "image/png", red_png()))
        .unwrap();

    assert_eq!(session.history().undo_stack().len(), 1);
    assert!(session.surface().pixels().pixels().all(|p| *p == Rgba([255, 0, 0, 255])));

    assert!(session.undo().unwrap());
    assert_eq!(session.surface().to_image(), RgbaImage::new(8, 6));
}

#[test]
fn test_import_by_extension_without_mime() {
    let mut session = session();
    session.import_image(&ImportSource::new("red.PNG", "", red_png())).unwrap();
    assert_eq!(session.history().undo_stack().len(), 1);
}

#[test]
fn test_rejected_import_changes_nothing() {
    let mut session = session();
    let revision = session.surface().revision();

    let text = ImportSource::new("notes.txt", "text/plain", b"not an image".to_vec());
    assert!(matches!(session.import_image(&text), Err(CanvasError::UnsupportedImport(_))));

    let broken = ImportSource::new("broken.png", "image/png", vec![0x89, b'P', b'N', b'G']);
    assert!(matches!(session.import_image(&broken), Err(CanvasError::ImportDecode(_))));

    assert!(session.history().undo_stack().is_empty());
    assert_eq!(session.surface().revision(), revision);
}

#[test]
fn test_rejection_message() {
    let err = CanvasError::UnsupportedImport("notes.txt".to_owned());
    assert_eq!(err.to_string(), "Please upload a valid image file (notes.txt)");
}

#[test]
fn test_import_refused_mid_gesture() {
    let mut session = session();
    session.pointer_down(pos2(1.0, 1.0)).unwrap();
    let result = session.import_image(&ImportSource::new("red.png", "image/png", red_png()));
    assert!(matches!(result, Err(CanvasError::Busy { .. })));
    assert_eq!(session.history().undo_stack().len(), 1);
}

#[test]
fn test_export_is_flattened_png() {
    let mut session = session();
    session.pointer_down(pos2(0.0, 3.0)).unwrap();
    session.pointer_move(pos2(7.0, 3.0)).unwrap();
    session.pointer_up(pos2(7.0, 3.0)).unwrap();

    let png = session.export_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded, session.surface().to_image());
    assert_eq!(session.export_file_name(), "drawing.png");
}
