use super::*;

#[test]
fn cover_fit_fills_wide_viewport() {
    let vp = Viewport::new(800.0, 600.0);
    let a = cover_fit(400, 400, vp).unwrap();
    let top_left = a * Point::new(0.0, 0.0);
    let bottom_right = a * Point::new(400.0, 400.0);
    // Width-bound: scale 2, image is 800x800, cropped 100px top and bottom.
    assert!((top_left.x - 0.0).abs() < 1e-9);
    assert!((top_left.y + 100.0).abs() < 1e-9);
    assert!((bottom_right.x - 800.0).abs() < 1e-9);
    assert!((bottom_right.y - 700.0).abs() < 1e-9);
}

#[test]
fn cover_fit_fills_tall_viewport() {
    let vp = Viewport::new(300.0, 900.0);
    let a = cover_fit(600, 300, vp).unwrap();
    let tl = a * Point::new(0.0, 0.0);
    let br = a * Point::new(600.0, 300.0);
    assert!(tl.x <= 0.0 && tl.y <= 1e-9);
    assert!(br.x >= 300.0 && (br.y - 900.0).abs() < 1e-9);
    assert!(((tl.x + br.x) / 2.0 - 150.0).abs() < 1e-9);
}

#[test]
fn cover_fit_rejects_empty_image() {
    assert!(cover_fit(0, 10, Viewport::new(10.0, 10.0)).is_none());
}

#[test]
fn vignette_is_clear_in_center_and_dark_in_corner() {
    let vp = Viewport::new(200.0, 100.0);
    let bytes = vignette_bytes(200, 100, 1.0, vp, 40.0, 0.55);
    let alpha_at = |x: usize, y: usize| bytes[(y * 200 + x) * 4 + 3];
    assert_eq!(alpha_at(100, 45), 0);
    assert!(alpha_at(0, 99) > 0);
    assert!(alpha_at(0, 99) <= 141);
    // Color channels stay black (premultiplied).
    assert!(bytes.chunks_exact(4).all(|px| px[0] == 0 && px[1] == 0 && px[2] == 0));
}

#[test]
fn hex_path_is_closed_polygon() {
    let v = crate::geometry::hex::hex_vertices(Point::new(10.0, 10.0), 5.0);
    let path = hex_path(&v);
    assert_eq!(path.elements().len(), 8);
    assert!(matches!(
        path.elements().last(),
        Some(vello_cpu::kurbo::PathEl::ClosePath)
    ));
}

#[test]
fn premul_bytes_must_match_dimensions() {
    assert!(pixmap_from_premul_bytes(&[0; 8], 2, 2).is_err());
    assert!(pixmap_from_premul_bytes(&[0; 16], 70_000, 1).is_err());
    let pm = pixmap_from_premul_bytes(&[255; 16], 2, 2).unwrap();
    assert_eq!((pm.width(), pm.height()), (2, 2));
}
