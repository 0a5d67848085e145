//! Integration tests: figure geometry → rasterized pixels.

use pretty_assertions::assert_eq;
use sketch_core::{
    Bitmap, Color, Figure, ImageFormat, Pen, Point, decode_data_url, draw_figure, encode_data_url,
};

const INK: Color = Color::rgb(10, 120, 200);

fn canvas() -> Bitmap {
    Bitmap::new(100, 100, Color::WHITE)
}

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

#[test]
fn filled_triangle_is_symmetric_about_apex() {
    let mut bmp = canvas();
    let figure = Figure::triangle(p(50.0, 10.0), p(80.0, 90.0));
    draw_figure(&mut bmp, &figure, &Pen::filled(INK));

    for y in (15..90).step_by(5) {
        for dx in 0..30 {
            assert_eq!(
                bmp.pixel(50 + dx, y),
                bmp.pixel(49 - dx, y),
                "row {y}, offset {dx}"
            );
        }
    }
    assert_eq!(bmp.pixel(50, 85), Some(INK));
    assert_eq!(bmp.pixel(10, 85), Some(Color::WHITE));
}

#[test]
fn outlined_triangle_is_symmetric_and_hollow() {
    let mut bmp = canvas();
    let figure = Figure::triangle(p(50.0, 10.0), p(80.0, 90.0));
    draw_figure(&mut bmp, &figure, &Pen::stroke(INK, 4.0));

    for y in (15..90).step_by(5) {
        for dx in 0..35 {
            assert_eq!(
                bmp.pixel(50 + dx, y),
                bmp.pixel(49 - dx, y),
                "row {y}, offset {dx}"
            );
        }
    }
    // Both slanted edges are inked, the interior is not.
    assert_eq!(bmp.pixel(68, 60), Some(INK));
    assert_eq!(bmp.pixel(31, 60), Some(INK));
    assert_eq!(bmp.pixel(50, 60), Some(Color::WHITE));
}

#[test]
fn wide_polygon_outline_contains_thin_one() {
    let figure = Figure::polygon(p(50.0, 50.0), p(80.0, 50.0), 5);
    let mut thin = canvas();
    draw_figure(&mut thin, &figure, &Pen::stroke(INK, 2.0));
    let mut wide = canvas();
    draw_figure(&mut wide, &figure, &Pen::stroke(INK, 10.0));

    assert!(wide.count_color(INK) > thin.count_color(INK));
    for y in 0..100 {
        for x in 0..100 {
            if thin.pixel(x, y) == Some(INK) {
                assert_eq!(wide.pixel(x, y), Some(INK), "pixel ({x}, {y})");
            }
        }
    }
    // The mitered vertex at angle 0 is solid; the center stays open.
    assert_eq!(wide.pixel(75, 50), Some(INK));
    assert_eq!(wide.pixel(50, 50), Some(Color::WHITE));
}

#[test]
fn rendered_shapes_survive_png_roundtrip() {
    let mut bmp = canvas();
    draw_figure(
        &mut bmp,
        &Figure::line(p(0.0, 0.0), p(100.0, 100.0)),
        &Pen::stroke(INK, 3.0),
    );
    let url = encode_data_url(&bmp, ImageFormat::Png).unwrap();
    assert_eq!(decode_data_url(&url).unwrap(), bmp);
}
