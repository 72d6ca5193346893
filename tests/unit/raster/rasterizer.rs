use super::*;
use crate::foundation::core::is_blank;
use crate::sketch::model::Stroke;

fn zigzag() -> Sketch {
    Sketch::new(vec![
        Stroke::from_xy(&[30, 90, 150, 210], &[40, 200, 40, 200]),
        Stroke::from_xy(&[60, 180], &[120, 120]),
    ])
}

#[test]
fn empty_and_degenerate_sketches_render_blank() {
    let r = Rasterizer::default();
    let cases = [
        Sketch::default(),
        Sketch::new(vec![Stroke::default()]),
        Sketch::new(vec![
            Stroke::from_xy(&[10], &[10]),
            Stroke::from_xy(&[200], &[30]),
        ]),
    ];
    for sketch in cases {
        let img = r.render(&sketch);
        assert_eq!(img.dimensions(), (64, 64));
        assert!(is_blank(&img));
    }
}

#[test]
fn collapsed_region_renders_blank() {
    let r = Rasterizer::new(RasterConfig {
        padding: 0,
        ..RasterConfig::default()
    })
    .unwrap();
    // Horizontal line without padding has zero height.
    let sketch = Sketch::new(vec![Stroke::from_xy(&[10, 90], &[40, 40])]);
    assert_eq!(r.region_for(&sketch), None);
    assert!(is_blank(&r.render(&sketch)));

    // Off-canvas content collapses after clamping.
    let off = Sketch::new(vec![Stroke::from_xy(&[400, 500], &[400, 420])]);
    assert!(is_blank(&Rasterizer::default().render(&off)));
}

#[test]
fn output_size_is_total() {
    let r = Rasterizer::default();
    let sketches = [
        zigzag(),
        Sketch::new(vec![Stroke::from_xy(&[0, 255], &[0, 255])]),
        Sketch::new(vec![Stroke::from_xy(&[128, 129], &[128, 128])]),
        Sketch::new(vec![Stroke::from_xy(&[0, 0], &[0, 255])]),
        Sketch::new(vec![Stroke::from_xy(&[-20, 300], &[-5, 999])]),
    ];
    for sketch in &sketches {
        assert_eq!(r.render(sketch).dimensions(), (64, 64));
    }

    let r28 = Rasterizer::new(RasterConfig {
        output_size: 28,
        ..RasterConfig::default()
    })
    .unwrap();
    for sketch in &sketches {
        assert_eq!(r28.render(sketch).dimensions(), (28, 28));
    }
}

#[test]
fn render_is_deterministic() {
    let r = Rasterizer::default();
    let a = r.render(&zigzag());
    let b = r.render(&zigzag());
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn render_draws_dark_strokes_on_white() {
    let img = Rasterizer::default().render(&zigzag());
    assert!(!is_blank(&img));
    let darkest = img.as_raw().iter().copied().min().unwrap();
    assert!(darkest < 64, "darkest pixel {darkest}");
    // Corners are padding.
    assert_eq!(img.get_pixel(0, 0).0[0], 255);
    assert_eq!(img.get_pixel(63, 63).0[0], 255);
}

#[test]
fn wide_sketch_is_vertically_centered() {
    let r = Rasterizer::new(RasterConfig {
        output_size: 64,
        padding: 0,
        line_width: 2.0,
        canvas_limit: 255,
    })
    .unwrap();
    // 64 px wide, 32 px tall box outline: square side 64, vertical offset 16, no resize.
    let sketch = Sketch::new(vec![Stroke::from_xy(
        &[0, 63, 63, 0, 0],
        &[0, 0, 31, 31, 0],
    )]);
    let img = r.render(&sketch);
    assert_eq!(img.dimensions(), (64, 64));
    for x in 0..64 {
        assert_eq!(img.get_pixel(x, 8).0[0], 255);
        assert_eq!(img.get_pixel(x, 56).0[0], 255);
    }
    assert!(img.get_pixel(32, 16).0[0] < 128);
    assert!(img.get_pixel(32, 47).0[0] < 128);
    assert_eq!(img.get_pixel(32, 32).0[0], 255);
}

#[test]
fn render_does_not_depend_on_degenerate_strokes() {
    let r = Rasterizer::default();
    let mut strokes = zigzag().strokes().to_vec();
    strokes.push(Stroke::from_xy(&[250], &[250]));
    let with_dot = Sketch::new(strokes);
    assert_eq!(r.render(&with_dot), r.render(&zigzag()));
}

#[test]
fn new_rejects_invalid_config() {
    assert!(
        Rasterizer::new(RasterConfig {
            output_size: 0,
            ..RasterConfig::default()
        })
        .is_err()
    );
}
