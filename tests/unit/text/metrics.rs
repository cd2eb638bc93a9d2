use super::*;

fn system_font() -> Option<FontHandle> {
    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    std::env::var("LAYERFILL_TEST_FONT")
        .ok()
        .into_iter()
        .chain(candidates.iter().map(|s| (*s).to_owned()))
        .find_map(|p| FontHandle::load(p).ok())
}

#[test]
fn missing_font_is_a_font_error() {
    let err = FontHandle::load("no/such/font.ttf").unwrap_err();
    assert!(matches!(err, LayerfillError::Font(_)), "{err}");
}

#[test]
fn empty_or_garbage_font_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty.ttf");
    std::fs::write(&empty, b"").unwrap();
    assert!(matches!(
        FontHandle::load(&empty).unwrap_err(),
        LayerfillError::Font(_)
    ));

    let garbage = dir.path().join("garbage.ttf");
    std::fs::write(&garbage, b"definitely not a font file").unwrap();
    let handle = FontHandle::load(&garbage).unwrap();
    assert!(matches!(
        TextShaper::new(&handle).err(),
        Some(LayerfillError::Font(_))
    ));
}

#[test]
fn brush_comes_from_straight_rgba() {
    let b = TextBrushRgba8::from(ColorDef::rgba(1.0, 0.0, 0.0, 0.5));
    assert_eq!(b, TextBrushRgba8 { r: 255, g: 0, b: 0, a: 128 });
    assert_eq!(
        TextBrushRgba8::from(ColorDef::default()),
        TextBrushRgba8 { r: 0, g: 0, b: 0, a: 255 }
    );
}

#[test]
fn shaped_widths_follow_glyph_metrics() {
    let Some(font) = system_font() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let mut shaper = TextShaper::new(&font).unwrap();

    assert_eq!(shaper.measure_width("", 24.0).unwrap(), 0.0);

    let narrow = shaper.measure_width("iiii", 24.0).unwrap();
    let wide = shaper.measure_width("WWWW", 24.0).unwrap();
    assert!(narrow > 0.0);
    assert!(wide > narrow, "{wide} <= {narrow}");

    let small = shaper.measure_width("Hello", 10.0).unwrap();
    let large = shaper.measure_width("Hello", 20.0).unwrap();
    assert!((large - 2.0 * small).abs() < 3.0, "{small} vs {large}");

    assert_eq!(shaper.measure_width("   ", 24.0).unwrap(), 0.0);

    assert!(shaper.measure_width("x", 0.0).is_err());
}
