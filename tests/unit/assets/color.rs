use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: ColorDef = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, ColorDef::rgba(1.0, 0.0, 0.0, 1.0));

    let c: ColorDef = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);

    assert!(serde_json::from_value::<ColorDef>(json!("#12")).is_err());
}

#[test]
fn parses_rgba_object_and_array() {
    let c: ColorDef = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, ColorDef::rgba(0.25, 0.5, 0.75, 1.0));

    let c: ColorDef = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, ColorDef::rgba(0.25, 0.5, 0.75, 0.9));
}

#[test]
fn argb_floats_reorder_channels() {
    let c = ColorDef::from_argb([1.0, 1.0, 0.0, 0.0]);
    assert_eq!(c.to_rgba8(), [255, 0, 0, 255]);
}

#[test]
fn argb_floats_truncate_to_bytes() {
    let c = ColorDef::from_argb([1.0, 0.5, 0.5, 0.5]);
    assert_eq!(c.to_rgba8(), [127, 127, 127, 255]);
    let c = ColorDef::from_argb([0.999, 0.2, 0.7, 1.5]);
    assert_eq!(c.to_rgba8(), [51, 178, 255, 254]);
    // Hex colours stay exact.
    let c: ColorDef = serde_json::from_value(json!("#808080")).unwrap();
    assert_eq!(c.to_rgba8(), [128, 128, 128, 255]);
}

#[test]
fn default_is_opaque_black() {
    assert_eq!(ColorDef::default().to_rgba8(), [0, 0, 0, 255]);
}

#[test]
fn premul_conversion_scales_by_alpha() {
    let c = ColorDef::rgba(1.0, 1.0, 1.0, 0.5).to_rgba8_premul();
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
}
