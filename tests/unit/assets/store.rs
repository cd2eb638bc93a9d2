use super::*;

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn resolve_joins_against_root() {
    let p = resolve_asset_path(Path::new("templates"), "layers\\bg.png").unwrap();
    assert_eq!(p, Path::new("templates").join("layers/bg.png"));
}

#[test]
fn prepared_image_checks_buffer_length() {
    assert!(PreparedImage::new(2, 2, vec![0; 16]).is_ok());
    assert!(PreparedImage::new(2, 2, vec![0; 15]).is_err());
}

#[test]
fn solid_fills_every_pixel() {
    let img = PreparedImage::solid(3, 2, [1, 2, 3, 4]);
    assert_eq!(img.rgba8_premul.len(), 24);
    assert!(img.rgba8_premul.chunks_exact(4).all(|px| px == [1, 2, 3, 4]));
}

#[test]
fn missing_asset_is_a_config_error() {
    let err = read_asset_bytes(Path::new("definitely/not/here.png")).unwrap_err();
    assert!(err.to_string().contains("configuration error"));
}
