use super::*;
use crate::assets::decode::parse_svg;

const RED_SQUARE: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
<rect x="0" y="0" width="10" height="10" fill="#ff0000"/>
</svg>"##;

#[test]
fn svg_is_stretched_to_requested_size() {
    let tree = parse_svg(RED_SQUARE).unwrap();
    let img = rasterize_svg(&tree, 40, 20).unwrap();
    assert_eq!((img.width, img.height), (40, 20));
    assert_eq!(img.rgba8_premul.len(), 40 * 20 * 4);

    let center = (10 * 40 + 20) * 4;
    assert_eq!(&img.rgba8_premul[center..center + 4], &[255, 0, 0, 255]);
}

#[test]
fn zero_or_huge_sizes_are_rejected() {
    let tree = parse_svg(RED_SQUARE).unwrap();
    assert!(rasterize_svg(&tree, 0, 10).is_err());
    assert!(rasterize_svg(&tree, MAX_DIM + 1, 10).is_err());
}
