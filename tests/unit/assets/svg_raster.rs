use super::*;
use crate::assets::decode::parse_svg;

const RED_SQUARE: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect width="4" height="4" fill="#ff0000"/></svg>"##;

#[test]
fn rasterizes_at_requested_size() {
    let tree = parse_svg(RED_SQUARE).unwrap();
    let img = rasterize_svg(&tree, 16, 8).unwrap();
    assert_eq!((img.width(), img.height()), (16, 8));
    assert_eq!(&img.rgba8_premul()[..4], &[255, 0, 0, 255]);
}

#[test]
fn rejects_degenerate_sizes() {
    let tree = parse_svg(RED_SQUARE).unwrap();
    assert!(rasterize_svg(&tree, 0, 8).is_err());
    assert!(rasterize_svg(&tree, 10_000, 8).is_err());
}
