use image::Rgb;

use crate::hverr;
use crate::result::{to_hv, ErrorKind};
use crate::types::ResultImage;

pub fn read_image(path: &str) -> ResultImage {
    image::ImageReader::open(path)
        .map_err(to_hv(ErrorKind::Load))?
        .with_guessed_format()
        .map_err(to_hv(ErrorKind::Load))?
        .decode()
        .map_err(|e| hverr!(ErrorKind::Load, "could not decode image {:?}. {:?}", path, e))
}

pub fn to_01(x: u8) -> f32 {
    x as f32 / 255.0
}

pub fn apply_alpha(pixel_rgb: &[u8; 3], color: &[u8; 3], alpha: u8) -> Rgb<u8> {
    let alpha_amount = to_01(alpha);
    let apply_alpha_scalar = |x_anno, x_res| {
        ((to_01(x_anno) * alpha_amount + (1.0 - alpha_amount) * to_01(x_res)) * 255.0) as u8
    };
    let [r_pixel, g_pixel, b_pixel] = pixel_rgb;
    let [r_clr, g_clr, b_clr] = color;
    Rgb([
        apply_alpha_scalar(*r_clr, *r_pixel),
        apply_alpha_scalar(*g_clr, *g_pixel),
        apply_alpha_scalar(*b_clr, *b_pixel),
    ])
}

#[test]
fn test_apply_alpha() {
    assert_eq!(apply_alpha(&[10, 20, 30], &[10, 20, 30], 255), Rgb([10, 20, 30]));
    assert_eq!(apply_alpha(&[10, 20, 30], &[255, 0, 0], 0), Rgb([10, 20, 30]));
    let full = apply_alpha(&[10, 20, 30], &[255, 0, 0], 255);
    assert_eq!(full, Rgb([255, 0, 0]));
}

#[test]
fn test_read_image_missing() {
    let err = read_image("definitely/not/there.png").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Load);
}
