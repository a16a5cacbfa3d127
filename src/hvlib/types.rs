use image::{DynamicImage, ImageBuffer, Luma, Rgb, Rgba};

use crate::result::HvResult;

/// Render target handed to a [`Viewer`](crate::overlay::Viewer).
pub type ViewImage = ImageBuffer<Rgb<u8>, Vec<u8>>;
/// Single-channel ground-truth mask, binary up to thresholding.
pub type MaskImage = ImageBuffer<Luma<u8>, Vec<u8>>;
/// Extraction output, transparent where the mask is background.
pub type RegionImage = ImageBuffer<Rgba<u8>, Vec<u8>>;

pub type ResultImage = HvResult<DynamicImage>;
