use std::fs;
use std::path::PathBuf;

use image::{DynamicImage, Rgb};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

use crate::domain::BB;
use crate::extract::binarize;
use crate::hverr;
use crate::image_util::apply_alpha;
use crate::result::{ErrorKind, HvResult};
use crate::store::DatasetStore;
use crate::types::{MaskImage, ViewImage};

fn default_color() -> [u8; 3] {
    [255, 0, 0]
}
fn default_alpha() -> u8 {
    120
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayOptions {
    #[serde(default = "default_color")]
    pub color: [u8; 3],
    #[serde(default = "default_alpha")]
    pub alpha: u8,
    #[serde(default)]
    pub threshold: u8,
}
impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            color: default_color(),
            alpha: default_alpha(),
            threshold: 0,
        }
    }
}

/// Anything that can present a rendered frame. `show` returns once the
/// consumer is ready for the next frame, e.g. after a keypress in a windowed
/// implementation.
pub trait Viewer {
    fn show(&mut self, name: &str, im: &ViewImage) -> HvResult<()>;
}

/// Headless [`Viewer`](Viewer) writing each frame as `<name>.png` into a
/// folder.
pub struct DirViewer {
    out_folder: PathBuf,
}
impl DirViewer {
    pub fn new(out_folder: impl Into<PathBuf>) -> HvResult<Self> {
        let out_folder = out_folder.into();
        fs::create_dir_all(&out_folder).map_err(|e| {
            hverr!(
                ErrorKind::Load,
                "could not create {:?} due to {:?}",
                out_folder,
                e
            )
        })?;
        Ok(Self { out_folder })
    }
}
impl Viewer for DirViewer {
    fn show(&mut self, name: &str, im: &ViewImage) -> HvResult<()> {
        let path = self.out_folder.join(format!("{name}.png"));
        im.save(&path)
            .map_err(|e| hverr!(ErrorKind::Load, "could not write {:?} due to {:?}", path, e))
    }
}

pub fn render_boxes(img: &DynamicImage, boxes: &[BB], opts: &OverlayOptions) -> ViewImage {
    let mut im = img.to_rgb8();
    for bb in boxes {
        if bb.w == 0 || bb.h == 0 {
            continue;
        }
        draw_hollow_rect_mut(
            &mut im,
            Rect::at(bb.x as i32, bb.y as i32).of_size(bb.w, bb.h),
            Rgb(opts.color),
        );
    }
    im
}

pub fn render_mask(img: &DynamicImage, mask: &MaskImage, opts: &OverlayOptions) -> ViewImage {
    let mut im = img.to_rgb8();
    let bin = binarize(mask, opts.threshold);
    for (x, y, p) in bin.enumerate_pixels() {
        if p.0[0] > 0 && x < im.width() && y < im.height() {
            let pixel = im.get_pixel(x, y).0;
            im.put_pixel(x, y, apply_alpha(&pixel, &opts.color, opts.alpha));
        }
    }
    im
}

/// Walks the common index range of images and boxes, rendering each image
/// with its hand boxes and handing the frame to the viewer.
pub fn show_with_boxes(
    store: &DatasetStore,
    viewer: &mut impl Viewer,
    opts: &OverlayOptions,
) -> HvResult<usize> {
    if !store.images_loaded() || !store.boxes_loaded() {
        return Err(hverr!(
            ErrorKind::NotLoaded,
            "box overlays need images and boxes, loaded are images: {}, boxes: {}",
            store.images_loaded(),
            store.boxes_loaded()
        ));
    }
    let n = store.n_images().min(store.n_boxes());
    for idx in 0..n {
        let im = render_boxes(store.image(idx)?, store.boxes(idx)?, opts);
        viewer.show(&format!("boxes_{idx:04}"), &im)?;
    }
    Ok(n)
}

/// As [`show_with_boxes`](show_with_boxes) with the binarized mask blended
/// over each image.
pub fn show_with_masks(
    store: &DatasetStore,
    viewer: &mut impl Viewer,
    opts: &OverlayOptions,
) -> HvResult<usize> {
    if !store.images_loaded() || !store.masks_loaded() {
        return Err(hverr!(
            ErrorKind::NotLoaded,
            "mask overlays need images and masks, loaded are images: {}, masks: {}",
            store.images_loaded(),
            store.masks_loaded()
        ));
    }
    let n = store.n_images().min(store.n_masks());
    for idx in 0..n {
        let im = render_mask(store.image(idx)?, store.mask(idx)?, opts);
        viewer.show(&format!("masks_{idx:04}"), &im)?;
    }
    Ok(n)
}

#[cfg(test)]
use {crate::defer_folder_removal, image::Luma};

#[cfg(test)]
fn gray_test_image(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(image::RgbImage::from_pixel(w, h, Rgb([100, 100, 100])))
}

#[test]
fn test_render_boxes() {
    let img = gray_test_image(10, 10);
    let boxes = vec![BB::from_arr(&[2, 3, 4, 3]), BB::from_arr(&[0, 0, 0, 5])];
    let im = render_boxes(&img, &boxes, &OverlayOptions::default());
    // outline on, inside and outside untouched
    assert_eq!(im.get_pixel(2, 3), &Rgb([255, 0, 0]));
    assert_eq!(im.get_pixel(5, 5), &Rgb([255, 0, 0]));
    assert_eq!(im.get_pixel(3, 4), &Rgb([100, 100, 100]));
    assert_eq!(im.get_pixel(9, 9), &Rgb([100, 100, 100]));
    assert_eq!(im.get_pixel(0, 0), &Rgb([100, 100, 100]));
}

#[test]
fn test_render_mask() {
    let img = gray_test_image(2, 2);
    let mask = MaskImage::from_raw(2, 2, vec![0, 0, 0, 200]).unwrap();
    let opts = OverlayOptions {
        alpha: 255,
        ..Default::default()
    };
    let im = render_mask(&img, &mask, &opts);
    assert_eq!(im.get_pixel(0, 0), &Rgb([100, 100, 100]));
    assert_eq!(im.get_pixel(1, 1), &Rgb([255, 0, 0]));
}

#[test]
fn test_dir_viewer_and_show() {
    let folder = std::env::temp_dir().join("handview_testdata_overlay");
    defer_folder_removal!(&folder);
    let store = DatasetStore::from_collections(
        Some(vec![gray_test_image(4, 4), gray_test_image(4, 4)]),
        Some(vec![vec![BB::from_arr(&[0, 0, 2, 2])], vec![]]),
        Some(vec![
            MaskImage::new(4, 4),
            MaskImage::from_pixel(4, 4, Luma([255])),
        ]),
    );
    let mut viewer = DirViewer::new(&folder).unwrap();
    let n = show_with_boxes(&store, &mut viewer, &OverlayOptions::default()).unwrap();
    assert_eq!(n, 2);
    let n = show_with_masks(&store, &mut viewer, &OverlayOptions::default()).unwrap();
    assert_eq!(n, 2);
    for name in ["boxes_0000", "boxes_0001", "masks_0000", "masks_0001"] {
        assert!(folder.join(format!("{name}.png")).exists());
    }
    let empty = DatasetStore::new();
    let err = show_with_boxes(&empty, &mut viewer, &OverlayOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotLoaded);
}
