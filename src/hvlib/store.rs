use std::path::Path;

use image::DynamicImage;
use tracing::warn;

use crate::box_io;
use crate::domain::BB;
use crate::file_util;
use crate::glob;
use crate::hverr;
use crate::image_util;
use crate::result::{ErrorKind, HvResult};
use crate::types::MaskImage;

/// One of the three independently loaded collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    Images,
    Boxes,
    Masks,
}

/// Owns the three index-aligned collections of the dataset together with
/// their load-state flags. `images[i]`, `boxes[i]` and `masks[i]` describe
/// the same sample; the alignment comes from loading the three patterns in
/// corresponding filename-sort order and is the caller's responsibility.
#[derive(Default)]
pub struct DatasetStore {
    imgs: Vec<DynamicImage>,
    hand_boxes: Vec<Vec<BB>>,
    true_masks: Vec<MaskImage>,
    img_stems: Vec<String>,
    box_stems: Vec<String>,
    mask_stems: Vec<String>,
    imgs_loaded: bool,
    boxes_loaded: bool,
    masks_loaded: bool,
}

fn expand(pattern: &str) -> HvResult<Vec<String>> {
    let paths = glob::glob_paths(pattern)?;
    if paths.is_empty() {
        Err(hverr!(
            ErrorKind::Load,
            "pattern {:?} did not match any file",
            pattern
        ))
    } else {
        Ok(paths)
    }
}

fn stems_of(paths: &[String]) -> HvResult<Vec<String>> {
    paths
        .iter()
        .map(|p| Ok(file_util::to_stem_str(Path::new(p))?.to_string()))
        .collect()
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads all images the pattern matches, in filename-sort order. Nothing
    /// is committed unless every match decodes, so a set flag never means
    /// "partially loaded" and a failed reload keeps the previous collection.
    pub fn load_images(&mut self, pattern: &str) -> HvResult<usize> {
        let paths = expand(pattern)?;
        let imgs = paths
            .iter()
            .map(|p| image_util::read_image(p))
            .collect::<HvResult<Vec<_>>>()?;
        self.img_stems = stems_of(&paths)?;
        self.imgs = imgs;
        self.imgs_loaded = true;
        self.warn_on_stem_mismatch();
        Ok(self.imgs.len())
    }

    /// Loads the per-image hand box lists, one record file per image.
    pub fn load_boxes(&mut self, pattern: &str) -> HvResult<usize> {
        let paths = expand(pattern)?;
        let hand_boxes = paths
            .iter()
            .map(|p| box_io::read_boxes(p))
            .collect::<HvResult<Vec<_>>>()?;
        self.box_stems = stems_of(&paths)?;
        self.hand_boxes = hand_boxes;
        self.boxes_loaded = true;
        self.warn_on_stem_mismatch();
        Ok(self.hand_boxes.len())
    }

    /// Loads the ground-truth masks, converting each match to a single
    /// channel.
    pub fn load_masks(&mut self, pattern: &str) -> HvResult<usize> {
        let paths = expand(pattern)?;
        let true_masks = paths
            .iter()
            .map(|p| image_util::read_image(p).map(|im| im.to_luma8()))
            .collect::<HvResult<Vec<_>>>()?;
        self.mask_stems = stems_of(&paths)?;
        self.true_masks = true_masks;
        self.masks_loaded = true;
        self.warn_on_stem_mismatch();
        Ok(self.true_masks.len())
    }

    pub fn n_images(&self) -> usize {
        self.imgs.len()
    }
    pub fn n_boxes(&self) -> usize {
        self.hand_boxes.len()
    }
    pub fn n_masks(&self) -> usize {
        self.true_masks.len()
    }

    pub fn images_loaded(&self) -> bool {
        self.imgs_loaded
    }
    pub fn boxes_loaded(&self) -> bool {
        self.boxes_loaded
    }
    pub fn masks_loaded(&self) -> bool {
        self.masks_loaded
    }

    pub fn image(&self, idx: usize) -> HvResult<&DynamicImage> {
        Self::checked_get(&self.imgs, self.imgs_loaded, idx, Stream::Images)
    }

    pub fn boxes(&self, idx: usize) -> HvResult<&[BB]> {
        Self::checked_get(&self.hand_boxes, self.boxes_loaded, idx, Stream::Boxes)
            .map(|bbs| bbs.as_slice())
    }

    pub fn mask(&self, idx: usize) -> HvResult<&MaskImage> {
        Self::checked_get(&self.true_masks, self.masks_loaded, idx, Stream::Masks)
    }

    fn checked_get<T>(elts: &[T], loaded: bool, idx: usize, stream: Stream) -> HvResult<&T> {
        if !loaded {
            return Err(hverr!(
                ErrorKind::NotLoaded,
                "{:?} have not been loaded",
                stream
            ));
        }
        elts.get(idx).ok_or_else(|| {
            hverr!(
                ErrorKind::Index,
                "index {} out of range, {} {:?} loaded",
                idx,
                elts.len(),
                stream
            )
        })
    }

    /// Index alignment across streams cannot be enforced structurally since
    /// the three patterns are expanded independently. Corresponding file
    /// stems are a strong hint that the alignment holds, so a mismatch is
    /// reported, but only as a warning.
    fn warn_on_stem_mismatch(&self) {
        let streams = [
            (Stream::Images, &self.img_stems, self.imgs_loaded),
            (Stream::Boxes, &self.box_stems, self.boxes_loaded),
            (Stream::Masks, &self.mask_stems, self.masks_loaded),
        ];
        for (i, (stream_a, stems_a, loaded_a)) in streams.iter().enumerate() {
            for (stream_b, stems_b, loaded_b) in streams.iter().skip(i + 1) {
                if !(*loaded_a && *loaded_b) {
                    continue;
                }
                let mismatch = stems_a
                    .iter()
                    .zip(stems_b.iter())
                    .enumerate()
                    .find(|(_, (a, b))| a != b);
                if let Some((idx, (a, b))) = mismatch {
                    warn!(
                        "stems of {stream_a:?} and {stream_b:?} differ at index {idx}, {a:?} vs {b:?}, samples might be misaligned"
                    );
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn from_collections(
        imgs: Option<Vec<DynamicImage>>,
        hand_boxes: Option<Vec<Vec<BB>>>,
        true_masks: Option<Vec<MaskImage>>,
    ) -> Self {
        let mut store = Self::new();
        if let Some(imgs) = imgs {
            store.imgs = imgs;
            store.imgs_loaded = true;
        }
        if let Some(hand_boxes) = hand_boxes {
            store.hand_boxes = hand_boxes;
            store.boxes_loaded = true;
        }
        if let Some(true_masks) = true_masks {
            store.true_masks = true_masks;
            store.masks_loaded = true;
        }
        store
    }
}

#[test]
fn test_accessors_gated() {
    let store = DatasetStore::new();
    assert_eq!(store.n_images(), 0);
    assert_eq!(store.n_boxes(), 0);
    assert_eq!(store.n_masks(), 0);
    assert_eq!(store.image(0).unwrap_err().kind(), ErrorKind::NotLoaded);
    assert_eq!(store.boxes(0).unwrap_err().kind(), ErrorKind::NotLoaded);
    assert_eq!(store.mask(0).unwrap_err().kind(), ErrorKind::NotLoaded);

    let store = DatasetStore::from_collections(Some(vec![]), Some(vec![vec![]]), None);
    assert_eq!(store.image(0).unwrap_err().kind(), ErrorKind::Index);
    assert!(store.boxes(0).unwrap().is_empty());
    assert_eq!(store.boxes(1).unwrap_err().kind(), ErrorKind::Index);
    assert_eq!(store.mask(0).unwrap_err().kind(), ErrorKind::NotLoaded);
}

#[test]
fn test_zero_matches_is_load_error() {
    let mut store = DatasetStore::new();
    let err = store.load_images("definitely/not/there/*.png").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Load);
    assert!(!store.images_loaded());
}
