#[cfg(test)]
use std::path::{Path, PathBuf};

#[cfg(test)]
use image::{GrayImage, Luma, Rgb, RgbImage, Rgba};

#[cfg(test)]
use hvlib::{
    cfg::get_default_cfg,
    defer_folder_removal,
    extract::extract_true_region,
    file_util,
    overlay::{show_with_boxes, show_with_masks, DirViewer},
    tracing_setup::init_tracing_for_tests,
    DatasetStore, ErrorKind, BB,
};

#[cfg(test)]
fn pattern(folder: &Path, sub: &str) -> String {
    format!("{}/{sub}", file_util::path_to_str(folder).unwrap())
}

/// Three 4x4 images, three box record files, three masks, stems aligned.
#[cfg(test)]
fn make_dataset(name: &str) -> PathBuf {
    let folder = std::env::temp_dir().join(name);
    for sub in ["imgs", "boxes", "masks"] {
        std::fs::create_dir_all(folder.join(sub)).unwrap();
    }
    for idx in 0u8..3 {
        let im = RgbImage::from_fn(4, 4, |x, y| Rgb([40 * idx + 1, x as u8, y as u8]));
        im.save(folder.join(format!("imgs/img_{idx}.png"))).unwrap();
    }
    file_util::write(folder.join("boxes/img_0.txt"), "0 0 2 2\n").unwrap();
    file_util::write(folder.join("boxes/img_1.txt"), "1,1,2,2\n0 0 1 1\n").unwrap();
    file_util::write(folder.join("boxes/img_2.txt"), "").unwrap();
    let all_bg = GrayImage::new(4, 4);
    all_bg.save(folder.join("masks/img_0.png")).unwrap();
    #[rustfmt::skip]
    let top_right = GrayImage::from_raw(4, 4, vec![
        0, 0, 255, 255,
        0, 0, 255, 255,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ])
    .unwrap();
    top_right.save(folder.join("masks/img_1.png")).unwrap();
    let all_fg = GrayImage::from_pixel(4, 4, Luma([255]));
    all_fg.save(folder.join("masks/img_2.png")).unwrap();
    folder
}

#[test]
fn test_load_and_extract() {
    init_tracing_for_tests();
    let folder = make_dataset("handview_testdata_loadextract");
    defer_folder_removal!(&folder);
    let cfg = get_default_cfg();
    let mut store = DatasetStore::new();
    assert_eq!(
        store.image(0).unwrap_err().kind(),
        ErrorKind::NotLoaded
    );
    assert_eq!(store.load_images(&pattern(&folder, "imgs/*.png")).unwrap(), 3);
    assert_eq!(store.load_boxes(&pattern(&folder, "boxes/*.txt")).unwrap(), 3);
    assert_eq!(store.load_masks(&pattern(&folder, "masks/*.png")).unwrap(), 3);
    assert_eq!(store.n_images(), 3);
    assert_eq!(store.n_boxes(), 3);
    assert_eq!(store.n_masks(), 3);

    // filename-sort order and stable repeated access
    assert_eq!(store.image(0).unwrap().to_rgb8().get_pixel(0, 0), &Rgb([1, 0, 0]));
    assert_eq!(store.image(2).unwrap().to_rgb8().get_pixel(0, 0), &Rgb([81, 0, 0]));
    assert_eq!(
        store.image(1).unwrap().to_rgba8().as_raw(),
        store.image(1).unwrap().to_rgba8().as_raw()
    );
    assert_eq!(store.boxes(0).unwrap(), &[BB::from_arr(&[0, 0, 2, 2])]);
    assert_eq!(store.boxes(1).unwrap().len(), 2);
    assert!(store.boxes(2).unwrap().is_empty());

    let region = extract_true_region(&store, 1, &cfg.extract).unwrap();
    let src = store.image(1).unwrap().to_rgba8();
    for y in 0..4 {
        for x in 0..4 {
            if y < 2 && x >= 2 {
                assert_eq!(region.get_pixel(x, y), src.get_pixel(x, y));
            } else {
                assert_eq!(region.get_pixel(x, y), &Rgba([0, 0, 0, 0]));
            }
        }
    }
    // an all-foreground mask reproduces the source image
    let region = extract_true_region(&store, 2, &cfg.extract).unwrap();
    assert_eq!(region.as_raw(), store.image(2).unwrap().to_rgba8().as_raw());
    assert_eq!(
        extract_true_region(&store, 5, &cfg.extract).unwrap_err().kind(),
        ErrorKind::Index
    );
}

#[test]
fn test_failed_reload_preserves_state() {
    init_tracing_for_tests();
    let folder = make_dataset("handview_testdata_reload");
    defer_folder_removal!(&folder);
    let mut store = DatasetStore::new();
    store.load_images(&pattern(&folder, "imgs/*.png")).unwrap();
    let err = store.load_images(&pattern(&folder, "imgs/*.bmp")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Load);
    assert!(store.images_loaded());
    assert_eq!(store.n_images(), 3);
    assert!(store.image(2).is_ok());

    // a decode failure aborts the whole load without committing anything
    file_util::write(folder.join("imgs/img_3.png"), "not a png").unwrap();
    let err = store.load_images(&pattern(&folder, "imgs/*.png")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Load);
    assert_eq!(store.n_images(), 3);
}

#[test]
fn test_malformed_box_record() {
    init_tracing_for_tests();
    let folder = make_dataset("handview_testdata_badrecord");
    defer_folder_removal!(&folder);
    file_util::write(folder.join("boxes/img_1.txt"), "10,20,-5,30\n").unwrap();
    let mut store = DatasetStore::new();
    let err = store.load_boxes(&pattern(&folder, "boxes/*.txt")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(!store.boxes_loaded());
    assert_eq!(store.boxes(0).unwrap_err().kind(), ErrorKind::NotLoaded);
}

#[test]
fn test_overlays_written() {
    init_tracing_for_tests();
    let folder = make_dataset("handview_testdata_overlays");
    defer_folder_removal!(&folder);
    let cfg = get_default_cfg();
    let mut store = DatasetStore::new();
    store.load_images(&pattern(&folder, "imgs/*.png")).unwrap();
    store.load_boxes(&pattern(&folder, "boxes/*.txt")).unwrap();
    store.load_masks(&pattern(&folder, "masks/*.png")).unwrap();
    let out = folder.join("out");
    let mut viewer = DirViewer::new(&out).unwrap();
    assert_eq!(show_with_boxes(&store, &mut viewer, &cfg.overlay).unwrap(), 3);
    assert_eq!(show_with_masks(&store, &mut viewer, &cfg.overlay).unwrap(), 3);
    assert!(out.join("boxes_0000.png").exists());
    assert!(out.join("masks_0002.png").exists());
}
