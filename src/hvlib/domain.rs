use std::ops::Range;

use image::GenericImageView;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Shape {
    pub w: u32,
    pub h: u32,
}
impl Shape {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
    pub fn from_im<I>(im: &I) -> Self
    where
        I: GenericImageView,
    {
        Self {
            w: im.width(),
            h: im.height(),
        }
    }
}
/// Axis-aligned box given by origin and size in pixel coordinates.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BB {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl BB {
    /// `[x, y, w, h]`
    pub fn from_arr(a: &[u32; 4]) -> Self {
        BB {
            x: a[0],
            y: a[1],
            w: a[2],
            h: a[3],
        }
    }

    pub fn shape(&self) -> Shape {
        Shape {
            w: self.w,
            h: self.h,
        }
    }

    pub fn x_range(&self) -> Range<u32> {
        self.x..(self.x + self.w)
    }

    pub fn y_range(&self) -> Range<u32> {
        self.y..(self.y + self.h)
    }

    pub fn contains(&self, p: (u32, u32)) -> bool {
        let (px, py) = p;
        self.x_range().contains(&px) && self.y_range().contains(&py)
    }

    pub fn is_contained_in_image(&self, shape: Shape) -> bool {
        self.x + self.w <= shape.w && self.y + self.h <= shape.h
    }
}

#[test]
fn test_bb() {
    let bb = BB::from_arr(&[10, 10, 10, 10]);
    assert!(bb.contains((10, 10)));
    assert!(bb.contains((19, 19)));
    assert!(!bb.contains((20, 20)));
    assert!(!bb.contains((9, 15)));
    assert_eq!(bb.x_range(), 10..20);
    assert_eq!(bb.y_range(), 10..20);
    assert_eq!(bb.shape(), Shape::new(10, 10));
    assert!(bb.is_contained_in_image(Shape::new(20, 20)));
    assert!(!bb.is_contained_in_image(Shape::new(20, 19)));
    let empty = BB::from_arr(&[3, 4, 0, 0]);
    assert!(!empty.contains((3, 4)));
    assert_eq!(empty.x_range(), 3..3);
}
