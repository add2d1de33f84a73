use serde::{Deserialize, Serialize};

/// Axis-aligned box in frame pixel coordinates.
#[derive(Clone, Copy, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x_1: f64,
    pub y_1: f64,
    pub x_2: f64,
    pub y_2: f64,
}

/// Integer pixel rectangle handed to the identity resolver.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl BBox {
    pub fn new(x_1: f64, y_1: f64, x_2: f64, y_2: f64) -> Self {
        if x_1 > x_2 || y_1 > y_2 || [x_1, y_1, x_2, y_2].iter().any(|v| !v.is_finite()) {
            return BBox::default();
        };
        BBox { x_1, y_1, x_2, y_2 }
    }

    pub fn width(&self) -> f64 {
        (self.x_2 - self.x_1).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.y_2 - self.y_1).max(0.0)
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Clamps the box to a `frame_width` x `frame_height` frame and snaps it
    /// outwards to whole pixels.
    pub fn crop_region(&self, frame_width: u32, frame_height: u32) -> CropRegion {
        let clamp = |v: f64, max: u32| v.clamp(0.0, max as f64);

        let x_1 = clamp(self.x_1.floor(), frame_width);
        let y_1 = clamp(self.y_1.floor(), frame_height);
        let x_2 = clamp(self.x_2.ceil(), frame_width);
        let y_2 = clamp(self.y_2.ceil(), frame_height);

        CropRegion {
            x: x_1 as u32,
            y: y_1 as u32,
            width: (x_2 - x_1).max(0.0) as u32,
            height: (y_2 - y_1).max(0.0) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_new_bbox_returns_zero_bbox() {
        let bbox = BBox::new(3.0, 4.0, 2.0, 5.0);

        assert_eq!(bbox, BBox::default());
    }

    #[test]
    fn test_non_finite_bbox_returns_zero_bbox() {
        let bbox = BBox::new(0.0, f64::NAN, 2.0, 5.0);

        assert_eq!(bbox.area(), 0.0);
    }

    #[test]
    fn test_crop_region_snaps_to_pixels() {
        let bbox = BBox::new(1.4, 2.6, 10.2, 20.0);

        assert_eq!(
            bbox.crop_region(640, 480),
            CropRegion {
                x: 1,
                y: 2,
                width: 10,
                height: 18
            }
        );
    }

    #[test]
    fn test_crop_region_is_clamped_to_frame() {
        let bbox = BBox::new(600.0, 400.0, 700.0, 500.0);
        let region = bbox.crop_region(640, 480);

        assert_eq!(region.x, 600);
        assert_eq!(region.width, 40);
        assert_eq!(region.height, 80);
    }

    #[test]
    fn test_crop_region_outside_frame_is_empty() {
        let bbox = BBox::new(700.0, 10.0, 720.0, 30.0);

        assert!(bbox.crop_region(640, 480).is_empty());
    }
}
