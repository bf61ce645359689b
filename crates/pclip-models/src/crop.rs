//! Planned per-frame crop rectangles.

use serde::{Deserialize, Serialize};

/// Crop rectangle in source-pixel coordinates (integer, even dimensions
/// for codec compatibility).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge x-coordinate
    pub x: i32,
    /// Top edge y-coordinate
    pub y: i32,
    /// Crop width
    pub width: i32,
    /// Crop height
    pub height: i32,
}

impl CropRect {
    /// Create a new crop rectangle.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Width/height ratio.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Whether the rectangle lies fully inside a frame of the given size.
    pub fn within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width > 0
            && self.height > 0
            && self.x + self.width <= frame_width as i32
            && self.y + self.height <= frame_height as i32
    }
}

/// Planner state for one output frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropState {
    /// Following an active speaker track
    Tracking,
    /// Active track briefly lost; previous rectangle held
    Frozen,
    /// No confident speaker; centered framing
    Fallback,
}

/// One frame of the planned crop path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropFrame {
    /// Output frame index (0-based, clip-relative)
    pub frame: u32,
    /// Active track id, if any
    pub track_id: Option<u32>,
    /// Crop rectangle for this frame
    pub rect: CropRect,
    /// Planner state for this frame
    pub state: CropState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_bounds() {
        let r = CropRect::new(0, 0, 608, 1080);
        assert!(r.within(1920, 1080));
        assert!(!r.within(600, 1080));

        let off = CropRect::new(1400, 0, 608, 1080);
        assert!(!off.within(1920, 1080));
    }

    #[test]
    fn test_center() {
        let r = CropRect::new(100, 0, 608, 1080);
        let (cx, cy) = r.center();
        assert!((cx - 404.0).abs() < f64::EPSILON);
        assert!((cy - 540.0).abs() < f64::EPSILON);
    }
}
