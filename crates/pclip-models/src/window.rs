//! Clip time windows selected by the moment-identification collaborator.

use serde::{Deserialize, Serialize};

/// A candidate clip window, absolute seconds in the source video.
///
/// Windows are at most 60 seconds and non-overlapping by collaborator
/// contract; neither property is re-validated here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipWindow {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl ClipWindow {
    /// Create a new clip window.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Window duration in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Whether an absolute time falls in `[start, end)`.
    pub fn contains(&self, abs_secs: f64) -> bool {
        abs_secs >= self.start && abs_secs < self.end
    }

    /// Shift an absolute time to clip-relative seconds.
    pub fn relative(&self, abs_secs: f64) -> f64 {
        abs_secs - self.start
    }

    /// Number of output frames at the given frame rate.
    pub fn frame_count(&self, fps: f64) -> u32 {
        (self.duration() * fps).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let w = ClipWindow::new(10.0, 40.0);
        assert!(w.contains(10.0));
        assert!(w.contains(39.999));
        assert!(!w.contains(40.0));
        assert!(!w.contains(9.999));
    }

    #[test]
    fn test_frame_count() {
        let w = ClipWindow::new(10.0, 40.0);
        assert_eq!(w.frame_count(30.0), 900);
    }

    #[test]
    fn test_relative_shift() {
        let w = ClipWindow::new(10.0, 40.0);
        assert!((w.relative(12.3) - 2.3).abs() < 1e-9);
    }
}
