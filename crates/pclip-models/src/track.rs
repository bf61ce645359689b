//! Face tracks and per-frame speaker confidence series.
//!
//! Both are produced once per clip by the external active-speaker detector
//! and are immutable afterward. A track and its score series are aligned
//! index-for-index over the same frame range.

use serde::{Deserialize, Serialize};

use crate::bbox::FaceBox;

/// A temporally contiguous sequence of face boxes attributed to one speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Detector-assigned track identifier
    pub track_id: u32,
    /// First frame (inclusive) of the covered range
    pub first_frame: u32,
    /// One face box per covered frame
    pub boxes: Vec<FaceBox>,
}

impl Track {
    /// Create a new track.
    pub fn new(track_id: u32, first_frame: u32, boxes: Vec<FaceBox>) -> Self {
        Self {
            track_id,
            first_frame,
            boxes,
        }
    }

    /// Last covered frame (inclusive), or `None` for an empty track.
    pub fn last_frame(&self) -> Option<u32> {
        if self.boxes.is_empty() {
            None
        } else {
            Some(self.first_frame + self.boxes.len() as u32 - 1)
        }
    }

    /// Whether this track has a box for the given frame.
    pub fn covers(&self, frame: u32) -> bool {
        frame >= self.first_frame
            && (frame - self.first_frame) < self.boxes.len() as u32
    }

    /// Face box at the given frame, if covered.
    pub fn box_at(&self, frame: u32) -> Option<&FaceBox> {
        if self.covers(frame) {
            self.boxes.get((frame - self.first_frame) as usize)
        } else {
            None
        }
    }
}

/// Per-frame speaking confidence aligned with a [`Track`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSeries {
    /// Track this series belongs to
    pub track_id: u32,
    /// First frame (inclusive) of the covered range
    pub first_frame: u32,
    /// One confidence value per covered frame
    pub scores: Vec<f64>,
}

impl ScoreSeries {
    /// Create a new score series.
    pub fn new(track_id: u32, first_frame: u32, scores: Vec<f64>) -> Self {
        Self {
            track_id,
            first_frame,
            scores,
        }
    }

    /// Confidence at the given frame, if covered.
    pub fn score_at(&self, frame: u32) -> Option<f64> {
        if frame < self.first_frame {
            return None;
        }
        self.scores.get((frame - self.first_frame) as usize).copied()
    }

    /// Whether this series covers exactly the same range as the track.
    pub fn is_aligned_with(&self, track: &Track) -> bool {
        self.track_id == track.track_id
            && self.first_frame == track.first_frame
            && self.scores.len() == track.boxes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(first: u32, len: usize) -> Track {
        let boxes = (0..len)
            .map(|i| FaceBox::new(i as f64, 0.0, 10.0, 10.0))
            .collect();
        Track::new(7, first, boxes)
    }

    #[test]
    fn test_coverage() {
        let t = track(100, 50);
        assert!(!t.covers(99));
        assert!(t.covers(100));
        assert!(t.covers(149));
        assert!(!t.covers(150));
        assert_eq!(t.last_frame(), Some(149));
    }

    #[test]
    fn test_box_at_indexes_from_first_frame() {
        let t = track(100, 50);
        assert!((t.box_at(103).unwrap().x - 3.0).abs() < f64::EPSILON);
        assert!(t.box_at(99).is_none());
        assert!(t.box_at(150).is_none());
    }

    #[test]
    fn test_score_alignment() {
        let t = track(100, 50);
        let s = ScoreSeries::new(7, 100, vec![0.5; 50]);
        assert!(s.is_aligned_with(&t));
        assert_eq!(s.score_at(120), Some(0.5));
        assert_eq!(s.score_at(150), None);

        let short = ScoreSeries::new(7, 100, vec![0.5; 49]);
        assert!(!short.is_aligned_with(&t));
        let wrong_id = ScoreSeries::new(8, 100, vec![0.5; 50]);
        assert!(!wrong_id.is_aligned_with(&t));
    }
}
