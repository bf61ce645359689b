//! Crop path planning from speaker tracks and confidence scores.
//!
//! Converts the detector's raw tracks and per-frame confidences into a
//! temporally stable per-frame crop rectangle sequence. Three mechanisms
//! suppress jitter from per-frame confidence noise:
//!
//! 1. **Switch hysteresis** — a challenger track must lead the active
//!    track's confidence by a margin for a sustained run of frames before
//!    the crop re-centers on it.
//! 2. **Center smoothing** — the desired crop center is blended with the
//!    previous center via an exponential moving average, then clamped to a
//!    maximum per-frame velocity.
//! 3. **Freeze window** — when the active track briefly disappears, the
//!    last rectangle is held for a bounded number of frames before the
//!    path degrades to centered fallback framing.
//!
//! The planner is pure: identical inputs always produce the identical
//! `CropFrame` sequence.

use tracing::debug;

use pclip_models::{CropFrame, CropRect, CropState, ScoreSeries, Track};

use crate::config::ReframeConfig;

/// Fixed crop geometry derived from source dimensions and target aspect.
///
/// One crop dimension always equals the source's corresponding dimension
/// (no upscaling). When the source is narrower than the target aspect, the
/// derived width would exceed the source width; the crop then becomes the
/// full frame and the compositor pads horizontally instead of cropping.
#[derive(Debug, Clone, Copy)]
pub struct CropGeometry {
    /// Source frame width
    pub src_width: u32,
    /// Source frame height
    pub src_height: u32,
    /// Crop width (even)
    pub crop_width: i32,
    /// Crop height (even)
    pub crop_height: i32,
    /// True when the crop is the full frame and the output is padded
    pub padded: bool,
}

/// Round down to an even value (codec-friendly dimensions).
fn even(v: i32) -> i32 {
    (v / 2) * 2
}

impl CropGeometry {
    /// Compute the crop geometry for a source frame and target aspect.
    pub fn compute(src_width: u32, src_height: u32, config: &ReframeConfig) -> Self {
        let ratio = config.target_aspect.ratio();
        let crop_height = even(src_height as i32);
        let derived_width = even((src_height as f64 * ratio).round() as i32);

        if derived_width > src_width as i32 {
            // Source narrower than target: keep the full frame, pad later.
            Self {
                src_width,
                src_height,
                crop_width: even(src_width as i32),
                crop_height,
                padded: true,
            }
        } else {
            Self {
                src_width,
                src_height,
                crop_width: derived_width.max(2),
                crop_height: crop_height.max(2),
                padded: false,
            }
        }
    }

    /// Horizontal center of the frame.
    pub fn frame_center_x(&self) -> f64 {
        self.src_width as f64 / 2.0
    }

    /// Clamp a desired center so the crop stays inside the frame.
    pub fn clamp_center_x(&self, cx: f64) -> f64 {
        let half = self.crop_width as f64 / 2.0;
        cx.max(half).min(self.src_width as f64 - half)
    }

    /// Crop rectangle centered (as closely as possible) on `cx`.
    pub fn rect_for_center_x(&self, cx: f64) -> CropRect {
        let max_x = self.src_width as i32 - self.crop_width;
        let x = even((cx - self.crop_width as f64 / 2.0).round() as i32)
            .max(0)
            .min(max_x.max(0));
        CropRect::new(x, 0, self.crop_width, self.crop_height)
    }
}

/// Planner turning track/score pairs into a complete crop path.
pub struct CropPathPlanner<'a> {
    config: &'a ReframeConfig,
    geometry: CropGeometry,
}

impl<'a> CropPathPlanner<'a> {
    /// Create a planner for a source frame size.
    pub fn new(config: &'a ReframeConfig, src_width: u32, src_height: u32) -> Self {
        Self {
            config,
            geometry: CropGeometry::compute(src_width, src_height, config),
        }
    }

    /// Crop geometry used by this planner.
    pub fn geometry(&self) -> &CropGeometry {
        &self.geometry
    }

    /// Plan the crop path for every output frame in the clip.
    ///
    /// The result spans `frame_count` frames with no gaps; frozen and
    /// fallback frames are first-class states, not errors.
    pub fn plan(
        &self,
        pairs: &[(Track, ScoreSeries)],
        frame_count: u32,
    ) -> Vec<CropFrame> {
        let mut path = Vec::with_capacity(frame_count as usize);

        // Active speaker selection state
        let mut active: Option<usize> = None;
        let mut challenger: Option<usize> = None;
        let mut streak: u32 = 0;
        let mut frozen_remaining: u32 = self.config.freeze_frames;

        // Camera state
        let mut prev_cx: Option<f64> = None;
        let mut prev_state: Option<CropState> = None;
        let mut prev_rect: Option<CropRect> = None;

        for t in 0..frame_count {
            let candidates = self.candidates_at(pairs, t);

            // Update active track selection (hysteresis + freeze + adoption).
            if let Some(a) = active {
                let active_conf = pairs[a].1.score_at(t).filter(|_| pairs[a].0.covers(t));

                let best_challenger = candidates
                    .iter()
                    .filter(|(idx, _)| *idx != a)
                    .max_by(|x, y| x.1.total_cmp(&y.1))
                    .copied();

                match best_challenger {
                    Some((c_idx, c_score))
                        if active_conf
                            .map_or(true, |ac| c_score > ac + self.config.switch_margin) =>
                    {
                        if challenger == Some(c_idx) && streak >= self.config.switch_frames {
                            debug!(
                                frame = t,
                                from = pairs[a].0.track_id,
                                to = pairs[c_idx].0.track_id,
                                "Active track switch"
                            );
                            active = Some(c_idx);
                            challenger = None;
                            streak = 0;
                        } else if challenger == Some(c_idx) {
                            streak += 1;
                        } else {
                            challenger = Some(c_idx);
                            streak = 1;
                        }
                    }
                    _ => {
                        challenger = None;
                        streak = 0;
                    }
                }

                // Freeze handling for the (possibly just switched) active track.
                if let Some(a) = active {
                    if pairs[a].0.covers(t) {
                        frozen_remaining = self.config.freeze_frames;
                    } else if frozen_remaining > 0 {
                        frozen_remaining -= 1;
                    } else {
                        // Freeze exhausted: degrade to fallback.
                        active = None;
                        challenger = None;
                        streak = 0;
                    }
                }
            }

            if active.is_none() {
                // No active speaker: adopt the best candidate immediately.
                // This is the unconstrained fallback→tracking transition.
                if let Some((idx, _)) = candidates
                    .iter()
                    .max_by(|x, y| x.1.total_cmp(&y.1))
                    .copied()
                {
                    active = Some(idx);
                    challenger = None;
                    streak = 0;
                    frozen_remaining = self.config.freeze_frames;
                    prev_cx = None;
                    prev_state = None;
                }
            }

            // Resolve this frame's state, center and rectangle.
            let (state, track_id, rect, cx) = match active {
                Some(a) if pairs[a].0.covers(t) => {
                    let bbox = pairs[a].0.box_at(t).expect("covered frame has a box");
                    let raw_cx = self.geometry.clamp_center_x(bbox.cx());

                    let cx = match (prev_cx, prev_state) {
                        (Some(prev), Some(CropState::Tracking))
                        | (Some(prev), Some(CropState::Frozen)) => {
                            let blended = self.config.center_smoothing * raw_cx
                                + (1.0 - self.config.center_smoothing) * prev;
                            let delta = blended - prev;
                            let clamped = if delta.abs() > self.config.max_center_velocity {
                                prev + delta.signum() * self.config.max_center_velocity
                            } else {
                                blended
                            };
                            self.geometry.clamp_center_x(clamped)
                        }
                        _ => raw_cx,
                    };

                    let rect = self.geometry.rect_for_center_x(cx);
                    (CropState::Tracking, Some(pairs[a].0.track_id), rect, cx)
                }
                Some(a) => {
                    // Active track briefly gone: hold the previous rectangle.
                    let rect = prev_rect
                        .unwrap_or_else(|| self.geometry.rect_for_center_x(self.geometry.frame_center_x()));
                    let cx = prev_cx.unwrap_or_else(|| self.geometry.frame_center_x());
                    (CropState::Frozen, Some(pairs[a].0.track_id), rect, cx)
                }
                None => {
                    let cx = self.geometry.frame_center_x();
                    let rect = self.geometry.rect_for_center_x(cx);
                    (CropState::Fallback, None, rect, cx)
                }
            };

            path.push(CropFrame {
                frame: t,
                track_id,
                rect,
                state,
            });

            prev_cx = Some(cx);
            prev_state = Some(state);
            prev_rect = Some(rect);
        }

        path
    }

    /// Tracks covering frame `t` with confidence at or above the
    /// activation threshold, as `(pair_index, confidence)`.
    fn candidates_at(&self, pairs: &[(Track, ScoreSeries)], t: u32) -> Vec<(usize, f64)> {
        pairs
            .iter()
            .enumerate()
            .filter(|(_, (track, _))| track.covers(t))
            .filter_map(|(idx, (_, scores))| {
                scores
                    .score_at(t)
                    .filter(|s| *s >= self.config.activation_threshold)
                    .map(|s| (idx, s))
            })
            .collect()
    }
}
