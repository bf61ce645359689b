//! Caption cue segmentation from transcript words.
//!
//! Words whose start falls inside the clip window are shifted to
//! clip-relative time and grouped greedily into cues. Cue bounds are
//! exactly the first/last word bounds of the group — never widened and
//! never merged across silence gaps.

use pclip_models::{CaptionCue, ClipWindow, TranscriptWord};

/// Segment the clip's caption cues from the full transcript.
///
/// Keeps words with `start ∈ [window.start, window.end)`, shifts them by
/// `-window.start`, and groups up to `max_words` consecutive words per cue.
/// An empty result is valid when no words fall in the window.
pub fn segment_captions(
    words: &[TranscriptWord],
    window: &ClipWindow,
    max_words: usize,
) -> Vec<CaptionCue> {
    let max_words = max_words.max(1);

    let in_window: Vec<&TranscriptWord> = words
        .iter()
        .filter(|w| window.contains(w.start))
        .collect();

    in_window
        .chunks(max_words)
        .map(|chunk| {
            let first = chunk.first().expect("chunks are non-empty");
            let last = chunk.last().expect("chunks are non-empty");
            let text = chunk
                .iter()
                .map(|w| w.text.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            CaptionCue::new(window.relative(first.start), window.relative(last.end), text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: f64, end: f64) -> TranscriptWord {
        TranscriptWord::new(text, start, end)
    }

    #[test]
    fn test_words_outside_window_excluded() {
        let words = vec![word("inside", 12.3, 12.8), word("outside", 45.0, 45.4)];
        let window = ClipWindow::new(10.0, 40.0);

        let cues = segment_captions(&words, &window, 5);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "inside");
        assert!((cues[0].start - 2.3).abs() < 1e-9);
        assert!((cues[0].end - 2.8).abs() < 1e-9);
    }

    #[test]
    fn test_window_start_inclusive_end_exclusive() {
        let words = vec![word("at-start", 10.0, 10.3), word("at-end", 40.0, 40.3)];
        let window = ClipWindow::new(10.0, 40.0);

        let cues = segment_captions(&words, &window, 5);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "at-start");
    }

    #[test]
    fn test_groups_of_at_most_max_words() {
        let words: Vec<TranscriptWord> = (0..12)
            .map(|i| word(&format!("w{}", i), 10.0 + i as f64, 10.5 + i as f64))
            .collect();
        let window = ClipWindow::new(10.0, 40.0);

        let cues = segment_captions(&words, &window, 5);
        assert_eq!(cues.len(), 3);
        assert_eq!(cues[0].text, "w0 w1 w2 w3 w4");
        assert_eq!(cues[2].text, "w10 w11");
    }

    #[test]
    fn test_cue_bounds_are_exact_word_bounds() {
        let words = vec![
            word("a", 11.0, 11.2),
            word("b", 14.0, 14.5),
            // Long silence gap: still one cue, bounds not widened
            word("c", 30.0, 30.2),
        ];
        let window = ClipWindow::new(10.0, 40.0);

        let cues = segment_captions(&words, &window, 5);
        assert_eq!(cues.len(), 1);
        assert!((cues[0].start - 1.0).abs() < 1e-9);
        assert!((cues[0].end - 20.2).abs() < 1e-9);
    }

    #[test]
    fn test_cues_ordered_and_non_overlapping() {
        let words: Vec<TranscriptWord> = (0..20)
            .map(|i| {
                let t = 10.0 + i as f64 * 0.5;
                word(&format!("w{}", i), t, t + 0.4)
            })
            .collect();
        let window = ClipWindow::new(10.0, 40.0);

        let cues = segment_captions(&words, &window, 4);
        for pair in cues.windows(2) {
            assert!(pair[0].end <= pair[1].start + 1e-9);
        }
    }

    #[test]
    fn test_empty_window_yields_no_cues() {
        let words = vec![word("far", 100.0, 100.5)];
        let window = ClipWindow::new(10.0, 40.0);
        assert!(segment_captions(&words, &window, 5).is_empty());
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        let words: Vec<TranscriptWord> = (0..30)
            .map(|i| word(&format!("w{}", i), 10.0 + i as f64, 10.4 + i as f64))
            .collect();
        let window = ClipWindow::new(10.0, 40.0);

        let a = segment_captions(&words, &window, 5);
        let b = segment_captions(&words, &window, 5);
        assert_eq!(a, b);
    }
}
