//! Timeline geometry: total duration and the gap-filled video segment list.

use super::PlacedClip;
use crate::config::GAP_EPSILON;

/// One entry of the ordered video sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment<'a> {
    /// Black region of the given length in seconds.
    Filler(f64),
    ClipRef(&'a PlacedClip),
}

/// Total output length: the override when given, else the furthest clip end.
#[must_use]
pub fn timeline_duration(clips: &[PlacedClip], duration_override: Option<f64>) -> f64 {
    if let Some(duration) = duration_override {
        return duration;
    }
    clips.iter().map(PlacedClip::end).fold(0.0, f64::max)
}

/// Orders `clips` by offset and fills every gap wider than the epsilon
/// (including the tail up to `total`) with a filler segment.
///
/// Clips that overlap are not layered; they are concatenated in start order
/// and the overlap shifts later material, which is logged.
#[must_use]
pub fn build_segments<'a>(clips: &[&'a PlacedClip], total: f64) -> Vec<Segment<'a>> {
    let mut ordered: Vec<&PlacedClip> = clips.to_vec();
    ordered.sort_by(|a, b| {
        a.offset
            .total_cmp(&b.offset)
            .then(a.input.cmp(&b.input))
            .then(a.index.cmp(&b.index))
    });

    let mut segments = Vec::with_capacity(ordered.len() * 2 + 1);
    let mut position = 0.0;
    for clip in ordered {
        let gap = clip.offset - position;
        if gap > GAP_EPSILON {
            segments.push(Segment::Filler(gap));
        } else if gap < -GAP_EPSILON {
            log::warn!(
                "Video clip {} starts at {:.3}s inside the previous clip (ends {:.3}s); it will be appended after it",
                clip.index,
                clip.offset,
                position
            );
        }
        segments.push(Segment::ClipRef(clip));
        position = clip.end();
    }

    let tail = total - position;
    if tail > GAP_EPSILON {
        segments.push(Segment::Filler(tail));
    }
    segments
}
