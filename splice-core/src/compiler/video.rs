//! Video assembly: a single gap-filled lane concatenated into `[outv]`.

use super::PlacedClip;
use super::geometry::{Segment, build_segments};
use super::speed::is_unity;
use crate::config::{FALLBACK_HEIGHT, FALLBACK_WIDTH, FILLER_FRAME_RATE};
use crate::graph::{Chain, Filter, Label, PtsExpr, StreamKind, StreamRef};

use std::fmt;

pub(crate) const CONCAT_LABEL: &str = "outv";

/// Output frame size. Both sides are always even.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Largest width and height over the video clips, rounded up to even.
///
/// Falls back to 1920x1080 when no clip reports usable dimensions.
#[must_use]
pub fn canonical_resolution<'a>(clips: impl IntoIterator<Item = &'a PlacedClip>) -> Resolution {
    let (width, height) = clips
        .into_iter()
        .filter(|clip| clip.has_video)
        .fold((0, 0), |(w, h), clip| (w.max(clip.width), h.max(clip.height)));

    if width == 0 || height == 0 {
        return Resolution {
            width: FALLBACK_WIDTH,
            height: FALLBACK_HEIGHT,
        };
    }

    Resolution {
        width: round_up_even(width),
        height: round_up_even(height),
    }
}

fn round_up_even(value: u32) -> u32 {
    value + value % 2
}

/// Chains produced for the video side of the graph.
#[derive(Debug)]
pub struct VideoAssembly {
    pub chains: Vec<Chain>,
    pub output: Option<Label>,
    pub resolution: Resolution,
}

fn clip_chain(clip: &PlacedClip, resolution: Resolution) -> Chain {
    let stretch = (!is_unity(clip.speed)).then(|| Filter::SetPts(PtsExpr::Scale(1.0 / clip.speed)));

    Chain::new(
        vec![StreamRef::Input {
            index: clip.input,
            kind: StreamKind::Video,
        }],
        Label::new(format!("v{}", clip.index)),
    )
    .then(Filter::Trim {
        start: clip.trim_start,
        end: clip.trim_end,
    })
    .then(Filter::SetPts(PtsExpr::StartAtZero))
    .then_maybe(stretch)
    .then(Filter::ScaleToFit {
        width: resolution.width,
        height: resolution.height,
    })
    .then(Filter::PadCentered {
        width: resolution.width,
        height: resolution.height,
    })
    .then(Filter::SetSar(1))
}

fn filler_chain(ordinal: usize, duration: f64, resolution: Resolution) -> Chain {
    Chain::new(Vec::new(), Label::new(format!("blk{ordinal}")))
        .then(Filter::BlackSource {
            width: resolution.width,
            height: resolution.height,
            duration,
            rate: FILLER_FRAME_RATE,
        })
        .then(Filter::SetSar(1))
}

/// Assembles the video lane for `clips`, padded with black to `total`.
///
/// Returns `None` when no clip carries video.
#[must_use]
pub fn assemble(clips: &[PlacedClip], total: f64) -> Option<VideoAssembly> {
    let video: Vec<&PlacedClip> = clips.iter().filter(|clip| clip.has_video).collect();
    if video.is_empty() {
        return None;
    }

    let resolution = canonical_resolution(video.iter().copied());
    let segments = build_segments(&video, total);

    let mut chains = Vec::with_capacity(segments.len() + 1);
    let mut fillers = 0;
    for segment in &segments {
        match *segment {
            Segment::Filler(duration) => {
                chains.push(filler_chain(fillers, duration, resolution));
                fillers += 1;
            }
            Segment::ClipRef(clip) => chains.push(clip_chain(clip, resolution)),
        }
    }

    let output = match chains.len() {
        0 => None,
        1 => Some(chains[0].output.clone()),
        count => {
            let inputs = chains
                .iter()
                .map(|chain| StreamRef::Label(chain.output.clone()))
                .collect();
            let concat = Chain::new(inputs, Label::new(CONCAT_LABEL))
                .then(Filter::ConcatVideo { segments: count });
            let label = concat.output.clone();
            chains.push(concat);
            Some(label)
        }
    };

    log::debug!(
        "Video assembly: {} segment(s) ({} filler) at {}",
        segments.len(),
        fillers,
        resolution
    );

    Some(VideoAssembly {
        chains,
        output,
        resolution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::tests::placed;

    fn sized(index: usize, width: u32, height: u32) -> PlacedClip {
        let mut clip = placed(index, 0.0, 1.0);
        clip.width = width;
        clip.height = height;
        clip
    }

    #[test]
    fn test_resolution_is_elementwise_max() {
        let clips = [sized(0, 1280, 1080), sized(1, 1920, 720)];
        assert_eq!(
            canonical_resolution(&clips),
            Resolution {
                width: 1920,
                height: 1080
            }
        );
    }

    #[test]
    fn test_odd_dimensions_round_up() {
        let clips = [sized(0, 641, 481)];
        assert_eq!(
            canonical_resolution(&clips),
            Resolution {
                width: 642,
                height: 482
            }
        );
    }

    #[test]
    fn test_missing_dimensions_fall_back() {
        let clips = [sized(0, 0, 0)];
        assert_eq!(canonical_resolution(&clips).to_string(), "1920x1080");
    }

    #[test]
    fn test_single_clip_chain_is_output() {
        let assembly = assemble(&[sized(0, 1280, 720)], 1.0).unwrap();
        assert_eq!(assembly.chains.len(), 1);
        assert_eq!(assembly.output, Some(Label::new("v0")));
        assert_eq!(
            assembly.chains[0].to_string(),
            "[0:v]trim=start=0:end=1,setpts=PTS-STARTPTS,\
             scale=1280:720:force_original_aspect_ratio=decrease,\
             pad=1280:720:(ow-iw)/2:(oh-ih)/2,setsar=1[v0]"
        );
    }

    #[test]
    fn test_speed_stretches_timestamps() {
        let mut clip = placed(0, 0.0, 4.0);
        clip.speed = 2.0;
        let chain = clip_chain(
            &clip,
            Resolution {
                width: 1920,
                height: 1080,
            },
        );
        assert_eq!(chain.filters[2], Filter::SetPts(PtsExpr::Scale(0.5)));
    }

    #[test]
    fn test_gaps_become_black_fillers_and_concat() {
        let clips = [placed(0, 0.0, 5.0), placed(1, 8.0, 3.0)];
        let assembly = assemble(&clips, 20.0).unwrap();

        let labels: Vec<&str> = assembly.chains.iter().map(|c| c.output.name()).collect();
        assert_eq!(labels, vec!["v0", "blk0", "v1", "blk1", "outv"]);
        assert_eq!(
            assembly.chains[1].to_string(),
            "color=c=black:s=1920x1080:d=3.000000:r=30,setsar=1[blk0]"
        );
        assert_eq!(
            assembly.chains[4].to_string(),
            "[v0][blk0][v1][blk1]concat=n=4:v=1:a=0[outv]"
        );
        assert_eq!(assembly.output, Some(Label::new("outv")));
    }

    #[test]
    fn test_audio_only_clips_yield_nothing() {
        let mut clip = placed(0, 0.0, 1.0);
        clip.has_video = false;
        assert!(assemble(&[clip], 1.0).is_none());
    }
}
