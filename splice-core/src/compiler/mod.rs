// ============================================================================
// splice-core/src/compiler/mod.rs
// ============================================================================
//
// TIMELINE COMPILER: Timeline to FFmpeg Filter Graph
//
// This module turns a `Timeline` plus the `MediaCatalog` it references into a
// `CompiledTimeline`: the deduplicated list of input files, a typed filter
// graph, the labels of the final audio/video streams and the exact output
// duration.
//
// PIPELINE:
// 1. Resolve every clip against the catalog and validate it (boundary checks)
// 2. Geometry: total duration and the gap-filled video segment order
// 3. Audio assembler: per-clip chains and the final mix
// 4. Video assembler: canonical resolution, per-clip chains, fillers, concat
//
// The compiler is a pure function of its inputs; compiling the same timeline
// twice yields identical graphs with identical labels.

pub mod audio;
pub mod geometry;
pub mod speed;
pub mod video;

pub use geometry::{Segment, build_segments, timeline_duration};
pub use speed::{atempo_filters, speed_ratio_chain};
pub use video::{Resolution, canonical_resolution};

use crate::catalog::MediaCatalog;
use crate::error::{CoreError, CoreResult};
use crate::graph::{FilterGraph, Label};
use crate::timeline::{Clip, FileId, MediaAsset, Timeline};

use std::collections::HashMap;
use std::path::PathBuf;

/// Slack allowed when comparing a trim end with the (millisecond-rounded)
/// asset duration.
const TRIM_END_TOLERANCE: f64 = 1e-3;

/// A clip resolved against its asset and validated.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedClip {
    /// Position of the clip in the timeline's clip list; used for labels.
    pub index: usize,
    pub file_id: FileId,
    /// Index of the clip's file among the invocation inputs.
    pub input: usize,
    pub offset: f64,
    pub trim_start: f64,
    pub trim_end: f64,
    pub speed: f64,
    pub volume: f64,
    pub track: u32,
    pub has_audio: bool,
    pub has_video: bool,
    pub width: u32,
    pub height: u32,
}

impl PlacedClip {
    /// Length of the clip on the timeline, after speed is applied.
    #[must_use]
    pub fn effective_duration(&self) -> f64 {
        (self.trim_end - self.trim_start) / self.speed
    }

    /// Timeline position where the clip ends.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.offset + self.effective_duration()
    }
}

/// Output of the compiler, ready to be turned into an engine invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTimeline {
    /// Source files, one per distinct asset, in first-use order.
    pub inputs: Vec<PathBuf>,
    pub graph: FilterGraph,
    pub video_output: Option<Label>,
    pub audio_output: Option<Label>,
    /// Exact output length in seconds.
    pub duration: f64,
    /// Canonical video resolution, when a video output exists.
    pub resolution: Option<Resolution>,
}

impl CompiledTimeline {
    /// The labels to map into the container, video first.
    #[must_use]
    pub fn output_labels(&self) -> Vec<&Label> {
        self.video_output
            .iter()
            .chain(self.audio_output.iter())
            .collect()
    }
}

/// Compiles `timeline` against `catalog`.
///
/// Configuration problems (no clips, unknown files, invalid clips, nothing to
/// output) are reported as errors before any graph is returned.
pub fn compile(timeline: &Timeline, catalog: &MediaCatalog) -> CoreResult<CompiledTimeline> {
    let (clips, inputs) = resolve_clips(timeline, catalog)?;

    let duration = timeline_duration(&clips, timeline.duration_override());
    log::debug!(
        "Timeline duration {:.3}s over {} clip(s), {} input(s)",
        duration,
        clips.len(),
        inputs.len()
    );

    let audio_only = timeline.format.is_audio_only() || !clips.iter().any(|c| c.has_video);

    let mut graph = FilterGraph::new();

    let audio = audio::assemble(&clips);
    graph.extend(audio.chains);

    let video = if audio_only {
        None
    } else {
        video::assemble(&clips, duration)
    };
    let (video_output, resolution) = match video {
        Some(video) => {
            graph.extend(video.chains);
            (video.output, Some(video.resolution))
        }
        None => (None, None),
    };

    if video_output.is_none() && audio.output.is_none() {
        return Err(CoreError::NoOutputStreams);
    }

    Ok(CompiledTimeline {
        inputs,
        graph,
        video_output,
        audio_output: audio.output,
        duration,
        resolution,
    })
}

/// Resolves and validates every clip, assigning input indices by first use.
fn resolve_clips(
    timeline: &Timeline,
    catalog: &MediaCatalog,
) -> CoreResult<(Vec<PlacedClip>, Vec<PathBuf>)> {
    if timeline.clips.is_empty() {
        return Err(CoreError::NoClips);
    }

    let mut input_index: HashMap<&FileId, usize> = HashMap::new();
    let mut inputs = Vec::new();
    let mut placed = Vec::with_capacity(timeline.clips.len());

    for (index, clip) in timeline.clips.iter().enumerate() {
        let asset = catalog
            .get(&clip.file_id)
            .ok_or_else(|| CoreError::UnknownFile {
                index,
                file_id: clip.file_id.clone(),
            })?;

        let input = *input_index.entry(&clip.file_id).or_insert_with(|| {
            inputs.push(asset.path.clone());
            inputs.len() - 1
        });

        placed.push(place_clip(index, clip, asset, input)?);
    }

    Ok((placed, inputs))
}

fn place_clip(
    index: usize,
    clip: &Clip,
    asset: &MediaAsset,
    input: usize,
) -> CoreResult<PlacedClip> {
    let invalid = |reason: String| CoreError::InvalidClip { index, reason };

    let trim_start = clip.trim_start.unwrap_or(0.0);
    let trim_end = clip.trim_end.unwrap_or(asset.duration);

    if !clip.offset.is_finite() || clip.offset < 0.0 {
        return Err(invalid(format!("offset {} must be >= 0", clip.offset)));
    }
    if !trim_start.is_finite() || trim_start < 0.0 {
        return Err(invalid(format!("trimStart {trim_start} must be >= 0")));
    }
    if !trim_end.is_finite() || trim_end <= trim_start {
        return Err(invalid(format!(
            "trimEnd {trim_end} must be greater than trimStart {trim_start}"
        )));
    }
    if trim_end > asset.duration + TRIM_END_TOLERANCE {
        return Err(invalid(format!(
            "trimEnd {trim_end} exceeds the duration of {} ({})",
            asset.name, asset.duration
        )));
    }
    if !clip.speed.is_finite() || clip.speed <= 0.0 {
        return Err(invalid(format!("speed {} must be > 0", clip.speed)));
    }
    if !clip.volume.is_finite() || clip.volume < 0.0 {
        return Err(invalid(format!("volume {} must be >= 0", clip.volume)));
    }

    Ok(PlacedClip {
        index,
        file_id: clip.file_id.clone(),
        input,
        offset: clip.offset,
        trim_start,
        trim_end,
        speed: clip.speed,
        volume: clip.volume,
        track: clip.track,
        has_audio: asset.has_audio,
        has_video: asset.has_video,
        width: asset.width,
        height: asset.height,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::timeline::OutputFormat;
    use std::path::PathBuf;

    /// A unity-speed audio+video clip of `duration` seconds placed at `offset`.
    pub(crate) fn placed(index: usize, offset: f64, duration: f64) -> PlacedClip {
        PlacedClip {
            index,
            file_id: FileId::from(format!("file{index}").as_str()),
            input: index,
            offset,
            trim_start: 0.0,
            trim_end: duration,
            speed: 1.0,
            volume: 100.0,
            track: 0,
            has_audio: true,
            has_video: true,
            width: 1920,
            height: 1080,
        }
    }

    pub(crate) fn asset(id: &str, duration: f64, video: Option<(u32, u32)>, audio: bool) -> MediaAsset {
        MediaAsset {
            id: FileId::from(id),
            path: PathBuf::from(format!("/ws/{id}.media")),
            name: format!("{id}.media"),
            duration,
            has_video: video.is_some(),
            has_audio: audio,
            width: video.map_or(0, |v| v.0),
            height: video.map_or(0, |v| v.1),
        }
    }

    #[test]
    fn test_no_clips_is_configuration_error() {
        let err = compile(&Timeline::default(), &MediaCatalog::new()).unwrap_err();
        assert!(matches!(err, CoreError::NoClips));
    }

    #[test]
    fn test_unknown_file_rejected() {
        let timeline = Timeline::new(vec![Clip::new(FileId::from("ghost"), 0.0)]);
        let err = compile(&timeline, &MediaCatalog::new()).unwrap_err();
        assert!(matches!(err, CoreError::UnknownFile { index: 0, .. }));
    }

    #[test]
    fn test_invalid_clips_rejected() {
        let catalog: MediaCatalog = [asset("a", 10.0, None, true)].into_iter().collect();
        let id = FileId::from("a");

        let cases = [
            Clip::new(id.clone(), 0.0).with_trim(5.0, 5.0),
            Clip::new(id.clone(), 0.0).with_trim(2.0, 11.0),
            Clip::new(id.clone(), -1.0),
            Clip::new(id.clone(), 0.0).with_speed(0.0),
            Clip::new(id.clone(), 0.0).with_volume(-5.0),
        ];
        for clip in cases {
            let err = compile(&Timeline::new(vec![clip.clone()]), &catalog).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidClip { index: 0, .. }),
                "expected InvalidClip for {clip:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_asset_without_streams_has_no_output() {
        let catalog: MediaCatalog = [asset("silent", 4.0, None, false)].into_iter().collect();
        let timeline = Timeline::new(vec![Clip::new(FileId::from("silent"), 0.0)]);
        assert!(matches!(
            compile(&timeline, &catalog).unwrap_err(),
            CoreError::NoOutputStreams
        ));
    }

    #[test]
    fn test_inputs_deduplicated_in_first_use_order() {
        let catalog: MediaCatalog = [
            asset("a", 10.0, Some((1280, 720)), true),
            asset("b", 10.0, None, true),
        ]
        .into_iter()
        .collect();
        let timeline = Timeline::new(vec![
            Clip::new(FileId::from("b"), 0.0).with_trim(0.0, 2.0),
            Clip::new(FileId::from("a"), 2.0).with_trim(0.0, 2.0),
            Clip::new(FileId::from("b"), 4.0).with_trim(3.0, 5.0),
        ]);

        let compiled = compile(&timeline, &catalog).unwrap();
        assert_eq!(
            compiled.inputs,
            vec![PathBuf::from("/ws/b.media"), PathBuf::from("/ws/a.media")]
        );
        let rendered = compiled.graph.render().unwrap();
        assert!(rendered.contains("[0:a]atrim=start=3:end=5"));
        assert!(rendered.contains("[1:v]trim=start=0:end=2"));
    }

    #[test]
    fn test_single_audio_clip_end_to_end() {
        let catalog: MediaCatalog = [asset("song", 30.0, None, true)].into_iter().collect();
        let timeline = Timeline::new(vec![
            Clip::new(FileId::from("song"), 0.0)
                .with_trim(2.0, 7.0)
                .with_volume(50.0),
        ])
        .with_format(OutputFormat::Mp3);

        let compiled = compile(&timeline, &catalog).unwrap();
        assert!((compiled.duration - 5.0).abs() < 1e-9);
        assert_eq!(compiled.video_output, None);
        assert_eq!(compiled.audio_output, Some(Label::new("a0")));
        assert_eq!(
            compiled.graph.render().unwrap(),
            "[0:a]atrim=start=2:end=7,asetpts=PTS-STARTPTS,volume=0.50[a0]"
        );
    }

    #[test]
    fn test_mp3_format_skips_video() {
        let catalog: MediaCatalog = [asset("v", 10.0, Some((640, 480)), true)].into_iter().collect();
        let timeline =
            Timeline::new(vec![Clip::new(FileId::from("v"), 0.0)]).with_format(OutputFormat::Mp3);
        let compiled = compile(&timeline, &catalog).unwrap();
        assert!(compiled.video_output.is_none());
        assert!(compiled.resolution.is_none());
        assert!(!compiled.graph.render().unwrap().contains("[0:v]"));
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let catalog: MediaCatalog = [
            asset("a", 10.0, Some((1280, 720)), true),
            asset("b", 8.0, Some((1920, 1080)), true),
        ]
        .into_iter()
        .collect();
        let timeline = Timeline::new(vec![
            Clip::new(FileId::from("a"), 0.0).with_trim(1.0, 6.0).with_speed(2.0),
            Clip::new(FileId::from("b"), 7.0).with_volume(80.0).on_track(1),
        ])
        .with_duration(20.0);

        let first = compile(&timeline, &catalog).unwrap();
        let second = compile(&timeline, &catalog).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.graph.render(), second.graph.render());
        assert_eq!(
            first.output_labels(),
            vec![&Label::new("outv"), &Label::new("outa")]
        );
    }
}
