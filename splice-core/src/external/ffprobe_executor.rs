//! FFprobe integration for media ingest
//!
//! This module runs ffprobe against a media file and reduces its stream list
//! to the handful of facts the catalog keeps: duration, whether usable audio
//! and video streams exist, and the video dimensions.
use crate::config::ATTACHED_PICTURE_CODECS;
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Facts extracted from one probe of a media file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbedMedia {
    /// Container duration in seconds.
    pub duration: f64,
    pub has_video: bool,
    pub has_audio: bool,
    pub width: u32,
    pub height: u32,
}

/// Anything that can turn a path into `ProbedMedia`.
pub trait MediaProber {
    fn probe(&self, path: &Path) -> CoreResult<ProbedMedia>;
}

/// Production prober backed by the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MediaProber for CrateFfprobeExecutor {
    fn probe(&self, path: &Path) -> CoreResult<ProbedMedia> {
        log::debug!("Running ffprobe (via crate) on: {}", path.display());
        let metadata = ffprobe(path).map_err(|err| {
            log::error!("ffprobe failed on {}: {:?}", path.display(), err);
            map_ffprobe_error(err, "media ingest")
        })?;

        let duration = metadata
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok());

        let facts = metadata.streams.iter().map(|s| StreamFacts {
            codec_type: s.codec_type.as_deref(),
            codec_name: s.codec_name.as_deref(),
            width: s.width,
            height: s.height,
        });

        summarize_streams(path, duration, facts)
    }
}

/// The subset of an ffprobe stream record ingest cares about.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamFacts<'a> {
    pub codec_type: Option<&'a str>,
    pub codec_name: Option<&'a str>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// Reduces probed streams to `ProbedMedia`.
///
/// Cover-art streams (`mjpeg`, `png`) do not count as video. When several
/// video streams exist the last one wins, matching ffprobe's stream order.
/// Files without a positive duration are rejected.
pub fn summarize_streams<'a>(
    path: &Path,
    duration: Option<f64>,
    streams: impl IntoIterator<Item = StreamFacts<'a>>,
) -> CoreResult<ProbedMedia> {
    let duration = duration.filter(|d| d.is_finite() && *d > 0.0).ok_or_else(|| {
        CoreError::UnsupportedMedia(format!(
            "{} has no positive duration",
            path.display()
        ))
    })?;

    let mut media = ProbedMedia {
        duration,
        ..Default::default()
    };

    for stream in streams {
        match stream.codec_type {
            Some("video")
                if !stream
                    .codec_name
                    .is_some_and(|name| ATTACHED_PICTURE_CODECS.contains(&name)) =>
            {
                media.has_video = true;
                media.width = clamp_dimension(stream.width);
                media.height = clamp_dimension(stream.height);
            }
            Some("audio") => media.has_audio = true,
            _ => {}
        }
    }

    if !media.has_video && !media.has_audio {
        log::warn!("No audio or video streams found in {}", path.display());
    }

    Ok(media)
}

fn clamp_dimension(value: Option<i64>) -> u32 {
    value
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::FfprobeParse(format!("ffprobe {context} output deserialization: {err}"))
        }
        #[allow(unreachable_patterns)]
        _ => CoreError::FfprobeParse(format!("Unknown ffprobe error during {context}: {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream<'a>(kind: &'a str, codec: &'a str, w: i64, h: i64) -> StreamFacts<'a> {
        StreamFacts {
            codec_type: Some(kind),
            codec_name: Some(codec),
            width: Some(w),
            height: Some(h),
        }
    }

    #[test]
    fn test_video_and_audio_streams() {
        let media = summarize_streams(
            Path::new("clip.mp4"),
            Some(12.5),
            [stream("video", "h264", 1280, 720), stream("audio", "aac", 0, 0)],
        )
        .unwrap();
        assert_eq!(
            media,
            ProbedMedia {
                duration: 12.5,
                has_video: true,
                has_audio: true,
                width: 1280,
                height: 720,
            }
        );
    }

    #[test]
    fn test_cover_art_is_not_video() {
        let media = summarize_streams(
            Path::new("song.mp3"),
            Some(180.0),
            [stream("audio", "mp3", 0, 0), stream("video", "mjpeg", 500, 500)],
        )
        .unwrap();
        assert!(media.has_audio);
        assert!(!media.has_video);
        assert_eq!((media.width, media.height), (0, 0));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = summarize_streams(Path::new("empty.mp4"), Some(0.0), Vec::<StreamFacts>::new()).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedMedia(_)));

        let err = summarize_streams(Path::new("unknown.mp4"), None, Vec::<StreamFacts>::new()).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedMedia(_)));
    }

    #[test]
    fn test_negative_dimensions_clamped() {
        let media = summarize_streams(
            Path::new("odd.mp4"),
            Some(1.0),
            [stream("video", "vp9", -1, 480)],
        )
        .unwrap();
        assert_eq!((media.width, media.height), (0, 480));
    }
}
