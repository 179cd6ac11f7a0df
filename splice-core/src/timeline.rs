//! Timeline data model: media assets, clips and the timeline itself.
//!
//! These are the records the surrounding application hands to the compiler.
//! They deserialize from the same camelCase JSON the editor front end and
//! project files use, with explicit defaults for optional transform fields.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};

/// Number of hex characters kept from the path fingerprint.
const FILE_ID_LEN: usize = 12;

/// Stable identifier of a media asset, derived from its storage path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Fingerprints a storage path: the first hex characters of the
    /// SHA-256 digest of the UTF-8 path.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(path.to_string_lossy().as_bytes());
        let mut hex = hex::encode(hasher.finalize());
        hex.truncate(FILE_ID_LEN);
        Self(hex)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A probed media file. Immutable once created; clips only reference it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub id: FileId,
    pub path: PathBuf,
    /// Display name (file name component of `path`).
    pub name: String,
    /// Container duration in seconds.
    pub duration: f64,
    pub has_video: bool,
    pub has_audio: bool,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl MediaAsset {
    /// True when the asset carries usable pixel dimensions.
    #[must_use]
    pub fn has_dimensions(&self) -> bool {
        self.has_video && self.width > 0 && self.height > 0
    }
}

fn default_speed() -> f64 {
    1.0
}

fn default_volume() -> f64 {
    crate::config::UNITY_VOLUME
}

/// Placement of one asset on the timeline.
///
/// `trim_start` defaults to 0 and `trim_end` to the asset duration; both are
/// resolved against the catalog when the timeline is compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub file_id: FileId,
    /// Timeline start position in seconds.
    #[serde(default)]
    pub offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_end: Option<f64>,
    /// Playback rate multiplier.
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Gain in percent; 100 is unity.
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default)]
    pub track: u32,
}

impl Clip {
    /// A clip covering the whole asset at unity speed and volume.
    #[must_use]
    pub fn new(file_id: FileId, offset: f64) -> Self {
        Self {
            file_id,
            offset,
            trim_start: None,
            trim_end: None,
            speed: default_speed(),
            volume: default_volume(),
            track: 0,
        }
    }

    #[must_use]
    pub fn with_trim(mut self, start: f64, end: f64) -> Self {
        self.trim_start = Some(start);
        self.trim_end = Some(end);
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    #[must_use]
    pub fn on_track(mut self, track: u32) -> Self {
        self.track = track;
        self
    }
}

/// Container selected for the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Audio and video.
    #[default]
    Mp4,
    /// Audio only.
    Mp3,
}

impl OutputFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Mp4 => "mp4",
            OutputFormat::Mp3 => "mp3",
        }
    }

    #[must_use]
    pub fn is_audio_only(self) -> bool {
        matches!(self, OutputFormat::Mp3)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mp4" => Ok(OutputFormat::Mp4),
            "mp3" => Ok(OutputFormat::Mp3),
            other => Err(format!("unsupported output format '{other}' (expected mp4 or mp3)")),
        }
    }
}

/// Ordered clips plus an optional authoritative duration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub clips: Vec<Clip>,
    /// When present and positive, overrides the clip-derived duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Timeline {
    #[must_use]
    pub fn new(clips: Vec<Clip>) -> Self {
        Self {
            clips,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// The override, if it is usable.
    #[must_use]
    pub fn duration_override(&self) -> Option<f64> {
        self.duration.filter(|d| d.is_finite() && *d > 0.0)
    }
}
