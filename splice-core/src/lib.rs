//! Core library for compiling multi-track timelines into ffmpeg filter graphs
//! and running the resulting exports.
//!
//! The crate provides the timeline data model, a media catalog populated with
//! ffprobe, a compiler producing a typed filter graph, and an export
//! orchestrator that drives ffmpeg on a worker thread with pollable status.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use splice_core::{
//!     Clip, CrateFfprobeExecutor, Exporter, MediaCatalog, Timeline,
//! };
//! use std::path::Path;
//!
//! let mut catalog = MediaCatalog::new();
//! let id = catalog
//!     .ingest(&CrateFfprobeExecutor::new(), Path::new("/media/intro.mp4"))
//!     .unwrap()
//!     .id
//!     .clone();
//!
//! let timeline = Timeline::new(vec![Clip::new(id, 0.0).with_trim(1.0, 6.0)]);
//!
//! let exporter = Exporter::new();
//! let handle = exporter
//!     .start(&timeline, &catalog, Path::new("/media/export.mp4"))
//!     .unwrap();
//! println!("{:?}", handle.join());
//! ```

pub mod catalog;
pub mod compiler;
pub mod config;
pub mod error;
pub mod export;
pub mod external;
pub mod graph;
pub mod project;
pub mod timeline;
pub mod utils;

// Re-exports for public API
pub use catalog::MediaCatalog;
pub use compiler::{CompiledTimeline, PlacedClip, Resolution, compile};
pub use config::Settings;
pub use error::{CoreError, CoreResult};
pub use export::{ExportHandle, ExportPhase, ExportPlan, ExportState, ExportStatus, Exporter};
pub use external::{
    CrateFfprobeExecutor, FfmpegProcess, FfmpegSpawner, MediaProber, ProbedMedia, SidecarSpawner,
};
pub use graph::{Chain, Filter, FilterGraph, Label};
pub use project::{LoadedProject, Project, ProjectSummary, list_projects, load_project, save_project};
pub use timeline::{Clip, FileId, MediaAsset, OutputFormat, Timeline};
pub use utils::{format_bytes, format_duration, parse_ffmpeg_time};
