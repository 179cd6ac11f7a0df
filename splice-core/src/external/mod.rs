// ============================================================================
// splice-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates every interaction with the external media engine.
// ffmpeg is driven through the `FfmpegSpawner`/`FfmpegProcess` traits and
// ffprobe through `MediaProber`, so the compiler and the export orchestrator
// can be tested with scripted mocks instead of real binaries.
//
// KEY COMPONENTS:
// - Traits for external tool interactions (FfmpegSpawner, MediaProber)
// - Concrete implementations using the ffmpeg-sidecar and ffprobe crates
// - Command construction helpers shared by the export path

// ============================================================================
// SUBMODULES
// ============================================================================

/// Builder and argument helpers for ffmpeg commands
pub mod ffmpeg_builder;

/// Contains traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Contains traits and implementations for probing media with ffprobe
pub mod ffprobe_executor;

#[cfg(test)]
pub(crate) mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_builder::{
    FfmpegCommandBuilder, add_filter_graph, add_inputs, add_output, command_args,
};
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{
    CrateFfprobeExecutor, MediaProber, ProbedMedia, StreamFacts, summarize_streams,
};
