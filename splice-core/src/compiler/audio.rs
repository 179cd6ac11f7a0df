//! Audio assembly: one chain per audio-bearing clip, then a single mix.
//!
//! Every chain trims the source, restarts its timestamps, retimes with
//! `atempo` stages, delays the result to the clip's timeline offset and
//! applies the clip gain. The chains are summed without renormalization so
//! a clip's loudness never depends on how many other clips are playing.

use super::PlacedClip;
use super::speed::atempo_filters;
use crate::config::UNITY_VOLUME;
use crate::graph::{Chain, Filter, Label, PtsExpr, StreamKind, StreamRef};

pub(crate) const MIX_LABEL: &str = "outa";

/// Chains produced for the audio side of the graph.
#[derive(Debug, Default)]
pub struct AudioAssembly {
    pub chains: Vec<Chain>,
    /// Final audio label, `None` when no clip carries audio.
    pub output: Option<Label>,
}

/// Builds the per-clip chain for one audio-bearing clip.
#[must_use]
pub fn clip_chain(clip: &PlacedClip) -> Chain {
    let delay_ms = (clip.offset * 1000.0) as u64;
    let delay = (delay_ms > 0).then_some(Filter::ADelay { millis: delay_ms });

    let gain = (clip.volume != UNITY_VOLUME).then(|| Filter::Volume(clip.volume / UNITY_VOLUME));

    Chain::new(
        vec![StreamRef::Input {
            index: clip.input,
            kind: StreamKind::Audio,
        }],
        Label::new(format!("a{}", clip.index)),
    )
    .then(Filter::ATrim {
        start: clip.trim_start,
        end: clip.trim_end,
    })
    .then(Filter::ASetPts(PtsExpr::StartAtZero))
    .then_all(atempo_filters(clip.speed))
    .then_maybe(delay)
    .then_maybe(gain)
}

/// Assembles the audio side for `clips` in timeline order.
#[must_use]
pub fn assemble(clips: &[PlacedClip]) -> AudioAssembly {
    let mut chains: Vec<Chain> = clips
        .iter()
        .filter(|clip| clip.has_audio)
        .map(clip_chain)
        .collect();

    let output = match chains.len() {
        0 => None,
        1 => Some(chains[0].output.clone()),
        count => {
            let inputs = chains
                .iter()
                .map(|chain| StreamRef::Label(chain.output.clone()))
                .collect();
            let mix = Chain::new(inputs, Label::new(MIX_LABEL)).then(Filter::AMix { inputs: count });
            let label = mix.output.clone();
            chains.push(mix);
            Some(label)
        }
    };

    log::debug!(
        "Audio assembly: {} chain(s), output {:?}",
        chains.len(),
        output.as_ref().map(Label::name)
    );

    AudioAssembly { chains, output }
}
