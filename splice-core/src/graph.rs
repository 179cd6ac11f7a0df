//! Typed filter-graph intermediate representation.
//!
//! The compiler produces `Chain`s of typed `Filter` stages; nothing is turned
//! into ffmpeg's textual `-filter_complex` grammar until `FilterGraph::render`.
//! Chains are joined with `;`, stages within a chain with `,`, and streams are
//! named with bracketed labels (`[0:a]`, `[a3]`, `[outv]`).

use std::fmt;

/// Kind of elementary stream selected from an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Audio,
    Video,
}

impl StreamKind {
    fn specifier(self) -> char {
        match self {
            StreamKind::Audio => 'a',
            StreamKind::Video => 'v',
        }
    }
}

/// Name of an intermediate stream inside the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// A stream a chain consumes: either a stream of an input file or a label.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamRef {
    Input { index: usize, kind: StreamKind },
    Label(Label),
}

impl fmt::Display for StreamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamRef::Input { index, kind } => write!(f, "[{}:{}]", index, kind.specifier()),
            StreamRef::Label(label) => write!(f, "{label}"),
        }
    }
}

/// Presentation-timestamp expressions used by `setpts` / `asetpts`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PtsExpr {
    /// `PTS-STARTPTS`: restart timestamps at zero.
    StartAtZero,
    /// `K*PTS`: stretch timestamps by `K`.
    Scale(f64),
}

impl fmt::Display for PtsExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PtsExpr::StartAtZero => f.write_str("PTS-STARTPTS"),
            PtsExpr::Scale(k) => write!(f, "{k:.6}*PTS"),
        }
    }
}

/// One processing stage with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Trim { start: f64, end: f64 },
    ATrim { start: f64, end: f64 },
    SetPts(PtsExpr),
    ASetPts(PtsExpr),
    ATempo(f64),
    /// Delay every channel by the given number of milliseconds.
    ADelay { millis: u64 },
    /// Linear gain, 1.0 is unity.
    Volume(f64),
    /// Fit inside the box, keeping the aspect ratio.
    ScaleToFit { width: u32, height: u32 },
    /// Pad to the box, centering the picture.
    PadCentered { width: u32, height: u32 },
    SetSar(u32),
    /// Solid black source of a fixed size, duration and frame rate.
    BlackSource { width: u32, height: u32, duration: f64, rate: u32 },
    /// Sum audio inputs without renormalizing, lasting as long as the longest.
    AMix { inputs: usize },
    /// Concatenate video-only segments.
    ConcatVideo { segments: usize },
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Trim { start, end } => write!(f, "trim=start={start}:end={end}"),
            Filter::ATrim { start, end } => write!(f, "atrim=start={start}:end={end}"),
            Filter::SetPts(expr) => write!(f, "setpts={expr}"),
            Filter::ASetPts(expr) => write!(f, "asetpts={expr}"),
            Filter::ATempo(factor) => write!(f, "atempo={factor:.6}"),
            Filter::ADelay { millis } => write!(f, "adelay={millis}:all=1"),
            Filter::Volume(gain) => write!(f, "volume={gain:.2}"),
            Filter::ScaleToFit { width, height } => {
                write!(f, "scale={width}:{height}:force_original_aspect_ratio=decrease")
            }
            Filter::PadCentered { width, height } => {
                write!(f, "pad={width}:{height}:(ow-iw)/2:(oh-ih)/2")
            }
            Filter::SetSar(sar) => write!(f, "setsar={sar}"),
            Filter::BlackSource {
                width,
                height,
                duration,
                rate,
            } => write!(f, "color=c=black:s={width}x{height}:d={duration:.6}:r={rate}"),
            Filter::AMix { inputs } => write!(
                f,
                "amix=inputs={inputs}:duration=longest:dropout_transition=0:normalize=0"
            ),
            Filter::ConcatVideo { segments } => write!(f, "concat=n={segments}:v=1:a=0"),
        }
    }
}

/// Ordered stages applied to zero or more input streams, producing one label.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub inputs: Vec<StreamRef>,
    pub filters: Vec<Filter>,
    pub output: Label,
}

impl Chain {
    /// Starts a chain reading from `inputs` (empty for source filters).
    #[must_use]
    pub fn new(inputs: Vec<StreamRef>, output: Label) -> Self {
        Self {
            inputs,
            filters: Vec::new(),
            output,
        }
    }

    #[must_use]
    pub fn then(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Appends every stage of `filters` in order.
    #[must_use]
    pub fn then_all(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Appends `filter` only when present.
    #[must_use]
    pub fn then_maybe(mut self, filter: Option<Filter>) -> Self {
        if let Some(filter) = filter {
            self.filters.push(filter);
        }
        self
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.inputs {
            write!(f, "{input}")?;
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{filter}")?;
        }
        write!(f, "{}", self.output)
    }
}

/// All chains of one ffmpeg invocation, in emission order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterGraph {
    chains: Vec<Chain>,
}

impl FilterGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a chain and returns its output label.
    pub fn push(&mut self, chain: Chain) -> Label {
        let label = chain.output.clone();
        self.chains.push(chain);
        label
    }

    pub fn extend(&mut self, chains: impl IntoIterator<Item = Chain>) {
        self.chains.extend(chains);
    }

    #[must_use]
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Serializes to the `-filter_complex` argument, or `None` when empty.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        if self.chains.is_empty() {
            None
        } else {
            Some(
                self.chains
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(";"),
            )
        }
    }
}
