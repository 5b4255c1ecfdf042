use thiserror::Error;

/// Configuration failures. Runtime input never produces one of these;
/// they surface when a snippet is constructed or a manifest is applied.
#[derive(Debug, Error)]
pub enum LabError {
    #[error("symbol set is empty")]
    EmptySymbolSet,

    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    #[error("reel count must be at least 1")]
    NoReels,

    #[error("expected {expected} initial outcomes, got {actual}")]
    InitialOutcomeCount { expected: usize, actual: usize },

    #[error("outcome {outcome} is out of range for {symbols} symbols")]
    OutcomeOutOfRange { outcome: usize, symbols: usize },

    #[error("spin completes after {complete_after}s but the last reel lands at {last_landing}s")]
    CompletionTooEarly { complete_after: f32, last_landing: f32 },

    #[error("landing cycle {selection} does not fit in a strip of {total} cycles")]
    StripTooShort { selection: usize, total: usize },

    #[error("symbol pitch must be positive, got {0}")]
    InvalidPitch(f32),

    #[error("durations must be finite and non-negative")]
    InvalidDuration,

    #[error("{requested} {what} requested, at most {max} supported")]
    TooMany { what: &'static str, requested: usize, max: usize },

    #[error("grid needs at least one column")]
    EmptyGrid,

    #[error("malformed manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LabError>;
