//! Domain-level error taxonomy for alignrank.

/// Errors produced while validating rater output before it becomes a candidate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown {field} label: {value}")]
    UnknownLabel { field: &'static str, value: String },

    #[error("alignment score {0} outside 0..=100")]
    ScoreOutOfRange(f64),

    #[error("sequence number must be >= 1")]
    InvalidSequenceNumber,

    #[error("sequence {sequence_number} missing required field: {field}")]
    MissingField {
        sequence_number: u32,
        field: &'static str,
    },

    #[error("sequence {sequence_number} explanation too short: {len} < {min} chars")]
    ExplanationTooShort {
        sequence_number: u32,
        len: usize,
        min: usize,
    },

    #[error("excellent_sequences disagrees with ratings: listed {listed:?}, rated {rated:?}")]
    ExcellentListMismatch { listed: Vec<u32>, rated: Vec<u32> },

    #[error("substandard id cannot be used as a file name: {0:?}")]
    UnsafeSubstandardId(String),
}

/// Errors produced by the ranker itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// alignrank domain errors.
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    #[error("ranking error: {0}")]
    Rank(#[from] RankError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for alignrank domain operations.
pub type Result<T> = std::result::Result<T, AlignError>;
