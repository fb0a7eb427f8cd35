//! Domain models for alignrank.
//!
//! Canonical definitions for the core entities:
//! - `Candidate`: an immutable rated item submitted for ranking
//! - `SequenceRating`: the rater's per-sequence record
//! - `SubstandardMapping`: a curriculum substandard and its selected sequences

pub mod candidate;
pub mod error;
pub mod mapping;
pub mod rating;

// Re-export main types and errors
pub use candidate::{
    BoundaryClassification, Candidate, ExtraneousLoad, GradeAlignment, QualityLabel,
};
pub use error::{AlignError, RankError, Result, ValidationError};
pub use mapping::{
    BruteforceMetadata, FinalMatch, MappingsDocument, PhaseResult, PriorRating,
    SubstandardMapping,
};
pub use rating::{
    load_ratings, load_ratings_degraded, parse_ratings, parse_ratings_degraded,
    BatchRatingResponse, DegradedRatings, SequenceKey, SequenceRating, MIN_EXPLANATION_CHARS,
};
