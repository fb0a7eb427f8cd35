//! alignrank Core Library
//!
//! Deterministic selection of the instructional sequences that best align
//! with a curriculum substandard, plus the plumbing that folds selections
//! back into the consolidated mappings artifact.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod gaps;
pub mod obs;
pub mod ranker;
pub mod remap;
pub mod reporting;
pub mod selection;
pub mod telemetry;

pub use domain::{
    load_ratings, load_ratings_degraded, parse_ratings, parse_ratings_degraded, AlignError,
    BatchRatingResponse, BoundaryClassification, BruteforceMetadata, Candidate,
    DegradedRatings, ExtraneousLoad, FinalMatch, GradeAlignment, MappingsDocument,
    QualityLabel, RankError, Result, SequenceKey, SequenceRating, SubstandardMapping,
    ValidationError,
};

pub use catalog::{extract_sequences_for_grade, load_di_formats, CatalogSequence, DiFormats};
pub use config::{PipelineConfig, RankerConfig};
pub use gaps::find_substandards_without_good_matches;
pub use ranker::{final_score, rank, RankingResult, ScoredCandidate, DEFAULT_LIMIT};
pub use remap::{
    apply_selection, merge_mappings, read_mappings, read_mappings_verified, remap_document,
    remap_metadata, write_mappings, DirRatingSource, RatingSource, RemapOutcome,
};
pub use reporting::{
    render_remap_report_md, write_remap_report_md, RemapFailure, RemapReport, RemapReportEntry,
};
pub use selection::{final_matches, select_top_sequences, SelectedSequence, Selection};

pub use obs::RemapSpan;
pub use telemetry::init_tracing;

/// alignrank version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
