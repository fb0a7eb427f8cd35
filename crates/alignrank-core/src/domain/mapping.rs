//! Substandard-to-sequence mapping records.
//!
//! These mirror the consolidated mappings JSON consumed by question
//! generation. Fields this crate does not interpret are carried through
//! untouched via `extra`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::candidate::QualityLabel;

/// One selected sequence as recorded in `final_excellent_matches`.
///
/// Matches written by the initial mapping pass carry only skill, grade and
/// sequence number (later passes add `related_formats`); `quality` and
/// `alignment_score` are present only on remapped entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalMatch {
    pub skill: String,
    pub grade: u32,
    pub sequence_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment_score: Option<u8>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FinalMatch {
    /// A match produced by ranking, with its label and score.
    pub fn ranked(
        skill: impl Into<String>,
        grade: u32,
        sequence_number: u32,
        quality: QualityLabel,
        alignment_score: u8,
    ) -> Self {
        Self {
            skill: skill.into(),
            grade,
            sequence_number,
            quality: Some(quality),
            alignment_score: Some(alignment_score),
            extra: Map::new(),
        }
    }
}

/// Minimal view of a prior rating; only the quality matters for gap detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorRating {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_quality: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Ratings gathered for one skill during an earlier mapping pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    #[serde(default)]
    pub all_ratings: Vec<PriorRating>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Provenance attached when a mapping is filled by the exhaustive remap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BruteforceMetadata {
    pub total_sequences_evaluated: usize,
    #[serde(rename = "top_5_count")]
    pub top_count: usize,
    pub processing_timestamp: DateTime<Utc>,
}

/// Mapping of one curriculum substandard to DI sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstandardMapping {
    pub substandard_id: String,
    pub grade: u32,
    pub substandard_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_boundary: Option<String>,
    #[serde(default)]
    pub final_excellent_matches: Vec<FinalMatch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phase2_results: Vec<PhaseResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bruteforce_metadata: Option<BruteforceMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubstandardMapping {
    /// True when a final match exists or any prior rating was FAIR or EXCELLENT.
    ///
    /// Unparseable prior labels count as no match.
    pub fn has_good_match(&self) -> bool {
        if !self.final_excellent_matches.is_empty() {
            return true;
        }
        self.phase2_results
            .iter()
            .flat_map(|phase| phase.all_ratings.iter())
            .filter_map(|r| r.match_quality.as_deref())
            .filter_map(|label| label.parse::<QualityLabel>().ok())
            .any(QualityLabel::is_selectable)
    }
}

/// Whole mappings artifact: free-form metadata plus the mapping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingsDocument {
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub mappings: Vec<SubstandardMapping>,
}
