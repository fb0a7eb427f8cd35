//! Rater output records and their validation.
//!
//! The external rater emits one [`SequenceRating`] per DI sequence, usually
//! wrapped in a [`BatchRatingResponse`]. Records are validated here and
//! turned into [`Candidate`]s keyed by [`SequenceKey`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::candidate::{
    BoundaryClassification, Candidate, ExtraneousLoad, GradeAlignment, QualityLabel,
};
use super::error::{Result, ValidationError};

/// Minimum explanation length accepted from the rater.
pub const MIN_EXPLANATION_CHARS: usize = 20;

/// Ordered identity of a sequence: number first, skill name second.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceKey {
    pub sequence_number: u32,
    pub skill_name: String,
}

impl fmt::Display for SequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.sequence_number, self.skill_name)
    }
}

/// Rating of one sequence against one substandard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRating {
    pub skill_name: String,
    pub sequence_number: u32,
    pub problem_type: String,
    pub match_quality: QualityLabel,
    pub boundary_classification: BoundaryClassification,
    pub grade_alignment: GradeAlignment,
    pub extraneous_skill_load: ExtraneousLoad,
    /// Integer strength 0–100.
    pub alignment_score: u8,
    pub explanation: String,
}

impl SequenceRating {
    /// Placeholder recorded for every sequence of a batch the rater could not score.
    ///
    /// The labels make it ineligible, so it never reaches a selection.
    pub fn failed(
        skill_name: impl Into<String>,
        sequence_number: u32,
        problem_type: impl Into<String>,
        reason: &str,
    ) -> Self {
        Self {
            skill_name: skill_name.into(),
            sequence_number,
            problem_type: problem_type.into(),
            match_quality: QualityLabel::NonExistent,
            boundary_classification: BoundaryClassification::MajorViolation,
            grade_alignment: GradeAlignment::OffGrade,
            extraneous_skill_load: ExtraneousLoad::High,
            alignment_score: 0,
            explanation: format!("Error during evaluation: {}", reason),
        }
    }

    pub fn key(&self) -> SequenceKey {
        SequenceKey {
            sequence_number: self.sequence_number,
            skill_name: self.skill_name.clone(),
        }
    }

    /// Check the field constraints the rater is expected to honour.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.sequence_number == 0 {
            return Err(ValidationError::InvalidSequenceNumber);
        }
        if self.problem_type.trim().is_empty() {
            return Err(ValidationError::MissingField {
                sequence_number: self.sequence_number,
                field: "problem_type",
            });
        }
        if self.alignment_score > 100 {
            return Err(ValidationError::ScoreOutOfRange(f64::from(
                self.alignment_score,
            )));
        }
        let len = self.explanation.trim().chars().count();
        if len < MIN_EXPLANATION_CHARS {
            return Err(ValidationError::ExplanationTooShort {
                sequence_number: self.sequence_number,
                len,
                min: MIN_EXPLANATION_CHARS,
            });
        }
        Ok(())
    }

    pub fn to_candidate(&self) -> std::result::Result<Candidate<SequenceKey>, ValidationError> {
        self.candidate_with_id(self.key())
    }

    /// Same labels and score under a caller-chosen identifier.
    pub fn candidate_with_id<K>(
        &self,
        identifier: K,
    ) -> std::result::Result<Candidate<K>, ValidationError> {
        Candidate::new(
            identifier,
            self.match_quality,
            self.boundary_classification,
            self.grade_alignment,
            self.extraneous_skill_load,
            f64::from(self.alignment_score),
        )
    }
}

/// Batch envelope returned by the rater.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRatingResponse {
    pub sequence_ratings: Vec<SequenceRating>,
    /// Sequence numbers the rater labelled EXCELLENT.
    #[serde(default)]
    pub excellent_sequences: Vec<u32>,
}

impl BatchRatingResponse {
    /// Validate every rating and cross-check `excellent_sequences`.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for rating in &self.sequence_ratings {
            rating.validate()?;
        }
        self.check_excellent_list()
    }

    /// `excellent_sequences` must name exactly the EXCELLENT-labelled sequences.
    pub fn check_excellent_list(&self) -> std::result::Result<(), ValidationError> {
        let mut rated: Vec<u32> = self
            .sequence_ratings
            .iter()
            .filter(|r| r.match_quality == QualityLabel::Excellent)
            .map(|r| r.sequence_number)
            .collect();
        rated.sort_unstable();
        rated.dedup();

        let mut listed = self.excellent_sequences.clone();
        listed.sort_unstable();
        listed.dedup();

        if listed != rated {
            return Err(ValidationError::ExcellentListMismatch { listed, rated });
        }
        Ok(())
    }
}

/// Ratings loaded with per-record degradation.
#[derive(Debug, Clone, PartialEq)]
pub struct DegradedRatings {
    pub ratings: Vec<SequenceRating>,
    /// Records that failed validation and were replaced by [`SequenceRating::failed`].
    pub degraded: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RatingsFile {
    Batch(BatchRatingResponse),
    Bare(Vec<SequenceRating>),
}

/// Parse rater output: a [`BatchRatingResponse`] object or a bare array of ratings.
pub fn parse_ratings(json: &str) -> Result<Vec<SequenceRating>> {
    let ratings = match serde_json::from_str::<RatingsFile>(json)? {
        RatingsFile::Batch(batch) => {
            batch.validate()?;
            batch.sequence_ratings
        }
        RatingsFile::Bare(ratings) => {
            for rating in &ratings {
                rating.validate()?;
            }
            ratings
        }
    };
    Ok(ratings)
}

/// Read and validate a ratings file.
pub fn load_ratings(path: &Path) -> Result<Vec<SequenceRating>> {
    let content = std::fs::read_to_string(path)?;
    parse_ratings(&content)
}

/// Parse rater output, replacing records that fail validation with
/// [`SequenceRating::failed`] placeholders.
///
/// Malformed JSON and a disagreeing `excellent_sequences` list still fail the
/// whole file.
pub fn parse_ratings_degraded(json: &str) -> Result<DegradedRatings> {
    let ratings = match serde_json::from_str::<RatingsFile>(json)? {
        RatingsFile::Batch(batch) => {
            batch.check_excellent_list()?;
            batch.sequence_ratings
        }
        RatingsFile::Bare(ratings) => ratings,
    };

    let mut degraded = 0;
    let ratings = ratings
        .into_iter()
        .map(|rating| match rating.validate() {
            Ok(()) => rating,
            Err(err) => {
                degraded += 1;
                SequenceRating::failed(
                    rating.skill_name,
                    rating.sequence_number,
                    rating.problem_type,
                    &err.to_string(),
                )
            }
        })
        .collect();
    Ok(DegradedRatings { ratings, degraded })
}

/// File-reading counterpart of [`parse_ratings_degraded`].
pub fn load_ratings_degraded(path: &Path) -> Result<DegradedRatings> {
    let content = std::fs::read_to_string(path)?;
    parse_ratings_degraded(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AlignError;
    use serde_json::json;

    fn rating(seq: u32, quality: &str) -> serde_json::Value {
        json!({
            "skill_name": "Addition",
            "sequence_number": seq,
            "problem_type": "Two-digit addition with regrouping",
            "match_quality": quality,
            "boundary_classification": "COMPLIANT",
            "grade_alignment": "ON_GRADE",
            "extraneous_skill_load": "LOW",
            "alignment_score": 88,
            "explanation": "Directly practices regrouping within the stated boundary of 100."
        })
    }

    #[test]
    fn test_parse_batch_response() {
        let doc = json!({
            "sequence_ratings": [rating(1, "EXCELLENT"), rating(2, "FAIR")],
            "excellent_sequences": [1]
        });
        let ratings = parse_ratings(&doc.to_string()).expect("parse");
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0].match_quality, QualityLabel::Excellent);
    }

    #[test]
    fn test_parse_bare_array() {
        let doc = json!([rating(1, "NON-EXISTENT"), rating(2, "POOR")]);
        let ratings = parse_ratings(&doc.to_string()).expect("parse");
        assert_eq!(ratings[0].match_quality, QualityLabel::NonExistent);
    }

    #[test]
    fn test_excellent_list_must_agree() {
        let doc = json!({
            "sequence_ratings": [rating(1, "EXCELLENT"), rating(2, "FAIR")],
            "excellent_sequences": [1, 2]
        });
        let err = parse_ratings(&doc.to_string()).unwrap_err();
        assert!(err.to_string().contains("excellent_sequences"));
    }

    #[test]
    fn test_unknown_label_fails_to_parse() {
        let doc = json!([rating(1, "GREAT")]);
        assert!(parse_ratings(&doc.to_string()).is_err());
    }

    #[test]
    fn test_validation_rules() {
        let mut r: SequenceRating = serde_json::from_value(rating(3, "FAIR")).unwrap();
        assert!(r.validate().is_ok());

        r.explanation = "too short".to_string();
        assert!(matches!(
            r.validate(),
            Err(ValidationError::ExplanationTooShort { len: 9, .. })
        ));

        r.explanation = "x".repeat(40);
        r.alignment_score = 101;
        assert!(matches!(
            r.validate(),
            Err(ValidationError::ScoreOutOfRange(_))
        ));

        r.alignment_score = 50;
        r.sequence_number = 0;
        assert_eq!(r.validate(), Err(ValidationError::InvalidSequenceNumber));
    }

    #[test]
    fn test_failed_placeholder_is_never_eligible() {
        let r = SequenceRating::failed("Fractions", 7, "Compare unit fractions", "timeout");
        assert!(r.validate().is_ok());
        assert!(r.explanation.starts_with("Error during evaluation: timeout"));
        assert!(!r.to_candidate().unwrap().is_eligible());
    }

    #[test]
    fn test_degraded_parse_replaces_invalid_records() {
        let mut short = rating(2, "FAIR");
        short["explanation"] = json!("too short");
        let raw = json!([rating(1, "EXCELLENT"), short]).to_string();

        assert!(parse_ratings(&raw).is_err());

        let loaded = parse_ratings_degraded(&raw).unwrap();
        assert_eq!(loaded.degraded, 1);
        assert_eq!(loaded.ratings.len(), 2);
        assert_eq!(loaded.ratings[0].match_quality, QualityLabel::Excellent);

        let placeholder = &loaded.ratings[1];
        assert_eq!(placeholder.sequence_number, 2);
        assert_eq!(placeholder.match_quality, QualityLabel::NonExistent);
        assert!(placeholder.explanation.starts_with("Error during evaluation:"));
        assert!(!placeholder.to_candidate().unwrap().is_eligible());
    }

    #[test]
    fn test_degraded_parse_still_rejects_whole_file_errors() {
        assert!(matches!(
            parse_ratings_degraded("{not json"),
            Err(AlignError::Serialization(_))
        ));

        let mismatch = json!({
            "sequence_ratings": [rating(1, "EXCELLENT")],
            "excellent_sequences": []
        })
        .to_string();
        assert!(matches!(
            parse_ratings_degraded(&mismatch),
            Err(AlignError::Validation(ValidationError::ExcellentListMismatch { .. }))
        ));
    }

    #[test]
    fn test_key_orders_by_number_then_skill() {
        let a = SequenceKey {
            sequence_number: 2,
            skill_name: "Zeta".to_string(),
        };
        let b = SequenceKey {
            sequence_number: 10,
            skill_name: "Alpha".to_string(),
        };
        let c = SequenceKey {
            sequence_number: 10,
            skill_name: "Beta".to_string(),
        };
        assert!(a < b);
        assert!(b < c);
        assert_eq!(c.to_string(), "#10 (Beta)");
    }
}
