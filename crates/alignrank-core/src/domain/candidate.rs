//! Rated candidates and the closed label vocabularies produced by the rater.
//!
//! Every label type parses from and prints to the rater's wire form
//! (`EXCELLENT`, `MINOR_VIOLATION`, `NON-EXISTENT`, ...). Anything outside
//! the vocabulary is rejected here, so downstream code never sees an
//! unknown label.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

macro_rules! label_vocabulary {
    ($ty:ident, $field:literal, { $($variant:ident => $wire:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $ty {
            /// Every label in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Wire form used by the rater.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($wire $(| $alias)* => Ok($ty::$variant),)+
                    other => Err(ValidationError::UnknownLabel {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Categorical match quality, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityLabel {
    #[serde(rename = "NON-EXISTENT", alias = "NON_EXISTENT")]
    NonExistent,
    #[serde(rename = "POOR")]
    Poor,
    #[serde(rename = "FAIR")]
    Fair,
    #[serde(rename = "EXCELLENT")]
    Excellent,
}

label_vocabulary!(QualityLabel, "match_quality", {
    NonExistent => "NON-EXISTENT" | "NON_EXISTENT",
    Poor => "POOR",
    Fair => "FAIR",
    Excellent => "EXCELLENT",
});

impl QualityLabel {
    /// Only EXCELLENT and FAIR may ever be selected.
    pub fn is_selectable(self) -> bool {
        matches!(self, Self::Excellent | Self::Fair)
    }
}

/// Compliance with the substandard's assessment boundary, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoundaryClassification {
    Compliant,
    MinorViolation,
    MajorViolation,
}

label_vocabulary!(BoundaryClassification, "boundary_classification", {
    Compliant => "COMPLIANT",
    MinorViolation => "MINOR_VIOLATION",
    MajorViolation => "MAJOR_VIOLATION",
});

impl BoundaryClassification {
    pub fn is_disqualifying(self) -> bool {
        matches!(self, Self::MajorViolation)
    }
}

/// Fit of the sequence to the target grade, ordered by distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GradeAlignment {
    OnGrade,
    SlightlyOff,
    OffGrade,
}

label_vocabulary!(GradeAlignment, "grade_alignment", {
    OnGrade => "ON_GRADE",
    SlightlyOff => "SLIGHTLY_OFF",
    OffGrade => "OFF_GRADE",
});

impl GradeAlignment {
    pub fn is_disqualifying(self) -> bool {
        matches!(self, Self::OffGrade)
    }
}

/// Skills a sequence demands beyond the substandard. Penalized, never disqualifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtraneousLoad {
    Low,
    Moderate,
    High,
}

label_vocabulary!(ExtraneousLoad, "extraneous_skill_load", {
    Low => "LOW",
    Moderate => "MODERATE",
    High => "HIGH",
});

impl ExtraneousLoad {
    /// Ordering weight: LOW 0, MODERATE 1, HIGH 2.
    pub fn weight(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Moderate => 1,
            Self::High => 2,
        }
    }
}

/// One rated item submitted for ranking.
///
/// # Invariants
///
/// Fields are private and fixed at construction. `raw_alignment_score` is
/// finite and within `0.0..=100.0`; it is *not* checked against
/// `quality_label` (the rater's score bands are advisory only).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate<K> {
    identifier: K,
    quality_label: QualityLabel,
    boundary_classification: BoundaryClassification,
    grade_alignment: GradeAlignment,
    extraneous_load: ExtraneousLoad,
    raw_alignment_score: f64,
}

impl<K> Candidate<K> {
    /// Build a candidate, rejecting scores that are non-finite or outside `0..=100`.
    pub fn new(
        identifier: K,
        quality_label: QualityLabel,
        boundary_classification: BoundaryClassification,
        grade_alignment: GradeAlignment,
        extraneous_load: ExtraneousLoad,
        raw_alignment_score: f64,
    ) -> Result<Self, ValidationError> {
        if !raw_alignment_score.is_finite() || !(0.0..=100.0).contains(&raw_alignment_score) {
            return Err(ValidationError::ScoreOutOfRange(raw_alignment_score));
        }
        // Fold -0.0 into 0.0 so equal scores never compare unequal.
        let raw_alignment_score = if raw_alignment_score == 0.0 {
            0.0
        } else {
            raw_alignment_score
        };

        Ok(Self {
            identifier,
            quality_label,
            boundary_classification,
            grade_alignment,
            extraneous_load,
            raw_alignment_score,
        })
    }

    pub fn identifier(&self) -> &K {
        &self.identifier
    }

    pub fn quality_label(&self) -> QualityLabel {
        self.quality_label
    }

    pub fn boundary_classification(&self) -> BoundaryClassification {
        self.boundary_classification
    }

    pub fn grade_alignment(&self) -> GradeAlignment {
        self.grade_alignment
    }

    pub fn extraneous_load(&self) -> ExtraneousLoad {
        self.extraneous_load
    }

    pub fn raw_alignment_score(&self) -> f64 {
        self.raw_alignment_score
    }

    /// Passes all three disqualifying checks (quality, boundary, grade).
    pub fn is_eligible(&self) -> bool {
        self.quality_label.is_selectable()
            && !self.boundary_classification.is_disqualifying()
            && !self.grade_alignment.is_disqualifying()
    }
}
