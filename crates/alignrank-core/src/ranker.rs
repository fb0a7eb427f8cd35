//! Deterministic candidate ranker.
//!
//! [`rank`] is a pure transform: eligibility filter → composite score →
//! total ordering → truncation. It holds no state, performs no I/O and
//! never logs; callers wrap it for observability (see [`crate::selection`]).
//!
//! Ordering keys, each strictly dominating the next:
//!
//! 1. EXCELLENT before everything else
//! 2. higher `final_score`
//! 3. COMPLIANT boundary before any violation
//! 4. lower extraneous load (LOW, MODERATE, HIGH)
//! 5. ON_GRADE before SLIGHTLY_OFF
//! 6. ascending identifier

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::{
    BoundaryClassification, Candidate, ExtraneousLoad, GradeAlignment, QualityLabel, RankError,
};

/// Number of candidates kept when the caller does not choose.
pub const DEFAULT_LIMIT: usize = 5;

const EXCELLENT_WEIGHT: f64 = 1.0;
const FAIR_WEIGHT: f64 = 0.75;
const MINOR_VIOLATION_PENALTY: f64 = 0.10;
const SLIGHTLY_OFF_PENALTY: f64 = 0.10;
const MODERATE_LOAD_PENALTY: f64 = 0.05;
const HIGH_LOAD_PENALTY: f64 = 0.15;

/// A candidate that survived filtering, with its composite score and position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate<K> {
    pub candidate: Candidate<K>,
    /// Weighted score minus penalties. May be negative; never clamped.
    pub final_score: f64,
    /// 1-based position in the ranking.
    pub rank: usize,
}

/// Ordered output of one [`rank`] call.
///
/// An empty result means no candidate was acceptable; it is not a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingResult<K> {
    entries: Vec<ScoredCandidate<K>>,
    eligible: usize,
}

impl<K> RankingResult<K> {
    pub fn entries(&self) -> &[ScoredCandidate<K>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Eligible candidates seen before truncation.
    pub fn eligible_count(&self) -> usize {
        self.eligible
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredCandidate<K>> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<ScoredCandidate<K>> {
        self.entries
    }
}

impl<'a, K> IntoIterator for &'a RankingResult<K> {
    type Item = &'a ScoredCandidate<K>;
    type IntoIter = std::slice::Iter<'a, ScoredCandidate<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K> IntoIterator for RankingResult<K> {
    type Item = ScoredCandidate<K>;
    type IntoIter = std::vec::IntoIter<ScoredCandidate<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Composite score for a candidate, regardless of eligibility.
pub fn final_score<K>(candidate: &Candidate<K>) -> f64 {
    let base_weight = if candidate.quality_label() == QualityLabel::Excellent {
        EXCELLENT_WEIGHT
    } else {
        FAIR_WEIGHT
    };

    let mut penalty = 0.0;
    if candidate.boundary_classification() == BoundaryClassification::MinorViolation {
        penalty += MINOR_VIOLATION_PENALTY;
    }
    if candidate.grade_alignment() == GradeAlignment::SlightlyOff {
        penalty += SLIGHTLY_OFF_PENALTY;
    }
    match candidate.extraneous_load() {
        ExtraneousLoad::Low => {}
        ExtraneousLoad::Moderate => penalty += MODERATE_LOAD_PENALTY,
        ExtraneousLoad::High => penalty += HIGH_LOAD_PENALTY,
    }

    base_weight * (candidate.raw_alignment_score() / 100.0) - penalty
}

/// Select and order the best `limit` candidates.
///
/// Input order is irrelevant and the input is never mutated. Fails only when
/// `limit` is zero.
pub fn rank<K>(candidates: &[Candidate<K>], limit: usize) -> Result<RankingResult<K>, RankError>
where
    K: Ord + Clone,
{
    if limit == 0 {
        return Err(RankError::InvalidArgument(
            "limit must be a positive integer".to_string(),
        ));
    }

    let mut scored: Vec<ScoredCandidate<K>> = candidates
        .iter()
        .filter(|c| c.is_eligible())
        .map(|c| ScoredCandidate {
            candidate: c.clone(),
            final_score: final_score(c),
            rank: 0,
        })
        .collect();
    let eligible = scored.len();

    scored.sort_by(compare);
    scored.truncate(limit);
    for (idx, entry) in scored.iter_mut().enumerate() {
        entry.rank = idx + 1;
    }

    Ok(RankingResult {
        entries: scored,
        eligible,
    })
}

/// Total order over scored candidates; `Less` means `a` ranks first.
pub fn compare<K: Ord>(a: &ScoredCandidate<K>, b: &ScoredCandidate<K>) -> Ordering {
    let (ca, cb) = (&a.candidate, &b.candidate);

    is_excellent(cb)
        .cmp(&is_excellent(ca))
        .then_with(|| b.final_score.total_cmp(&a.final_score))
        .then_with(|| is_compliant(cb).cmp(&is_compliant(ca)))
        .then_with(|| {
            ca.extraneous_load()
                .weight()
                .cmp(&cb.extraneous_load().weight())
        })
        .then_with(|| is_on_grade(cb).cmp(&is_on_grade(ca)))
        .then_with(|| ca.identifier().cmp(cb.identifier()))
}

fn is_excellent<K>(c: &Candidate<K>) -> bool {
    c.quality_label() == QualityLabel::Excellent
}

fn is_compliant<K>(c: &Candidate<K>) -> bool {
    c.boundary_classification() == BoundaryClassification::Compliant
}

fn is_on_grade<K>(c: &Candidate<K>) -> bool {
    c.grade_alignment() == GradeAlignment::OnGrade
}
