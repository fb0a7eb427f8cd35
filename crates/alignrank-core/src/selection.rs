//! Top-N selection over rater output.
//!
//! Wraps [`ranker::rank`] for [`SequenceRating`]s: builds candidates, ranks
//! them, logs the outcome and maps the winners back to their ratings.

use serde::Serialize;

use crate::config::RankerConfig;
use crate::domain::{FinalMatch, Result, SequenceKey, SequenceRating};
use crate::obs;
use crate::ranker;

/// One rating chosen by the ranker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedSequence {
    pub rank: usize,
    pub final_score: f64,
    pub rating: SequenceRating,
}

/// Outcome of selecting from one pool of ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// Ratings submitted.
    pub rated: usize,
    /// Ratings that passed the eligibility filter.
    pub eligible: usize,
    /// Winners in rank order.
    pub selected: Vec<SelectedSequence>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }
}

/// Rank `ratings` and keep the best `config.limit`.
///
/// Candidates are keyed by `(SequenceKey, position)`: sequence number and
/// skill decide ties, and the input position only separates exact
/// duplicates.
pub fn select_top_sequences(
    ratings: &[SequenceRating],
    config: &RankerConfig,
) -> Result<Selection> {
    let candidates = ratings
        .iter()
        .enumerate()
        .map(|(idx, r)| r.candidate_with_id((r.key(), idx)))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let ranking = ranker::rank::<(SequenceKey, usize)>(&candidates, config.limit)?;
    let eligible = ranking.eligible_count();

    let selected: Vec<SelectedSequence> = ranking
        .into_iter()
        .map(|entry| {
            let (_, idx) = entry.candidate.identifier();
            SelectedSequence {
                rank: entry.rank,
                final_score: entry.final_score,
                rating: ratings[*idx].clone(),
            }
        })
        .collect();

    if selected.is_empty() {
        obs::emit_selection_empty(ratings.len());
    } else {
        obs::emit_selection_completed(ratings.len(), eligible, selected.len());
        for s in &selected {
            obs::emit_selection_entry(
                s.rank,
                &s.rating.key(),
                s.rating.match_quality.as_str(),
                s.final_score,
                s.rating.alignment_score,
            );
        }
    }

    Ok(Selection {
        rated: ratings.len(),
        eligible,
        selected,
    })
}

/// Records written to `final_excellent_matches`, in rank order.
pub fn final_matches(selection: &Selection, grade: u32) -> Vec<FinalMatch> {
    selection
        .selected
        .iter()
        .map(|s| {
            FinalMatch::ranked(
                s.rating.skill_name.clone(),
                grade,
                s.rating.sequence_number,
                s.rating.match_quality,
                s.rating.alignment_score,
            )
        })
        .collect()
}
