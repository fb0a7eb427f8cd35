use std::cmp::Ordering;

use alignrank_core::ranker::compare;
use alignrank_core::{
    rank, BoundaryClassification, Candidate, ExtraneousLoad, GradeAlignment, QualityLabel,
};
use proptest::prelude::*;

fn quality() -> impl Strategy<Value = QualityLabel> {
    prop::sample::select(QualityLabel::ALL.to_vec())
}

fn boundary() -> impl Strategy<Value = BoundaryClassification> {
    prop::sample::select(BoundaryClassification::ALL.to_vec())
}

fn grade() -> impl Strategy<Value = GradeAlignment> {
    prop::sample::select(GradeAlignment::ALL.to_vec())
}

fn load() -> impl Strategy<Value = ExtraneousLoad> {
    prop::sample::select(ExtraneousLoad::ALL.to_vec())
}

/// Pools with unique identifiers and integer scores, as the rater emits them.
fn pool() -> impl Strategy<Value = Vec<Candidate<u32>>> {
    prop::collection::vec((quality(), boundary(), grade(), load(), 0u8..=100), 0..40).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(idx, (q, b, g, l, s))| {
                    Candidate::new(idx as u32, q, b, g, l, f64::from(s))
                        .expect("generated score in range")
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn ranking_is_deterministic(candidates in pool(), limit in 1usize..10) {
        let a = rank(&candidates, limit).unwrap();
        let b = rank(&candidates, limit).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn input_order_does_not_matter(candidates in pool(), limit in 1usize..10) {
        let mut reversed = candidates.clone();
        reversed.reverse();
        prop_assert_eq!(rank(&candidates, limit).unwrap(), rank(&reversed, limit).unwrap());
    }

    #[test]
    fn output_is_strictly_ordered(candidates in pool()) {
        let result = rank(&candidates, 100).unwrap();
        for pair in result.entries().windows(2) {
            prop_assert_eq!(compare(&pair[0], &pair[1]), Ordering::Less);
        }
        for (idx, entry) in result.iter().enumerate() {
            prop_assert_eq!(entry.rank, idx + 1);
        }
    }

    #[test]
    fn only_eligible_candidates_survive(candidates in pool(), limit in 1usize..10) {
        let result = rank(&candidates, limit).unwrap();
        let eligible = candidates.iter().filter(|c| c.is_eligible()).count();

        prop_assert_eq!(result.eligible_count(), eligible);
        prop_assert_eq!(result.len(), eligible.min(limit));
        for entry in &result {
            prop_assert!(entry.candidate.is_eligible());
        }
    }

    #[test]
    fn truncation_is_a_prefix(candidates in pool(), limit in 1usize..10) {
        let full = rank(&candidates, 100).unwrap();
        let short = rank(&candidates, limit).unwrap();
        prop_assert_eq!(short.entries(), &full.entries()[..short.len()]);
    }
}
