use alignrank_core::{
    final_score, rank, BoundaryClassification, Candidate, ExtraneousLoad, GradeAlignment,
    QualityLabel, RankError, DEFAULT_LIMIT,
};

use BoundaryClassification::{Compliant, MajorViolation, MinorViolation};
use ExtraneousLoad::{High, Low, Moderate};
use GradeAlignment::{OffGrade, OnGrade, SlightlyOff};
use QualityLabel::{Excellent, Fair, NonExistent, Poor};

fn cand(
    id: u32,
    q: QualityLabel,
    b: BoundaryClassification,
    g: GradeAlignment,
    l: ExtraneousLoad,
    score: f64,
) -> Candidate<u32> {
    Candidate::new(id, q, b, g, l, score).expect("valid candidate")
}

fn mixed_pool() -> Vec<Candidate<u32>> {
    vec![
        cand(9, Fair, MinorViolation, SlightlyOff, High, 70.0),
        cand(4, Excellent, Compliant, OnGrade, Low, 88.0),
        cand(7, Poor, Compliant, OnGrade, Low, 99.0),
        cand(1, Excellent, MinorViolation, OnGrade, Moderate, 92.0),
        cand(3, Fair, Compliant, OnGrade, Low, 84.0),
        cand(8, Excellent, MajorViolation, OnGrade, Low, 100.0),
        cand(2, Excellent, Compliant, OffGrade, Low, 100.0),
        cand(6, NonExistent, Compliant, OnGrade, Low, 10.0),
        cand(5, Fair, Compliant, SlightlyOff, Moderate, 84.0),
        cand(10, Excellent, Compliant, OnGrade, Low, 88.0),
    ]
}

#[test]
fn scenario_identifier_breaks_full_tie() {
    let pool = vec![
        cand(1, Excellent, Compliant, OnGrade, Low, 95.0),
        cand(2, Excellent, Compliant, OnGrade, Low, 95.0),
        cand(3, Fair, Compliant, OnGrade, Low, 80.0),
    ];

    let result = rank(&pool, 2).expect("rank");

    let got: Vec<(u32, f64, usize)> = result
        .iter()
        .map(|e| (*e.candidate.identifier(), e.final_score, e.rank))
        .collect();
    assert_eq!(got, vec![(1, 0.95, 1), (2, 0.95, 2)]);
}

#[test]
fn mixed_pool_orders_by_priority_keys() {
    let result = rank(&mixed_pool(), 10).expect("rank");
    let ids: Vec<u32> = result.iter().map(|e| *e.candidate.identifier()).collect();

    // EXCELLENT: 4 & 10 tie at 0.88 (id decides), then 1 at 0.92 - 0.15 = 0.77.
    // FAIR: 3 at 0.63, 5 at 0.63 - 0.15 = 0.48, 9 at 0.175.
    assert_eq!(ids, vec![4, 10, 1, 3, 5, 9]);
    assert_eq!(result.eligible_count(), 6);
}

#[test]
fn excluded_candidates_never_appear() {
    let result = rank(&mixed_pool(), 100).expect("rank");
    for entry in &result {
        let c = &entry.candidate;
        assert!(matches!(c.quality_label(), Excellent | Fair));
        assert_ne!(c.boundary_classification(), MajorViolation);
        assert_ne!(c.grade_alignment(), OffGrade);
    }
    for excluded in [2u32, 6, 7, 8] {
        assert!(result.iter().all(|e| *e.candidate.identifier() != excluded));
    }
}

#[test]
fn major_violation_twin_is_excluded_at_any_limit() {
    let pool = vec![
        cand(1, Excellent, MajorViolation, OnGrade, Low, 97.0),
        cand(2, Excellent, Compliant, OnGrade, Low, 97.0),
    ];
    for limit in 1..=4 {
        let result = rank(&pool, limit).expect("rank");
        let ids: Vec<u32> = result.iter().map(|e| *e.candidate.identifier()).collect();
        assert_eq!(ids, vec![2]);
    }
}

#[test]
fn short_pool_is_not_padded() {
    let pool = vec![
        cand(3, Fair, Compliant, OnGrade, Low, 70.0),
        cand(1, Excellent, Compliant, OnGrade, Low, 90.0),
        cand(2, Fair, MinorViolation, OnGrade, Low, 75.0),
    ];
    let result = rank(&pool, DEFAULT_LIMIT).expect("rank");
    assert_eq!(result.len(), 3);
    let ranks: Vec<usize> = result.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn empty_pool_is_a_valid_outcome() {
    let result = rank::<u32>(&[], DEFAULT_LIMIT).expect("empty is not an error");
    assert!(result.is_empty());
}

#[test]
fn zero_limit_is_rejected() {
    let err = rank(&mixed_pool(), 0).expect_err("zero limit");
    assert!(matches!(err, RankError::InvalidArgument(_)));
}

#[test]
fn documented_scores() {
    assert_eq!(
        final_score(&cand(1, Excellent, Compliant, OnGrade, Low, 90.0)),
        0.9
    );
    let stacked = final_score(&cand(2, Fair, MinorViolation, SlightlyOff, High, 70.0));
    assert!((stacked - 0.175).abs() < 1e-9, "got {}", stacked);
}

#[test]
fn inconsistent_label_and_score_are_not_corrected() {
    // EXCELLENT with a FAIR-band score is ranked as-is.
    let pool = vec![
        cand(1, Excellent, Compliant, OnGrade, Low, 40.0),
        cand(2, Fair, Compliant, OnGrade, Low, 99.0),
    ];
    let result = rank(&pool, 2).expect("rank");
    assert_eq!(*result.entries()[0].candidate.identifier(), 1);
    assert_eq!(result.entries()[0].final_score, 0.4);
}

#[test]
fn repeated_and_concurrent_calls_agree() {
    let pool = mixed_pool();
    let baseline = rank(&pool, 4).expect("rank");

    let mut reversed = pool.clone();
    reversed.reverse();
    assert_eq!(rank(&reversed, 4).expect("rank"), baseline);

    let shared = &pool;
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(move || rank(shared, 4))).collect();
        for h in handles {
            let result = h.join().expect("thread").expect("rank");
            assert_eq!(result, baseline);
        }
    });
}

#[test]
fn string_identifiers_work() {
    let pool = vec![
        Candidate::new("beta".to_string(), Fair, Compliant, OnGrade, Low, 80.0).unwrap(),
        Candidate::new("alpha".to_string(), Fair, Compliant, OnGrade, Low, 80.0).unwrap(),
    ];
    let result = rank(&pool, 5).expect("rank");
    let ids: Vec<&str> = result.iter().map(|e| e.candidate.identifier().as_str()).collect();
    assert_eq!(ids, vec!["alpha", "beta"]);
}
