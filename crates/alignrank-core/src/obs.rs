//! Structured observability hooks for selection and remap runs.
//!
//! The ranker itself never logs; these helpers are called by the layers
//! wrapping it. Events are emitted at `info!` unless noted and carry an
//! `event` field in `domain.action` form.

use tracing::{debug, info, warn};

/// RAII guard that enters a remap-scoped tracing span.
///
/// ```ignore
/// let _span = RemapSpan::enter("6f1c...");
/// // every event below is tagged with remap_id
/// ```
pub struct RemapSpan {
    _span: tracing::span::EnteredSpan,
}

impl RemapSpan {
    pub fn enter(remap_id: &str) -> Self {
        let span = tracing::info_span!("alignrank.remap", remap_id = %remap_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a selection finished for one pool of ratings.
pub fn emit_selection_completed(rated: usize, eligible: usize, selected: usize) {
    info!(
        event = "selection.completed",
        rated = rated,
        eligible = eligible,
        selected = selected,
    );
}

/// Emit event: nothing in the pool was acceptable (warning level).
pub fn emit_selection_empty(rated: usize) {
    warn!(event = "selection.empty", rated = rated);
}

/// Emit event: one selected entry, at debug level.
pub fn emit_selection_entry(
    rank: usize,
    sequence: &dyn std::fmt::Display,
    quality: &str,
    final_score: f64,
    alignment_score: u8,
) {
    debug!(
        event = "selection.entry",
        rank = rank,
        sequence = %sequence,
        quality = %quality,
        final_score = final_score,
        alignment_score = alignment_score,
    );
}

/// Emit event: gap detection over a mappings document.
pub fn emit_gaps_found(total: usize, gaps: usize) {
    info!(event = "gaps.found", total = total, gaps = gaps);
}

/// Emit event: a substandard was reprocessed by the remap.
pub fn emit_substandard_remapped(substandard_id: &str, evaluated: usize, selected: usize) {
    info!(
        event = "remap.substandard",
        substandard_id = %substandard_id,
        evaluated = evaluated,
        selected = selected,
        flipped = selected > 0,
    );
}

/// Emit event: a substandard was skipped (warning level).
pub fn emit_substandard_skipped(substandard_id: &str, reason: &dyn std::fmt::Display) {
    warn!(event = "remap.skipped", substandard_id = %substandard_id, reason = %reason);
}

/// Emit event: some records in a ratings file were replaced by placeholders (warning level).
pub fn emit_ratings_degraded(substandard_id: &str, degraded: usize, total: usize) {
    warn!(
        event = "remap.ratings_degraded",
        substandard_id = %substandard_id,
        degraded = degraded,
        total = total,
    );
}

/// Emit event: remap run finished.
pub fn emit_remap_finished(remapped: usize, flipped: usize, failed: usize) {
    info!(
        event = "remap.finished",
        remapped = remapped,
        flipped = flipped,
        still_unmatched = remapped.saturating_sub(flipped),
        failed = failed,
    );
}
