//! Detection of substandards that still lack an acceptable sequence.

use crate::domain::SubstandardMapping;
use crate::obs;

/// Mappings with no final match and no FAIR/EXCELLENT prior rating, in input order.
pub fn find_substandards_without_good_matches(
    mappings: &[SubstandardMapping],
) -> Vec<&SubstandardMapping> {
    let gaps: Vec<&SubstandardMapping> = mappings.iter().filter(|m| !m.has_good_match()).collect();
    obs::emit_gaps_found(mappings.len(), gaps.len());
    gaps
}
