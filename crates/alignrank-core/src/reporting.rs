use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{FinalMatch, QualityLabel, Result};

/// One substandard that gained matches during a remap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapReportEntry {
    pub substandard_id: String,
    pub description: String,
    pub matches: Vec<FinalMatch>,
}

/// A substandard left untouched because its ratings could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapFailure {
    pub substandard_id: String,
    pub reason: String,
}

/// Compact data model used to render the remap report markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapReport {
    pub generated_at: DateTime<Utc>,
    pub total_remapped: usize,
    pub entries: Vec<RemapReportEntry>,
    #[serde(default)]
    pub failures: Vec<RemapFailure>,
}

impl RemapReport {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            total_remapped: 0,
            entries: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Substandards that went from no matches to at least one.
    pub fn flipped(&self) -> usize {
        self.entries.len()
    }

    pub fn still_unmatched(&self) -> usize {
        self.total_remapped.saturating_sub(self.flipped())
    }
}

/// Render the remap report for review.
pub fn render_remap_report_md(report: &RemapReport) -> String {
    let mut out = String::new();
    out.push_str("# Brute-Force Remap Report\n\n");
    out.push_str(&format!(
        "**Generated:** {}\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str("## Summary\n\n");
    out.push_str(&format!(
        "- **Total substandards remapped:** {}\n- **Flipped to having matches:** {}\n- **Still no matches:** {}\n- **Unusable ratings:** {}\n\n",
        report.total_remapped,
        report.flipped(),
        report.still_unmatched(),
        report.failures.len()
    ));

    if !report.entries.is_empty() {
        out.push_str("## Substandards with New Matches\n\n");
        for entry in &report.entries {
            out.push_str(&format!("### {}\n\n", entry.substandard_id));
            out.push_str(&format!("**Description:** {}\n\n", entry.description));
            out.push_str(&format!("**New matches ({}):**\n", entry.matches.len()));
            for m in &entry.matches {
                out.push_str(&format!(
                    "- Seq #{} ({}): {} | score={}\n",
                    m.sequence_number,
                    m.skill,
                    m.quality.map_or("-", QualityLabel::as_str),
                    m.alignment_score.map_or_else(|| "-".to_string(), |s| s.to_string())
                ));
            }
            out.push_str("\n---\n\n");
        }
    }

    if !report.failures.is_empty() {
        out.push_str("## Substandards with Unusable Ratings\n\n");
        for failure in &report.failures {
            out.push_str(&format!("- {}: {}\n", failure.substandard_id, failure.reason));
        }
        out.push('\n');
    }
    out
}

/// Write the remap report markdown.
pub fn write_remap_report_md(path: &Path, report: &RemapReport) -> Result<()> {
    std::fs::write(path, render_remap_report_md(report))?;
    Ok(())
}
