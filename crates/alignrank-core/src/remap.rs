//! Exhaustive remap of substandards that lack acceptable sequences.
//!
//! For every gap found by [`crate::gaps`], ratings covering all sequences of
//! the grade are pulled from a [`RatingSource`], reduced to a selection and
//! folded back into the mappings document. Mappings that already had a good
//! match are left untouched and keep their position.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::domain::{
    load_ratings_degraded, AlignError, BruteforceMetadata, FinalMatch, MappingsDocument, Result,
    SequenceRating, SubstandardMapping, ValidationError,
};
use crate::gaps::find_substandards_without_good_matches;
use crate::obs;
use crate::reporting::{RemapFailure, RemapReport, RemapReportEntry};
use crate::selection::{final_matches, select_top_sequences};

/// Where ratings for a substandard come from.
///
/// `Ok(None)` means no ratings exist yet; the substandard is skipped.
pub trait RatingSource {
    fn ratings_for(&mut self, mapping: &SubstandardMapping)
        -> Result<Option<Vec<SequenceRating>>>;
}

/// Reads `<dir>/<substandard_id>.json` as produced by the external rater.
///
/// Records that fail validation become [`SequenceRating::failed`]
/// placeholders; only an unparseable file fails the substandard.
#[derive(Debug, Clone)]
pub struct DirRatingSource {
    dir: PathBuf,
}

impl DirRatingSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Ratings file for `substandard_id`, always a direct child of the directory.
    pub fn path_for(&self, substandard_id: &str) -> Result<PathBuf> {
        let file_name = format!("{}.json", substandard_id);
        let mut components = Path::new(&file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == file_name.as_str() => {
                Ok(self.dir.join(name))
            }
            _ => Err(ValidationError::UnsafeSubstandardId(substandard_id.to_string()).into()),
        }
    }
}

impl RatingSource for DirRatingSource {
    fn ratings_for(
        &mut self,
        mapping: &SubstandardMapping,
    ) -> Result<Option<Vec<SequenceRating>>> {
        let path = self.path_for(&mapping.substandard_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let loaded = load_ratings_degraded(&path)?;
        if loaded.degraded > 0 {
            obs::emit_ratings_degraded(
                &mapping.substandard_id,
                loaded.degraded,
                loaded.ratings.len(),
            );
        }
        Ok(Some(loaded.ratings))
    }
}

/// In-memory ratings keyed by substandard id.
impl RatingSource for HashMap<String, Vec<SequenceRating>> {
    fn ratings_for(
        &mut self,
        mapping: &SubstandardMapping,
    ) -> Result<Option<Vec<SequenceRating>>> {
        Ok(self.get(&mapping.substandard_id).cloned())
    }
}

/// Result of a remap run.
#[derive(Debug, Clone, PartialEq)]
pub struct RemapOutcome {
    pub document: MappingsDocument,
    pub report: RemapReport,
}

/// Fill gaps in `doc` using ratings from `source`.
///
/// Missing ratings skip the substandard. Ratings that cannot be used (bad
/// JSON, failed validation, unsafe id) are recorded in
/// [`RemapReport::failures`] and the substandard is left untouched. I/O
/// errors abort the run.
pub fn remap_document<S: RatingSource + ?Sized>(
    doc: &MappingsDocument,
    source: &mut S,
    config: &PipelineConfig,
    now: DateTime<Utc>,
) -> Result<RemapOutcome> {
    config.validate()?;
    let remap_id = Uuid::new_v4().to_string();
    let _span = obs::RemapSpan::enter(&remap_id);

    let mut report = RemapReport::new(now);
    let mut updated = Vec::new();

    for gap in find_substandards_without_good_matches(&doc.mappings) {
        let ratings = match source.ratings_for(gap) {
            Ok(Some(ratings)) => ratings,
            Ok(None) => {
                obs::emit_substandard_skipped(&gap.substandard_id, &"no ratings available");
                continue;
            }
            Err(err @ (AlignError::Validation(_) | AlignError::Serialization(_))) => {
                obs::emit_substandard_skipped(&gap.substandard_id, &err);
                report.failures.push(RemapFailure {
                    substandard_id: gap.substandard_id.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
            Err(err) => return Err(err),
        };

        let selection = select_top_sequences(&ratings, &config.ranker)?;
        let matches = final_matches(&selection, gap.grade);
        obs::emit_substandard_remapped(&gap.substandard_id, ratings.len(), matches.len());

        if !matches.is_empty() {
            report.entries.push(RemapReportEntry {
                substandard_id: gap.substandard_id.clone(),
                description: gap.substandard_description.clone(),
                matches: matches.clone(),
            });
        }
        updated.push(apply_selection(gap, matches, ratings.len(), now));
    }

    report.total_remapped = updated.len();
    obs::emit_remap_finished(
        report.total_remapped,
        report.flipped(),
        report.failures.len(),
    );

    let metadata = remap_metadata(&doc.metadata, updated.len(), &config.rater_model, now);
    Ok(RemapOutcome {
        document: MappingsDocument {
            metadata,
            mappings: merge_mappings(&doc.mappings, updated),
        },
        report,
    })
}

/// Copy of `mapping` carrying the new matches and remap provenance.
pub fn apply_selection(
    mapping: &SubstandardMapping,
    matches: Vec<FinalMatch>,
    total_evaluated: usize,
    now: DateTime<Utc>,
) -> SubstandardMapping {
    let mut updated = mapping.clone();
    updated.bruteforce_metadata = Some(BruteforceMetadata {
        total_sequences_evaluated: total_evaluated,
        top_count: matches.len(),
        processing_timestamp: now,
    });
    updated.final_excellent_matches = matches;
    updated
}

/// Replace originals by `substandard_id`, keeping the original order.
pub fn merge_mappings(
    original: &[SubstandardMapping],
    updated: Vec<SubstandardMapping>,
) -> Vec<SubstandardMapping> {
    let mut lookup: HashMap<String, SubstandardMapping> = updated
        .into_iter()
        .map(|m| (m.substandard_id.clone(), m))
        .collect();

    original
        .iter()
        .map(|m| lookup.remove(&m.substandard_id).unwrap_or_else(|| m.clone()))
        .collect()
}

/// Output metadata: source metadata plus remap provenance.
///
/// The source `processing_date` is kept as `original_processing_date`.
pub fn remap_metadata(
    source: &Map<String, Value>,
    remapped: usize,
    rater_model: &str,
    now: DateTime<Utc>,
) -> Map<String, Value> {
    let mut metadata = source.clone();
    if let Some(date) = metadata.remove("processing_date") {
        metadata.insert("original_processing_date".to_string(), date);
    }
    metadata.insert(
        "bruteforce_remap_date".to_string(),
        Value::String(now.to_rfc3339()),
    );
    metadata.insert("bruteforce_remapped_count".to_string(), remapped.into());
    metadata.insert(
        "llm_model".to_string(),
        Value::String(rater_model.to_string()),
    );
    metadata.insert(
        "completion_status".to_string(),
        Value::String("complete".to_string()),
    );
    metadata
}

/// Sidecar holding the SHA-256 of a written mappings file.
pub fn digest_path(path: &Path) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(".digest");
    PathBuf::from(s)
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Read a mappings document without integrity checks.
pub fn read_mappings(path: &Path) -> Result<MappingsDocument> {
    let content = std::fs::read(path)?;
    Ok(serde_json::from_slice(&content)?)
}

/// Persist `path` as pretty JSON plus its `.digest` sidecar.
pub fn write_mappings(path: &Path, doc: &MappingsDocument) -> Result<PathBuf> {
    let json = serde_json::to_vec_pretty(doc)?;
    let digest = sha256_hex(&json);
    let sidecar = digest_path(path);

    std::fs::write(path, &json)?;
    std::fs::write(&sidecar, digest.as_bytes())?;
    Ok(sidecar)
}

/// Read `path` and verify it against its `.digest` sidecar.
pub fn read_mappings_verified(path: &Path) -> Result<MappingsDocument> {
    let json = std::fs::read(path)?;
    let expected = std::fs::read_to_string(digest_path(path))?;
    let actual = sha256_hex(&json);
    if expected.trim() != actual {
        return Err(AlignError::DigestMismatch {
            expected: expected.trim().to_string(),
            actual,
        });
    }
    Ok(serde_json::from_slice(&json)?)
}
