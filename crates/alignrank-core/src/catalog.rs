//! DI formats corpus: skills → grade progressions → instructional sequences.
//!
//! Only the fields needed to enumerate sequences are modelled; everything
//! else in the corpus is ignored on load.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Result;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DiFormats {
    #[serde(default)]
    pub skills: BTreeMap<String, Skill>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub progression: Vec<Progression>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Progression {
    pub grade: u32,
    #[serde(default)]
    pub sequence: Vec<DiSequence>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiSequence {
    pub sequence_number: u32,
    #[serde(default)]
    pub problem_type: String,
    #[serde(default)]
    pub example_questions: Option<Value>,
    #[serde(default)]
    pub visual_aids: Option<Value>,
    #[serde(default)]
    pub related_formats: Vec<Value>,
}

/// A sequence flattened out of the corpus with its skill and grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSequence {
    pub skill_name: String,
    pub grade: u32,
    pub sequence_number: u32,
    pub problem_type: String,
    pub example_questions: Option<Value>,
    pub visual_aids: Option<Value>,
    pub related_formats: Vec<Value>,
}

pub fn load_di_formats(path: &Path) -> Result<DiFormats> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Every sequence taught at `grade`, sorted by skill name then sequence number.
pub fn extract_sequences_for_grade(formats: &DiFormats, grade: u32) -> Vec<CatalogSequence> {
    let mut out: Vec<CatalogSequence> = formats
        .skills
        .iter()
        .flat_map(|(skill_name, skill)| {
            skill
                .progression
                .iter()
                .filter(move |p| p.grade == grade)
                .flat_map(move |p| {
                    p.sequence.iter().map(move |seq| CatalogSequence {
                        skill_name: skill_name.clone(),
                        grade,
                        sequence_number: seq.sequence_number,
                        problem_type: seq.problem_type.clone(),
                        example_questions: seq.example_questions.clone(),
                        visual_aids: seq.visual_aids.clone(),
                        related_formats: seq.related_formats.clone(),
                    })
                })
        })
        .collect();

    out.sort_by(|a, b| {
        a.skill_name
            .cmp(&b.skill_name)
            .then(a.sequence_number.cmp(&b.sequence_number))
    });
    out
}
