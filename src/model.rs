use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel affiliation for jury members whose line carried no
/// parseable affiliation clause. Distinguishes "not found" from
/// "found but blank".
pub const UNSPECIFIED_AFFILIATION: &str = "Non spécifiée";

/// Closed set of abstract languages recognized in front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbstractLanguage {
    French,
    English,
    Arabic,
}

impl AbstractLanguage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::French => "french",
            Self::English => "english",
            Self::Arabic => "arabic",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JuryMember {
    pub role: String,
    pub name: String,
    pub affiliation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
    pub level: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub content: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub word_count: usize,
    pub page_estimate: usize,
    pub generated_at: String,
}

/// Root result of one extraction run. Built in a single parse
/// invocation and read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub author: String,
    pub university: String,
    pub faculty: String,
    pub department: String,
    pub specialty: String,
    pub defense_date: String,
    pub academic_year: String,
    pub jury: Vec<JuryMember>,
    pub abstracts: BTreeMap<AbstractLanguage, String>,
    pub acknowledgments: String,
    pub dedications: String,
    pub figures: Vec<String>,
    pub tables: Vec<String>,
    pub chapters: Vec<Chapter>,
    pub bibliography: Vec<String>,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn section_count(&self) -> usize {
        self.chapters
            .iter()
            .map(|chapter| chapter.sections.len())
            .sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionCounts {
    pub chapters: usize,
    pub sections: usize,
    pub jury_members: usize,
    pub abstracts: usize,
    pub figure_entries: usize,
    pub table_entries: usize,
    pub bibliography_entries: usize,
    pub word_count: usize,
    pub page_estimate: usize,
    pub lines_total: usize,
    pub boundary_lines: usize,
    pub skipped_lines: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOptionsEcho {
    pub strict: bool,
    pub compute_metadata: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub generated_at: String,
    pub source_path: String,
    pub source_sha256: String,
    pub document_path: String,
    pub options: ExtractionOptionsEcho,
    pub counts: ExtractionCounts,
    pub warnings: Vec<String>,
    pub notes: Vec<String>,
}
