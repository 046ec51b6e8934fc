use std::collections::BTreeMap;

use anyhow::Result;
use tracing::debug;

use super::builder::BodyBuilder;
use super::headings::{self, HeadingKind};
use super::patterns::{Boundary, JuryCapture, MetaField, PatternSet};
use crate::model::{AbstractLanguage, Document, JuryMember, UNSPECIFIED_AFFILIATION};

/// Bibliography lines shorter than this are stray page numbers or
/// running headers, not entries.
const MIN_BIBLIOGRAPHY_ENTRY_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentState {
    Meta,
    Acknowledgments,
    Dedications,
    Abstract(AbstractLanguage),
    ListOfFigures,
    ListOfTables,
    Body,
    Bibliography,
}

impl SegmentState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Meta => "meta",
            Self::Acknowledgments => "acknowledgments",
            Self::Dedications => "dedications",
            Self::Abstract(language) => language.as_str(),
            Self::ListOfFigures => "list-of-figures",
            Self::ListOfTables => "list-of-tables",
            Self::Body => "body",
            Self::Bibliography => "bibliography",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SegmentStats {
    pub lines_total: usize,
    pub boundary_lines: usize,
    pub skipped_lines: usize,
}

#[derive(Debug)]
pub struct SegmentResult {
    pub document: Document,
    pub warnings: Vec<String>,
    pub stats: SegmentStats,
}

/// Single-pass segmentation: consumes the normalized line stream and
/// routes each line either to a state transition or to the
/// accumulator of the current state. All state is local to the call.
pub fn segment(patterns: &PatternSet, lines: &[String]) -> SegmentResult {
    let mut machine = Machine::new();
    let mut warnings = Vec::<String>::new();
    let mut stats = SegmentStats::default();

    for (index, line) in lines.iter().enumerate() {
        stats.lines_total += 1;

        let allow_title_start = machine.state == SegmentState::Meta;
        if let Some(boundary) = patterns.match_boundary(line, allow_title_start) {
            stats.boundary_lines += 1;
            machine.apply_boundary(boundary);
            continue;
        }

        match machine.route(patterns, line) {
            Ok(consumed) => {
                if !consumed {
                    stats.skipped_lines += 1;
                }
            }
            Err(error) => {
                stats.skipped_lines += 1;
                warnings.push(format!("line {} skipped: {error}", index + 1));
            }
        }
    }

    SegmentResult {
        document: machine.finish(),
        warnings,
        stats,
    }
}

#[derive(Debug)]
struct Machine {
    state: SegmentState,
    collecting_title: bool,
    title_parts: Vec<String>,
    author: String,
    university: String,
    faculty: String,
    department: String,
    specialty: String,
    defense_date: String,
    academic_year: String,
    jury: Vec<JuryMember>,
    acknowledgments: Vec<String>,
    dedications: Vec<String>,
    abstracts: BTreeMap<AbstractLanguage, Vec<String>>,
    figures: Vec<String>,
    tables: Vec<String>,
    bibliography: Vec<String>,
    body: BodyBuilder,
}

impl Machine {
    fn new() -> Self {
        Self {
            state: SegmentState::Meta,
            collecting_title: false,
            title_parts: Vec::new(),
            author: String::new(),
            university: String::new(),
            faculty: String::new(),
            department: String::new(),
            specialty: String::new(),
            defense_date: String::new(),
            academic_year: String::new(),
            jury: Vec::new(),
            acknowledgments: Vec::new(),
            dedications: Vec::new(),
            abstracts: BTreeMap::new(),
            figures: Vec::new(),
            tables: Vec::new(),
            bibliography: Vec::new(),
            body: BodyBuilder::new(),
        }
    }

    fn apply_boundary(&mut self, boundary: Boundary) {
        let next = match boundary {
            Boundary::TitleStart { remainder } => {
                self.collecting_title = true;
                if let Some(remainder) = remainder {
                    self.title_parts.push(remainder);
                }
                SegmentState::Meta
            }
            Boundary::Acknowledgments => SegmentState::Acknowledgments,
            Boundary::Dedications => SegmentState::Dedications,
            Boundary::Abstract(language) => SegmentState::Abstract(language),
            Boundary::ListOfFigures => SegmentState::ListOfFigures,
            Boundary::ListOfTables => SegmentState::ListOfTables,
            Boundary::BodyStart => SegmentState::Body,
            Boundary::Bibliography => SegmentState::Bibliography,
        };

        if next != SegmentState::Meta {
            self.collecting_title = false;
        }
        if next != self.state {
            debug!(from = self.state.as_str(), to = next.as_str(), "state transition");
        }
        self.state = next;
    }

    /// Routes one non-boundary line. Returns whether the line was
    /// consumed by an accumulator; errors are converted to warnings
    /// by the caller so a malformed line never aborts the parse.
    fn route(&mut self, patterns: &PatternSet, line: &str) -> Result<bool> {
        match self.state {
            SegmentState::Meta => Ok(self.route_meta(patterns, line)),
            SegmentState::Acknowledgments => {
                self.acknowledgments.push(line.to_string());
                Ok(true)
            }
            SegmentState::Dedications => {
                self.dedications.push(line.to_string());
                Ok(true)
            }
            SegmentState::Abstract(language) => {
                self.abstracts.entry(language).or_default().push(line.to_string());
                Ok(true)
            }
            SegmentState::ListOfFigures => {
                if patterns.is_figure_item(line) {
                    self.figures.push(line.to_string());
                    return Ok(true);
                }
                Ok(false)
            }
            SegmentState::ListOfTables => {
                if patterns.is_table_item(line) {
                    self.tables.push(line.to_string());
                    return Ok(true);
                }
                Ok(false)
            }
            SegmentState::Body => {
                match headings::classify(patterns, line, self.body.has_open_chapter()) {
                    Some(HeadingKind::Chapter) => self.body.open_chapter(line),
                    Some(HeadingKind::Section { level }) => self.body.open_section(line, level),
                    None => self.body.push_line(line),
                }
                Ok(true)
            }
            SegmentState::Bibliography => {
                if line.chars().count() < MIN_BIBLIOGRAPHY_ENTRY_LEN {
                    return Ok(false);
                }
                self.bibliography.push(line.to_string());
                Ok(true)
            }
        }
    }

    /// Meta-state routing: metadata matchers then the jury matcher,
    /// in fixed order. Scalar fields are last-write-wins; the title
    /// is append-only. A metadata match ends the title-continuation
    /// sub-state. Unmatched lines are front-matter noise and are
    /// deliberately ignored.
    fn route_meta(&mut self, patterns: &PatternSet, line: &str) -> bool {
        if let Some((field, value)) = patterns.match_metadata(line) {
            self.collecting_title = false;
            self.set_field(field, value);
            return true;
        }

        if let Some(capture) = patterns.match_jury(line) {
            self.collecting_title = false;
            self.push_jury(capture);
            return true;
        }

        if self.collecting_title {
            self.title_parts.push(line.to_string());
            return true;
        }

        true
    }

    fn set_field(&mut self, field: MetaField, value: String) {
        match field {
            MetaField::Author => self.author = value,
            MetaField::Specialty => self.specialty = value,
            MetaField::DefenseDate => self.defense_date = value,
            MetaField::University => self.university = value,
            MetaField::Faculty => self.faculty = value,
            MetaField::Department => self.department = value,
            MetaField::AcademicYear => self.academic_year = value,
        }
    }

    fn push_jury(&mut self, capture: JuryCapture) {
        self.jury.push(JuryMember {
            role: capture.role,
            name: capture.name,
            affiliation: capture
                .affiliation
                .unwrap_or_else(|| UNSPECIFIED_AFFILIATION.to_string()),
        });
    }

    fn finish(self) -> Document {
        let abstracts = self
            .abstracts
            .into_iter()
            .filter_map(|(language, lines)| {
                let text = lines.join("\n").trim().to_string();
                if text.is_empty() { None } else { Some((language, text)) }
            })
            .collect::<BTreeMap<AbstractLanguage, String>>();

        Document {
            title: clean_title(&self.title_parts),
            author: self.author,
            university: self.university,
            faculty: self.faculty,
            department: self.department,
            specialty: self.specialty,
            defense_date: self.defense_date,
            academic_year: self.academic_year,
            jury: self.jury,
            abstracts,
            acknowledgments: self.acknowledgments.join("\n").trim().to_string(),
            dedications: self.dedications.join("\n").trim().to_string(),
            figures: self.figures,
            tables: self.tables,
            chapters: self.body.finish(),
            bibliography: self.bibliography,
            metadata: Default::default(),
        }
    }
}

/// Whitespace-normalizes the accumulated title and strips stray
/// markup artifacts left over from cover-page decoration.
fn clean_title(parts: &[String]) -> String {
    let joined = parts.join(" ");
    let normalized = joined.split_whitespace().collect::<Vec<&str>>().join(" ");
    normalized
        .trim_matches(|ch: char| matches!(ch, '"' | '«' | '»' | ':' | '-' | '–' | '—' | '*' | '_'))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> PatternSet {
        PatternSet::new().expect("pattern set compiles")
    }

    fn lines(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn metadata_lines_set_fields_without_disturbing_each_other() {
        let patterns = patterns();
        let result = segment(
            &patterns,
            &lines(&[
                "Présentée par: Jane Doe",
                "Spécialité: Computer Science",
            ]),
        );

        assert_eq!(result.document.author, "Jane Doe");
        assert_eq!(result.document.specialty, "Computer Science");
    }

    #[test]
    fn scalar_fields_are_last_write_wins() {
        let patterns = patterns();
        let result = segment(
            &patterns,
            &lines(&["Spécialité: Physique", "Spécialité: Informatique"]),
        );

        assert_eq!(result.document.specialty, "Informatique");
    }

    #[test]
    fn multi_line_title_is_appended_then_cleaned() {
        let patterns = patterns();
        let result = segment(
            &patterns,
            &lines(&[
                "Thème :",
                "Extraction automatique de structure",
                "dans les documents académiques",
                "Soutenue le 10 mai 2024",
            ]),
        );

        assert_eq!(
            result.document.title,
            "Extraction automatique de structure dans les documents académiques"
        );
        assert_eq!(result.document.defense_date, "10 mai 2024");
    }

    #[test]
    fn jury_lines_accumulate_with_sentinel_affiliation() {
        let patterns = patterns();
        let result = segment(
            &patterns,
            &lines(&[
                "Président du jury : M. Karim Benali",
                "Directrice de thèse: Dr. A. Smith, Pr, University X",
            ]),
        );

        let jury = &result.document.jury;
        assert_eq!(jury.len(), 2);
        assert_eq!(jury[0].affiliation, UNSPECIFIED_AFFILIATION);
        assert_eq!(jury[1].role, "Directrice de thèse");
        assert_eq!(jury[1].name, "Dr. A. Smith");
        assert_eq!(jury[1].affiliation, "University X");
    }

    #[test]
    fn abstract_key_is_present_only_with_captured_text() {
        let patterns = patterns();
        let result = segment(
            &patterns,
            &lines(&["Résumé", "Ce travail étudie la segmentation.", "Abstract"]),
        );

        let abstracts = &result.document.abstracts;
        assert_eq!(
            abstracts.get(&AbstractLanguage::French).map(String::as_str),
            Some("Ce travail étudie la segmentation.")
        );
        assert!(!abstracts.contains_key(&AbstractLanguage::English));
    }

    #[test]
    fn list_states_keep_only_matching_entries() {
        let patterns = patterns();
        let result = segment(
            &patterns,
            &lines(&[
                "Liste des figures",
                "Figure 1 : architecture",
                "page 12",
                "Figure 2 : résultats",
                "Liste des tableaux",
                "Tableau 1 : comparaison",
                "un intrus",
            ]),
        );

        assert_eq!(result.document.figures.len(), 2);
        assert_eq!(result.document.tables.len(), 1);
        assert_eq!(result.stats.skipped_lines, 2);
    }

    #[test]
    fn bibliography_keeps_qualifying_lines_in_order() {
        let patterns = patterns();
        let result = segment(
            &patterns,
            &lines(&[
                "Bibliographie",
                "Knuth, D. The Art of Computer Programming, 1968.",
                "12",
                "Dijkstra, E. W. A Discipline of Programming, 1976.",
            ]),
        );

        assert_eq!(
            result.document.bibliography,
            vec![
                "Knuth, D. The Art of Computer Programming, 1968.",
                "Dijkstra, E. W. A Discipline of Programming, 1976.",
            ]
        );
    }

    #[test]
    fn body_example_from_the_two_chapter_layout() {
        let patterns = patterns();
        let result = segment(
            &patterns,
            &lines(&[
                "Introduction",
                "I. Introduction",
                "Some opening text.",
                "1.1 Background",
                "Context text.",
                "II. Methodology",
                "Approach text.",
            ]),
        );

        let chapters = &result.document.chapters;
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "I. Introduction");
        assert_eq!(chapters[0].content, "Some opening text.");
        assert_eq!(chapters[0].sections.len(), 1);
        assert_eq!(chapters[0].sections[0].title, "1.1 Background");
        assert_eq!(chapters[0].sections[0].content, "Context text.");
        assert_eq!(chapters[1].title, "II. Methodology");
        assert_eq!(chapters[1].content, "Approach text.");
        assert!(chapters[1].sections.is_empty());
    }

    #[test]
    fn boundary_lines_are_never_accumulated_as_content() {
        let patterns = patterns();
        let result = segment(
            &patterns,
            &lines(&["Remerciements", "Merci à toutes et à tous.", "Introduction", "Du texte."]),
        );

        assert_eq!(result.document.acknowledgments, "Merci à toutes et à tous.");
        assert_eq!(result.stats.boundary_lines, 2);
        let body_text = result
            .document
            .chapters
            .iter()
            .map(|chapter| chapter.content.clone())
            .collect::<Vec<String>>()
            .join("\n");
        assert!(!body_text.contains("Remerciements"));
        assert!(!body_text.contains("Introduction"));
    }
}
