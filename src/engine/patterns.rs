use anyhow::{Context, Result};
use regex::Regex;

use crate::model::AbstractLanguage;

/// Control signal produced when a line matches a section-boundary
/// recognizer. Boundary lines are consumed by the state machine and
/// never appended to any content accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Boundary {
    /// Cover-page title marker; carries any same-line remainder.
    TitleStart { remainder: Option<String> },
    Acknowledgments,
    Dedications,
    Abstract(AbstractLanguage),
    ListOfFigures,
    ListOfTables,
    BodyStart,
    Bibliography,
}

/// Scalar metadata fields captured from labeled front-matter lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
    Author,
    Specialty,
    DefenseDate,
    University,
    Faculty,
    Department,
    AcademicYear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JuryCapture {
    pub role: String,
    pub name: String,
    pub affiliation: Option<String>,
}

/// Fixed table of compiled recognizers shared by every pipeline
/// stage. All matchers are deterministic and order-independent; the
/// state machine imposes the priority order, not this table.
#[derive(Debug)]
pub struct PatternSet {
    title_start: Regex,
    acknowledgments: Regex,
    dedications: Regex,
    abstract_french: Regex,
    abstract_english: Regex,
    abstract_arabic: Regex,
    list_of_figures: Regex,
    list_of_tables: Regex,
    bibliography: Regex,
    body_start: Regex,
    author: Regex,
    specialty: Regex,
    defense_date: Regex,
    university: Regex,
    faculty: Regex,
    department: Regex,
    academic_year: Regex,
    jury_line: Regex,
    academic_title: Regex,
    figure_item: Regex,
    table_item: Regex,
    chapter_roman: Regex,
    chapter_keyword: Regex,
    chapter_capitalized: Regex,
    section_numeric: Regex,
    section_lettered: Regex,
    section_bullet: Regex,
}

impl PatternSet {
    pub fn new() -> Result<Self> {
        Ok(Self {
            title_start: Regex::new(r"(?i)^(?:th[èe]me|intitul[ée]|sujet|titre)\s*:?\s*(?P<rest>.*)$")
                .context("failed to compile title-start regex")?,
            acknowledgments: Regex::new(r"(?i)^remerciements?\s*[:.]?\s*$")
                .context("failed to compile acknowledgments regex")?,
            dedications: Regex::new(r"(?i)^d[ée]dicaces?\s*[:.]?\s*$")
                .context("failed to compile dedications regex")?,
            abstract_french: Regex::new(r"(?i)^r[ée]sum[ée]s?\s*[:.]?\s*$")
                .context("failed to compile french abstract regex")?,
            abstract_english: Regex::new(r"(?i)^(?:abstract|summary)\s*[:.]?\s*$")
                .context("failed to compile english abstract regex")?,
            abstract_arabic: Regex::new(r"^(?:ال)?ملخص\s*[:.]?\s*$")
                .context("failed to compile arabic abstract regex")?,
            list_of_figures: Regex::new(r"(?i)^listes?\s+des\s+figures\s*[:.]?\s*$")
                .context("failed to compile list-of-figures regex")?,
            list_of_tables: Regex::new(r"(?i)^listes?\s+des\s+tab(?:leaux|les)\s*[:.]?\s*$")
                .context("failed to compile list-of-tables regex")?,
            bibliography: Regex::new(
                r"(?i)^(?:bibliographie|r[ée]f[ée]rences(?:\s+bibliographiques)?|references|webographie)\s*[:.]?\s*$",
            )
            .context("failed to compile bibliography regex")?,
            body_start: Regex::new(r"(?i)^introduction(?:\s+g[ée]n[ée]rale)?\s*[:.]?\s*$")
                .context("failed to compile body-start regex")?,
            author: Regex::new(
                r"(?i)^(?:pr[ée]sent[ée](?:e)?s?\s+(?:et\s+soutenu(?:e)?s?\s+)?par|r[ée]alis[ée](?:e)?s?\s+par|[ée]labor[ée](?:e)?s?\s+par)\s*:?\s*(?P<value>.+)$",
            )
            .context("failed to compile author regex")?,
            specialty: Regex::new(r"(?i)^(?:sp[ée]cialit[ée]|option|fili[èe]re)\s*:?\s*(?P<value>.+)$")
                .context("failed to compile specialty regex")?,
            defense_date: Regex::new(
                r"(?i)^soutenu(?:e)?s?\s+(?:publiquement\s+)?le\s*:?\s*(?P<value>.+)$",
            )
            .context("failed to compile defense-date regex")?,
            university: Regex::new(r"(?i)^universit[ée]\s*(?:des?\s+|d')?\s*:?\s*(?P<value>.+)$")
                .context("failed to compile university regex")?,
            faculty: Regex::new(r"(?i)^facult[ée]\s*(?:des?\s+|d')?\s*:?\s*(?P<value>.+)$")
                .context("failed to compile faculty regex")?,
            department: Regex::new(r"(?i)^d[ée]partement\s*(?:des?\s+|d')?\s*:?\s*(?P<value>.+)$")
                .context("failed to compile department regex")?,
            academic_year: Regex::new(r"(?i)^ann[ée]e\s+universitaire\s*:?\s*(?P<value>.+)$")
                .context("failed to compile academic-year regex")?,
            jury_line: Regex::new(
                r"(?i)^(?P<role>(?:co[-\s]?)?direct(?:eur|rice)(?:\s+de\s+th[èe]se)?|pr[ée]sident(?:e)?(?:\s+d[ue]\s+jury)?|rapporteur(?:e|se)?|examin(?:ateur|atrice)|encadr(?:eur|ant|ante)|promot(?:eur|rice)|invit[ée](?:e)?|membre(?:\s+du\s+jury)?)\s*:\s*(?P<name>[^,]+)(?:,\s*(?P<affiliation>.+))?$",
            )
            .context("failed to compile jury-line regex")?,
            academic_title: Regex::new(r"(?i)^(?:pr|prof|professeur|dr|mca|mcb|maa|mab|phd)\.?$")
                .context("failed to compile academic-title regex")?,
            figure_item: Regex::new(r"(?i)^figure\s+\d+")
                .context("failed to compile figure-item regex")?,
            table_item: Regex::new(r"(?i)^tab(?:leau|le)\s+\d+")
                .context("failed to compile table-item regex")?,
            chapter_roman: Regex::new(r"^(?:X|IX|VIII|VII|VI|V|IV|III|II|I)[.)]\s+\S")
                .context("failed to compile roman chapter regex")?,
            chapter_keyword: Regex::new(r"(?i)^(?:chapitre|chapter|partie)\s+(?:\d+|[IVXLC]+)\b")
                .context("failed to compile keyword chapter regex")?,
            chapter_capitalized: Regex::new(r"^\p{Lu}\p{Ll}+\s+\d+\b")
                .context("failed to compile capitalized chapter regex")?,
            section_numeric: Regex::new(r"^(?P<number>\d+(?:\.\d+)+)[.)]?\s*(?P<rest>.*)$")
                .context("failed to compile numeric section regex")?,
            section_lettered: Regex::new(r"^[a-z][.)]\s+\S")
                .context("failed to compile lettered section regex")?,
            section_bullet: Regex::new(r"^[-–—•*]\s+\S")
                .context("failed to compile bullet section regex")?,
        })
    }

    /// Tests a line against the boundary recognizers. At most one
    /// boundary fires per line; `allow_title_start` restricts the
    /// cover-page title marker to the meta state, where it is the
    /// highest-priority boundary.
    pub fn match_boundary(&self, line: &str, allow_title_start: bool) -> Option<Boundary> {
        if allow_title_start {
            if let Some(captures) = self.title_start.captures(line) {
                let remainder = captures
                    .name("rest")
                    .map(|value| value.as_str().trim())
                    .filter(|value| !value.is_empty())
                    .map(str::to_string);
                return Some(Boundary::TitleStart { remainder });
            }
        }

        if self.acknowledgments.is_match(line) {
            return Some(Boundary::Acknowledgments);
        }
        if self.dedications.is_match(line) {
            return Some(Boundary::Dedications);
        }
        if self.abstract_french.is_match(line) {
            return Some(Boundary::Abstract(AbstractLanguage::French));
        }
        if self.abstract_english.is_match(line) {
            return Some(Boundary::Abstract(AbstractLanguage::English));
        }
        if self.abstract_arabic.is_match(line) {
            return Some(Boundary::Abstract(AbstractLanguage::Arabic));
        }
        if self.list_of_figures.is_match(line) {
            return Some(Boundary::ListOfFigures);
        }
        if self.list_of_tables.is_match(line) {
            return Some(Boundary::ListOfTables);
        }
        if self.body_start.is_match(line) {
            return Some(Boundary::BodyStart);
        }
        if self.bibliography.is_match(line) {
            return Some(Boundary::Bibliography);
        }

        None
    }

    /// Tries the metadata-field matchers in a fixed order and returns
    /// the first capture. Scalar fields are last-write-wins at the
    /// accumulator level, not here.
    pub fn match_metadata(&self, line: &str) -> Option<(MetaField, String)> {
        let table: [(&Regex, MetaField); 7] = [
            (&self.author, MetaField::Author),
            (&self.specialty, MetaField::Specialty),
            (&self.defense_date, MetaField::DefenseDate),
            (&self.university, MetaField::University),
            (&self.faculty, MetaField::Faculty),
            (&self.department, MetaField::Department),
            (&self.academic_year, MetaField::AcademicYear),
        ];

        for (regex, field) in table {
            if let Some(captures) = regex.captures(line) {
                let value = captures
                    .name("value")
                    .map(|value| value.as_str().trim().to_string())
                    .unwrap_or_default();
                if !value.is_empty() {
                    return Some((field, value));
                }
            }
        }

        None
    }

    /// Captures role, name and trailing affiliation from a jury line.
    /// Academic-title tokens (Pr, Dr, MCA, ...) are stripped from the
    /// head of the affiliation clause, never from the name.
    pub fn match_jury(&self, line: &str) -> Option<JuryCapture> {
        let captures = self.jury_line.captures(line)?;

        let role = captures.name("role")?.as_str().trim().to_string();
        let name = captures.name("name")?.as_str().trim().to_string();
        if name.is_empty() {
            return None;
        }

        let affiliation = captures
            .name("affiliation")
            .and_then(|value| self.clean_affiliation(value.as_str()));

        Some(JuryCapture {
            role,
            name,
            affiliation,
        })
    }

    fn clean_affiliation(&self, raw: &str) -> Option<String> {
        let kept = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .filter(|part| !self.academic_title.is_match(part))
            .map(|part| self.strip_leading_title(part))
            .collect::<Vec<String>>();

        if kept.is_empty() {
            None
        } else {
            Some(kept.join(", "))
        }
    }

    fn strip_leading_title(&self, part: &str) -> String {
        let mut words = part.splitn(2, char::is_whitespace);
        let head = words.next().unwrap_or_default();
        if let Some(tail) = words.next() {
            if self.academic_title.is_match(head) {
                return tail.trim().to_string();
            }
        }
        part.to_string()
    }

    pub fn is_figure_item(&self, line: &str) -> bool {
        self.figure_item.is_match(line)
    }

    pub fn is_table_item(&self, line: &str) -> bool {
        self.table_item.is_match(line)
    }

    pub fn is_chapter_heading(&self, line: &str) -> bool {
        self.chapter_roman.is_match(line)
            || self.chapter_keyword.is_match(line)
            || self.chapter_capitalized.is_match(line)
    }

    /// Returns the numbering depth for a multi-level numeric heading,
    /// e.g. `Some(2)` for "1.1 Background".
    pub fn numeric_section_level(&self, line: &str) -> Option<usize> {
        let captures = self.section_numeric.captures(line)?;
        let number = captures.name("number")?.as_str();
        Some(number.split('.').count())
    }

    pub fn is_lettered_section(&self, line: &str) -> bool {
        self.section_lettered.is_match(line)
    }

    pub fn is_bullet_section(&self, line: &str) -> bool {
        self.section_bullet.is_match(line)
    }
}
