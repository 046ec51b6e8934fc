use super::patterns::PatternSet;

/// Guard range for section-shaped lines. Academic numbering also
/// shows up at the start of long prose lines; a real section heading
/// stays short.
const SECTION_HEADING_MIN_LEN: usize = 4;
const SECTION_HEADING_MAX_LEN: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingKind {
    Chapter,
    Section { level: Option<usize> },
}

/// Classifies a body line against the heading shape families, chapter
/// shapes first. Section shapes are only considered while a chapter
/// is open, and never reclassify a line that already matched a
/// chapter shape.
pub fn classify(patterns: &PatternSet, line: &str, chapter_open: bool) -> Option<HeadingKind> {
    if patterns.is_chapter_heading(line) {
        return Some(HeadingKind::Chapter);
    }

    if !chapter_open {
        return None;
    }

    let length = line.chars().count();
    if !(SECTION_HEADING_MIN_LEN..=SECTION_HEADING_MAX_LEN).contains(&length) {
        return None;
    }

    if let Some(level) = patterns.numeric_section_level(line) {
        return Some(HeadingKind::Section { level: Some(level) });
    }

    if patterns.is_lettered_section(line) || patterns.is_bullet_section(line) {
        return Some(HeadingKind::Section { level: None });
    }

    None
}
