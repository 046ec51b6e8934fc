use crate::model::{Chapter, Section};

/// Title given to the synthetic chapter that wraps body text when no
/// chapter heading was ever recognized.
pub const FALLBACK_CHAPTER_TITLE: &str = "Contenu principal";

/// Title given to body text that precedes the first recognized
/// chapter heading (typically the prose of the introduction, whose
/// keyword line was consumed as the body-start boundary).
pub const LEADING_CONTENT_TITLE: &str = "Introduction";

#[derive(Debug)]
struct OpenSection {
    title: String,
    level: Option<usize>,
    lines: Vec<String>,
}

#[derive(Debug)]
struct OpenChapter {
    title: String,
    lines: Vec<String>,
    sections: Vec<Section>,
    open_section: Option<OpenSection>,
}

impl OpenChapter {
    fn close_section(&mut self) {
        if let Some(section) = self.open_section.take() {
            self.sections.push(Section {
                title: section.title,
                content: finalize_content(&section.lines),
                level: section.level,
            });
        }
    }

    fn finish(mut self) -> Chapter {
        self.close_section();
        Chapter {
            title: self.title,
            content: finalize_content(&self.lines),
            sections: self.sections,
        }
    }
}

/// Accumulates body lines between boundary events into the chapter /
/// section tree. Content arriving before any chapter heading is kept
/// in a leading buffer so nothing is dropped at either end of the
/// body.
#[derive(Debug, Default)]
pub struct BodyBuilder {
    chapters: Vec<Chapter>,
    open_chapter: Option<OpenChapter>,
    leading_lines: Vec<String>,
}

impl BodyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_open_chapter(&self) -> bool {
        self.open_chapter.is_some()
    }

    pub fn open_chapter(&mut self, title: &str) {
        if let Some(chapter) = self.open_chapter.take() {
            self.chapters.push(chapter.finish());
        }

        self.open_chapter = Some(OpenChapter {
            title: title.trim().to_string(),
            lines: Vec::new(),
            sections: Vec::new(),
            open_section: None,
        });
    }

    /// Ignored unless a chapter is open; the segmenter only routes
    /// section boundaries while one is.
    pub fn open_section(&mut self, title: &str, level: Option<usize>) {
        if let Some(chapter) = self.open_chapter.as_mut() {
            chapter.close_section();
            chapter.open_section = Some(OpenSection {
                title: title.trim().to_string(),
                level,
                lines: Vec::new(),
            });
        }
    }

    /// Buffers a content line into the innermost open node.
    pub fn push_line(&mut self, line: &str) {
        match self.open_chapter.as_mut() {
            Some(chapter) => match chapter.open_section.as_mut() {
                Some(section) => section.lines.push(line.to_string()),
                None => chapter.lines.push(line.to_string()),
            },
            None => self.leading_lines.push(line.to_string()),
        }
    }

    /// Flushes every open node. Guarantees the tail of the input is
    /// never dropped, and that body text without any recognized
    /// heading still yields one synthetic chapter.
    pub fn finish(mut self) -> Vec<Chapter> {
        if let Some(chapter) = self.open_chapter.take() {
            self.chapters.push(chapter.finish());
        }

        let leading = finalize_content(&self.leading_lines);
        if !leading.is_empty() {
            let title = if self.chapters.is_empty() {
                FALLBACK_CHAPTER_TITLE
            } else {
                LEADING_CONTENT_TITLE
            };
            self.chapters.insert(
                0,
                Chapter {
                    title: title.to_string(),
                    content: leading,
                    sections: Vec::new(),
                },
            );
        }

        self.chapters
    }
}

fn finalize_content(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_and_section_boundaries_partition_content() {
        let mut builder = BodyBuilder::new();
        builder.open_chapter("I. Introduction");
        builder.push_line("Some opening text.");
        builder.open_section("1.1 Background", Some(2));
        builder.push_line("Context text.");
        builder.open_chapter("II. Methodology");
        builder.push_line("Approach text.");

        let chapters = builder.finish();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "I. Introduction");
        assert_eq!(chapters[0].content, "Some opening text.");
        assert_eq!(chapters[0].sections.len(), 1);
        assert_eq!(chapters[0].sections[0].title, "1.1 Background");
        assert_eq!(chapters[0].sections[0].content, "Context text.");
        assert_eq!(chapters[0].sections[0].level, Some(2));
        assert_eq!(chapters[1].title, "II. Methodology");
        assert_eq!(chapters[1].content, "Approach text.");
        assert!(chapters[1].sections.is_empty());
    }

    #[test]
    fn body_without_headings_collapses_into_the_fallback_chapter() {
        let mut builder = BodyBuilder::new();
        builder.push_line("Première phrase.");
        builder.push_line("Deuxième phrase.");

        let chapters = builder.finish();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, FALLBACK_CHAPTER_TITLE);
        assert_eq!(chapters[0].content, "Première phrase.\nDeuxième phrase.");
    }

    #[test]
    fn text_before_the_first_heading_becomes_a_leading_chapter() {
        let mut builder = BodyBuilder::new();
        builder.push_line("Texte introductif.");
        builder.open_chapter("I. État de l'art");
        builder.push_line("Contenu du chapitre.");

        let chapters = builder.finish();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, LEADING_CONTENT_TITLE);
        assert_eq!(chapters[0].content, "Texte introductif.");
        assert_eq!(chapters[1].title, "I. État de l'art");
    }

    #[test]
    fn tail_section_is_closed_at_end_of_input() {
        let mut builder = BodyBuilder::new();
        builder.open_chapter("Chapitre 1");
        builder.open_section("1.1 Ouverture", Some(2));
        builder.push_line("Dernière ligne.");

        let chapters = builder.finish();
        assert_eq!(chapters[0].sections.len(), 1);
        assert_eq!(chapters[0].sections[0].content, "Dernière ligne.");
    }
}
