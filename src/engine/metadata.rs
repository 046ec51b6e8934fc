use crate::model::Document;
use crate::util::now_utc_string;

/// Words assumed per printed page when estimating page count.
const WORDS_PER_PAGE: usize = 250;

/// Derives word and page counts from the assembled text. Runs once
/// after the model is built; side-effect-free apart from stamping the
/// generation timestamp.
pub fn apply(document: &mut Document) {
    let word_count = count_words(document);
    document.metadata.word_count = word_count;
    document.metadata.page_estimate = word_count.div_ceil(WORDS_PER_PAGE).max(1);
    document.metadata.generated_at = now_utc_string();
}

fn count_words(document: &Document) -> usize {
    let mut count = whitespace_tokens(&document.title);
    count += whitespace_tokens(&document.acknowledgments);
    count += whitespace_tokens(&document.dedications);

    for text in document.abstracts.values() {
        count += whitespace_tokens(text);
    }

    for chapter in &document.chapters {
        count += whitespace_tokens(&chapter.content);
        for section in &chapter.sections {
            count += whitespace_tokens(&section.content);
        }
    }

    for entry in &document.bibliography {
        count += whitespace_tokens(entry);
    }

    count
}

fn whitespace_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}
