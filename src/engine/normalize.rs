use scraper::{ElementRef, Html};

const CELL_SEPARATOR: &str = " | ";

/// Flattens raw input into an ordered sequence of trimmed, non-empty
/// text lines. Markup structure is translated into textual markers
/// (bullets, ordinal prefixes, row separators) so downstream stages
/// never see markup. Plain text falls back to native line splitting.
/// Pure transform; empty input yields an empty sequence.
pub fn normalize(input: &str) -> Vec<String> {
    if input.trim().is_empty() {
        return Vec::new();
    }

    if looks_like_markup(input) {
        let lines = flatten_markup(input);
        if !lines.is_empty() {
            return lines;
        }
    }

    plain_text_lines(input)
}

fn plain_text_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn looks_like_markup(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.iter().enumerate().any(|(index, byte)| {
        *byte == b'<'
            && bytes
                .get(index + 1)
                .map(|next| next.is_ascii_alphabetic() || *next == b'/' || *next == b'!')
                .unwrap_or(false)
    })
}

fn flatten_markup(input: &str) -> Vec<String> {
    let document = Html::parse_document(input);
    let mut buffer = String::new();
    flatten_children(document.root_element(), &mut buffer);

    buffer
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn flatten_children(element: ElementRef, buffer: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            buffer.push_str(text);
            continue;
        }

        if let Some(child_element) = ElementRef::wrap(child) {
            flatten_element(child_element, buffer);
        }
    }
}

fn flatten_element(element: ElementRef, buffer: &mut String) {
    match element.value().name() {
        "script" | "style" | "meta" | "link" | "head" | "noscript" | "template" => {}
        "br" => buffer.push('\n'),
        "ul" => flatten_list(element, buffer, false),
        "ol" => flatten_list(element, buffer, true),
        "table" => flatten_table(element, buffer),
        "p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "section" | "article"
        | "header" | "footer" | "blockquote" | "pre" | "main" | "aside" => {
            buffer.push('\n');
            flatten_children(element, buffer);
            buffer.push('\n');
        }
        _ => flatten_children(element, buffer),
    }
}

fn flatten_list(element: ElementRef, buffer: &mut String, ordered: bool) {
    let mut index = 0usize;
    for child in element.children() {
        let Some(item) = ElementRef::wrap(child) else {
            continue;
        };
        if item.value().name() != "li" {
            continue;
        }

        index += 1;
        let text = inline_text(item);
        if text.is_empty() {
            continue;
        }

        buffer.push('\n');
        if ordered {
            buffer.push_str(&format!("{index}. {text}"));
        } else {
            buffer.push_str(&format!("• {text}"));
        }
        buffer.push('\n');
    }
}

fn flatten_table(element: ElementRef, buffer: &mut String) {
    for row in direct_rows(element) {
        let cells = direct_cells(row)
            .into_iter()
            .map(inline_text)
            .filter(|cell| !cell.is_empty())
            .collect::<Vec<String>>();

        if cells.is_empty() {
            continue;
        }

        buffer.push('\n');
        buffer.push_str(&cells.join(CELL_SEPARATOR));
        buffer.push('\n');
    }
}

/// Direct `<tr>` children, including those nested one level under
/// thead/tbody/tfoot. Rows of nested tables are not pulled up.
fn direct_rows(table: ElementRef) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();

    for child in table.children() {
        let Some(child_element) = ElementRef::wrap(child) else {
            continue;
        };

        match child_element.value().name() {
            "tr" => rows.push(child_element),
            "thead" | "tbody" | "tfoot" => {
                for inner in child_element.children() {
                    if let Some(inner_element) = ElementRef::wrap(inner) {
                        if inner_element.value().name() == "tr" {
                            rows.push(inner_element);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    rows
}

fn direct_cells(row: ElementRef) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .collect()
}

/// Whitespace-normalized text of all descendants, excluding
/// script/style content.
fn inline_text(element: ElementRef) -> String {
    let mut buffer = String::new();
    gather_inline(element, &mut buffer);
    buffer.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn gather_inline(element: ElementRef, buffer: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            buffer.push_str(text);
            buffer.push(' ');
            continue;
        }

        if let Some(child_element) = ElementRef::wrap(child) {
            if matches!(
                child_element.value().name(),
                "script" | "style" | "noscript" | "template"
            ) {
                continue;
            }
            gather_inline(child_element, buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_sequence() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \n\t  ").is_empty());
    }

    #[test]
    fn plain_text_is_split_trimmed_and_filtered() {
        let lines = normalize("  Première ligne  \n\n   \nDeuxième ligne\n");
        assert_eq!(lines, vec!["Première ligne", "Deuxième ligne"]);
    }

    #[test]
    fn paragraphs_and_breaks_become_line_boundaries() {
        let lines = normalize("<html><body><p>Un paragraphe</p><p>Ligne un<br>Ligne deux</p></body></html>");
        assert_eq!(lines, vec!["Un paragraphe", "Ligne un", "Ligne deux"]);
    }

    #[test]
    fn unordered_items_get_bullets_and_ordered_items_get_indices() {
        let lines = normalize(
            "<ul><li>alpha</li><li>beta</li></ul><ol><li>premier</li><li>second</li></ol>",
        );
        assert_eq!(lines, vec!["• alpha", "• beta", "1. premier", "2. second"]);
    }

    #[test]
    fn tables_flatten_row_by_row_with_cell_separators() {
        let lines = normalize(
            "<table><thead><tr><th>Nom</th><th>Rôle</th></tr></thead>\
             <tbody><tr><td>A. Smith</td><td>Rapporteur</td></tr></tbody></table>",
        );
        assert_eq!(lines, vec!["Nom | Rôle", "A. Smith | Rapporteur"]);
    }

    #[test]
    fn script_style_and_head_content_is_excluded() {
        let lines = normalize(
            "<html><head><title>ignored</title><style>p{color:red}</style></head>\
             <body><script>var x = 1;</script><p>Contenu visible</p></body></html>",
        );
        assert_eq!(lines, vec!["Contenu visible"]);
    }

    #[test]
    fn stray_angle_brackets_do_not_trigger_the_markup_path() {
        let lines = normalize("si a < b alors b > a\nseconde ligne");
        assert_eq!(lines, vec!["si a < b alors b > a", "seconde ligne"]);
    }
}
