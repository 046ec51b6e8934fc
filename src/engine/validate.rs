use crate::model::Document;

/// Inspects the finished model for missing required fields. Every
/// finding is a warning; the caller decides whether strict mode
/// escalates them to a failure.
pub fn validate(document: &Document) -> Vec<String> {
    let mut warnings = Vec::<String>::new();

    if document.title.is_empty() {
        warnings.push("document title was not found".to_string());
    }
    if document.author.is_empty() {
        warnings.push("author was not found".to_string());
    }
    if document.university.is_empty() {
        warnings.push("university was not found".to_string());
    }
    if document.chapters.is_empty() {
        warnings.push("no chapters were recognized".to_string());
    }
    if document.jury.is_empty() {
        warnings.push("no jury members were recognized".to_string());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Chapter, JuryMember};

    #[test]
    fn complete_document_yields_no_warnings() {
        let document = Document {
            title: "Titre".to_string(),
            author: "Jane Doe".to_string(),
            university: "de Lorraine".to_string(),
            chapters: vec![Chapter {
                title: "I. Introduction".to_string(),
                content: "Texte.".to_string(),
                sections: Vec::new(),
            }],
            jury: vec![JuryMember {
                role: "Rapporteur".to_string(),
                name: "B. Martin".to_string(),
                affiliation: "Université de Tours".to_string(),
            }],
            ..Document::default()
        };

        assert!(validate(&document).is_empty());
    }

    #[test]
    fn each_missing_field_yields_its_own_warning() {
        let warnings = validate(&Document::default());
        assert_eq!(warnings.len(), 5);
        assert!(warnings.iter().any(|warning| warning.contains("title")));
        assert!(warnings.iter().any(|warning| warning.contains("jury")));
    }
}
