//! Helpers for an editing surface that owns the current body.
//!
//! Nothing here holds state: each call takes the body as it is now and
//! returns fresh values for the caller to keep.

use crate::encoding::{EncodingMode, Repertoire};
use crate::error::{Result, TemplateError};
use crate::segment::measure;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub body: String,
    /// Caret position after the insertion, in characters.
    pub caret: usize,
}

/// Replace the selected characters of `body` with `{key}`.
///
/// `selection` is measured in characters. Bounds past the end are clamped and
/// a reversed range is treated as its mirror.
pub fn insert_variable(body: &str, selection: Range<usize>, key: &str) -> Insertion {
    let total = body.chars().count();
    let start = selection.start.min(selection.end).min(total);
    let end = selection.start.max(selection.end).min(total);

    let byte_at = |chars: usize| {
        body.char_indices()
            .nth(chars)
            .map_or(body.len(), |(offset, _)| offset)
    };
    let (head, tail) = (byte_at(start), byte_at(end));

    let placeholder = format!("{{{}}}", key);
    let mut updated = String::with_capacity(body.len() + placeholder.len());
    updated.push_str(&body[..head]);
    updated.push_str(&placeholder);
    updated.push_str(&body[tail..]);

    Insertion {
        body: updated,
        caret: start + placeholder.chars().count(),
    }
}

/// The live "characters | segments" line shown under the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharacterCounter {
    pub characters: usize,
    pub limit: usize,
    pub segments: usize,
    pub mode: EncodingMode,
}

impl CharacterCounter {
    pub fn new(body: &str, repertoire: Repertoire) -> Self {
        let measurement = measure(body, repertoire);
        Self {
            characters: measurement.characters,
            limit: measurement.report.capacity_per_segment,
            segments: measurement.report.segment_count,
            mode: measurement.mode,
        }
    }

    pub fn is_over_limit(&self) -> bool {
        self.characters > self.limit
    }
}

impl fmt::Display for CharacterCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} characters | {} SMS",
            self.characters, self.limit, self.segments
        )
    }
}

/// A `{name, body}` pair ready to hand to template storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDraft {
    pub name: String,
    pub body: String,
}

impl TemplateDraft {
    /// Both fields are trimmed; blank values are rejected.
    pub fn new(name: &str, body: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TemplateError::EmptyName);
        }

        let body = body.trim();
        if body.is_empty() {
            return Err(TemplateError::EmptyBody);
        }

        Ok(Self {
            name: name.to_string(),
            body: body.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_at_caret() {
        let insertion = insert_variable("Hello !", 6..6, "prenom");
        assert_eq!(insertion.body, "Hello {prenom}!");
        assert_eq!(insertion.caret, 14);
    }

    #[test]
    fn replaces_selection() {
        let insertion = insert_variable("Hello NAME!", 6..10, "nom");
        assert_eq!(insertion.body, "Hello {nom}!");
        assert_eq!(insertion.caret, 11);
    }

    #[test]
    fn reversed_and_out_of_range_selections() {
        assert_eq!(insert_variable("Hello NAME!", 10..6, "nom").body, "Hello {nom}!");

        let insertion = insert_variable("Hi", 40..50, "prenom");
        assert_eq!(insertion.body, "Hi{prenom}");
        assert_eq!(insertion.caret, 10);
    }

    #[test]
    fn selection_counts_characters() {
        let insertion = insert_variable("Ça va ?", 6..6, "prenom");
        assert_eq!(insertion.body, "Ça va {prenom}?");
        assert_eq!(insertion.caret, 14);
    }

    #[test]
    fn counter_line() {
        let counter = CharacterCounter::new("Hello", Repertoire::Ascii);
        assert_eq!(counter.to_string(), "5 / 160 characters | 1 SMS");
        assert!(!counter.is_over_limit());

        let long = CharacterCounter::new(&"é".repeat(71), Repertoire::Ascii);
        assert_eq!(long.to_string(), "71 / 70 characters | 2 SMS");
        assert_eq!(long.mode, EncodingMode::Extended);
        assert!(long.is_over_limit());
    }

    #[test]
    fn draft_trims_and_rejects_blank_fields() {
        let draft = TemplateDraft::new("  Welcome ", "\n Hi {prenom} \n").unwrap();
        assert_eq!(draft.name, "Welcome");
        assert_eq!(draft.body, "Hi {prenom}");

        assert!(matches!(
            TemplateDraft::new("   ", "body"),
            Err(TemplateError::EmptyName)
        ));
        assert!(matches!(
            TemplateDraft::new("name", " \t "),
            Err(TemplateError::EmptyBody)
        ));
    }
}
