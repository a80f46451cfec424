use crate::error::{Result, TemplateError};
use crate::parser::{Token, parse_tokens};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// Per-recipient field values looked up while rendering.
pub trait FieldSource {
    fn field(&self, key: &str) -> Option<&str>;
}

impl<K, V, S> FieldSource for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn field(&self, key: &str) -> Option<&str> {
        self.get(key).map(AsRef::as_ref)
    }
}

impl<K, V> FieldSource for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn field(&self, key: &str) -> Option<&str> {
        self.get(key).map(AsRef::as_ref)
    }
}

impl<F: FieldSource + ?Sized> FieldSource for &F {
    fn field(&self, key: &str) -> Option<&str> {
        (**self).field(key)
    }
}

/// One contact's field values, as supplied by a sample provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecipientRecord {
    fields: BTreeMap<String, String>,
}

impl RecipientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a record from a JSON object. Strings are taken as-is, numbers
    /// and booleans are stringified, `null` and nested values are skipped.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut record = Self::new();
        for (key, field) in object {
            let text = match field {
                Value::String(text) => text.clone(),
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => continue,
            };
            record.insert(key.clone(), text);
        }
        Some(record)
    }

    /// Parse a JSON array of objects.
    pub fn list_from_json(input: &str) -> Result<Vec<Self>> {
        let value: Value = serde_json::from_str(input)?;
        let items = match value {
            Value::Array(items) => items,
            other => vec![other],
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                Self::from_json(item).ok_or(TemplateError::InvalidRecipient { index })
            })
            .collect()
    }
}

impl FieldSource for RecipientRecord {
    fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RecipientRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// A parsed body that can be rendered against many records.
pub struct Template<'a> {
    body: &'a str,
    tokens: Vec<Token<'a>>,
    brace_balance_error: bool,
}

impl<'a> Template<'a> {
    #[inline]
    pub fn new(body: &'a str) -> Self {
        let parsed = parse_tokens(body);
        Self {
            body,
            tokens: parsed.tokens,
            brace_balance_error: parsed.brace_balance_error,
        }
    }

    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Substitute every placeholder in one pass over the original body.
    /// Inserted values are never scanned again, and a placeholder whose
    /// field is missing or empty is kept verbatim.
    pub fn render<F: FieldSource + ?Sized>(&self, record: &F) -> String {
        let mut output = String::with_capacity(self.body.len() + self.tokens.len() * 8);
        let mut cursor = 0;

        for token in &self.tokens {
            output.push_str(&self.body[cursor..token.position]);
            match record.field(token.key) {
                Some(value) if !value.is_empty() => output.push_str(value),
                _ => output.push_str(token.raw),
            }
            cursor = token.end();
        }
        output.push_str(&self.body[cursor..]);

        output
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token<'a>> {
        self.tokens.iter()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn has_unbalanced_braces(&self) -> bool {
        self.brace_balance_error
    }
}

pub fn render<F: FieldSource + ?Sized>(body: &str, record: &F) -> String {
    Template::new(body).render(record)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewItem {
    /// Position of the record in the sample it was drawn from.
    pub index: usize,
    pub rendered: String,
}

/// Render `body` for at most `limit` sample records.
pub fn preview<F: FieldSource>(body: &str, records: &[F], limit: usize) -> Vec<PreviewItem> {
    let template = Template::new(body);
    let items: Vec<_> = records
        .iter()
        .take(limit)
        .enumerate()
        .map(|(index, record)| PreviewItem {
            index,
            rendered: template.render(record),
        })
        .collect();

    tracing::trace!(
        available = records.len(),
        rendered = items.len(),
        "rendered template previews"
    );
    items
}
