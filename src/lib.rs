pub mod config;
pub mod editor;
pub mod encoding;
pub mod error;
pub mod parser;
pub mod registry;
pub mod segment;
pub mod style;
pub mod template;
pub mod validator;

// Re-export main types and functions
pub use editor::{CharacterCounter, Insertion, TemplateDraft, insert_variable};
pub use encoding::{EncodingMode, Repertoire, classify, classify_with};
pub use error::{Result, TemplateError};
pub use parser::{ParsedBody, Token, parse_tokens};
pub use registry::{KeySet, Variable, VariableRegistry, default_registry};
pub use segment::{Measurement, SegmentReport, measure, segment};
pub use template::{FieldSource, PreviewItem, RecipientRecord, Template, preview, render};
pub use validator::{Severity, ValidationIssue, Validator, has_errors, validate, validate_many};
