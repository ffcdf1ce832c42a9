//! Error types
//!
//! Not-found and ambiguous matches are ordinary return values (`None`,
//! [`crate::field::PickOutcome`]); only the cases below are errors.

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, FormError>;

/// Tokenizer / tree-builder failure (strict mode only)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {position}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    /// Caller handed over something that is not a single element node
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Strict lookup of an identifier that the document does not contain
    #[error("id {id} was not found in {document:?}")]
    IdNotFound { id: String, document: String },

    /// Strict lookup of a tag that the document does not contain
    #[error("<{tag} ...> was not found in {document:?}")]
    TagNotFound { tag: String, document: String },

    #[error("malformed document: {0}")]
    Parse(#[from] ParseError),

    #[error("attribute error: {0}")]
    Attribute(String),
}

impl FormError {
    pub(crate) fn invalid_node(what: &str, id: u32) -> Self {
        FormError::InvalidInput(format!("expected an element node for {what}, got node {id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_not_found_names_id_and_document() {
        let err = FormError::IdNotFound {
            id: "armor_class_".to_string(),
            document: "sheet.svg".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("armor_class_"));
        assert!(msg.contains("sheet.svg"));
    }

    #[test]
    fn test_parse_error_converts() {
        let err: FormError = ParseError::new("Unclosed tag: <svg>", 12).into();
        assert!(matches!(err, FormError::Parse(ref p) if p.position == 12));
        assert_eq!(err.to_string(), "malformed document: Unclosed tag: <svg> at byte 12");
    }
}
