//! Structured error types for the Folio pagination engine.
//!
//! Three variants cover the real failure sources: template parsing, a node the
//! measurement collaborator cannot answer for, and a page configuration that
//! leaves no room for content. Oversized bands are not errors; they are
//! reported as [`crate::layout::LayoutWarning`]s.

use thiserror::Error;

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// JSON input failed to parse as a valid Folio template.
    #[error("Failed to parse template: {source}{}", hint_suffix(.hint))]
    ParseError {
        source: serde_json::Error,
        hint: String,
    },
    /// The measurement collaborator could not answer for a node. Pagination
    /// of the whole template fails; no partial page list is returned.
    #[error("Measurement unavailable for {node}: {reason}")]
    MeasurementUnavailable { node: String, reason: String },
    /// Header and footer together leave no usable height on the page.
    #[error(
        "No usable page height: content area is {content_height:.2}pt, header takes {header:.2}pt, footer takes {footer:.2}pt"
    )]
    NoUsableHeight {
        content_height: f64,
        header: f64,
        footer: f64,
    },
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl FolioError {
    pub(crate) fn unmeasurable(node: &crate::model::ContentNode, reason: &str) -> Self {
        FolioError::MeasurementUnavailable {
            node: node.label(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the Folio template schema. Check node kinds and field names.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::ParseError { source: e, hint }
    }
}
