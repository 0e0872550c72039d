//! Formatting of layer specifications.

use std::fmt::Write;

use thiserror::Error;

use crate::{LayerMapping, LayerVariant};

/// A non-fatal issue encountered while formatting a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatIssue {
    /// The mapping has no drawing layer, so the formatted text would have
    /// started with a separator. The separator was removed.
    #[error("layer specification `{formatted}` has no drawing layer")]
    MissingDrawing {
        /// The formatted text, after removing the leading separator.
        formatted: String,
    },
}

/// Formats a mapping, logging a warning if it has no drawing layer.
///
/// # Example
///
/// ```
/// # use layerspec::*;
/// let mapping = LayerMapping::new()
///     .with(LayerVariant::Drawing, StreamLayer::new(66, Some(20)))
///     .with(LayerVariant::Text, StreamLayer::new(66, Some(5)));
/// assert_eq!(format(&mapping), "66/20,66/5t");
/// ```
pub fn format(mapping: &LayerMapping) -> String {
    let (text, issue) = format_checked(mapping);
    if let Some(issue) = issue {
        tracing::warn!("{}", issue);
    }
    text
}

/// Formats a mapping, returning any issue alongside the text.
///
/// Variants are written in canonical order, drawing first.
pub fn format_checked(mapping: &LayerMapping) -> (String, Option<FormatIssue>) {
    let mut text = String::new();
    for (variant, layer) in mapping.iter() {
        if variant != LayerVariant::Drawing {
            text.push(',');
        }
        // Writing to a `String` cannot fail.
        let _ = write!(text, "{}", layer);
        if let Some(suffix) = variant.suffix() {
            text.push(suffix);
        }
    }

    match text.strip_prefix(',') {
        Some(rest) => {
            let formatted = rest.to_string();
            let issue = FormatIssue::MissingDrawing {
                formatted: formatted.clone(),
            };
            (formatted, Some(issue))
        }
        None => (text, None),
    }
}
