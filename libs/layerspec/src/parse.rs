//! Parsing of layer specifications.

use crate::{LayerMapping, LayerSpecError, LayerVariant, StreamLayer};

/// Characters separating entries of a layer specification.
const DELIMITERS: [char; 4] = [',', '.', '[', ']'];

/// Parses a layer specification, logging a diagnostic on failure.
///
/// Returns `None` if the specification is empty or malformed. A
/// specification containing an entry with no layer number yields
/// [`LayerMapping::EMPTY`].
///
/// # Examples
///
/// ```
/// # use layerspec::*;
/// assert_eq!(parse(""), None);
/// assert_eq!(parse("3p,4p"), None);
/// assert_eq!(parse("p"), Some(LayerMapping::EMPTY));
/// assert_eq!(parse("0").unwrap().drawing(), Some(StreamLayer::new(0, None)));
/// ```
pub fn parse(spec: &str) -> Option<LayerMapping> {
    match parse_checked(spec) {
        Ok(mapping) => Some(mapping),
        Err(LayerSpecError::Empty) => None,
        Err(err) => {
            tracing::warn!("{}", err);
            None
        }
    }
}

/// Parses a layer specification.
///
/// Any malformed entry rejects the whole specification; entries are never
/// merged or partially accepted.
pub fn parse_checked(spec: &str) -> Result<LayerMapping, LayerSpecError> {
    if spec.trim().is_empty() {
        return Err(LayerSpecError::Empty);
    }

    let mut mapping = LayerMapping::new();
    let entries = spec
        .split(&DELIMITERS[..])
        .map(str::trim)
        .filter(|entry| !entry.is_empty());

    for entry in entries {
        let variant = entry
            .chars()
            .next_back()
            .map(LayerVariant::from_suffix)
            .unwrap_or(LayerVariant::Drawing);

        if mapping.contains(variant) {
            return Err(LayerSpecError::Duplicate {
                spec: spec.to_string(),
                variant,
                suffix: match variant.suffix_str() {
                    "" => "none",
                    suffix => suffix,
                },
            });
        }

        let body = match variant.suffix() {
            Some(suffix) => entry.strip_suffix(suffix).unwrap_or(entry),
            None => entry,
        };

        let mut fields = body.split('/');
        let number = fields.next().map(str::trim).unwrap_or_default();
        let datatype = fields.next().map(str::trim).unwrap_or_default();
        if fields.next().is_some() {
            return Err(LayerSpecError::TooManyFields {
                spec: spec.to_string(),
                entry: entry.to_string(),
            });
        }

        let number = parse_field(spec, number)?;
        let datatype = parse_field(spec, datatype)?;

        let Some(number) = number else {
            return Ok(LayerMapping::EMPTY);
        };

        mapping.set(variant, StreamLayer::new(number, datatype));
    }

    Ok(mapping)
}

/// Parses an optional integer field; an empty field is absent.
fn parse_field(spec: &str, field: &str) -> Result<Option<i32>, LayerSpecError> {
    if field.is_empty() {
        return Ok(None);
    }
    field
        .parse::<i32>()
        .map(Some)
        .map_err(|_| LayerSpecError::InvalidNumber {
            spec: spec.to_string(),
            field: field.to_string(),
        })
}
