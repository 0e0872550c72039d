//! Stream-format layer specifications.
//!
//! A single mask layer may be written to a stream file under several
//! layer/datatype pairs, one per [`LayerVariant`]: the drawing layer, a pin
//! layer, a text layer, a high-voltage layer and a dummy-fill layer. The
//! textual form of a [`LayerMapping`] lists one entry per variant:
//!
//! ```text
//! Entry (',' Entry)*
//! Entry  = Number ['/' Number] [Suffix]
//! Suffix = 'p' | 't' | 'h' | 'd'
//! ```
//!
//! An entry without a suffix describes the drawing layer. The characters
//! `.`, `[` and `]` separate entries exactly like `,`.
//!
//! # Examples
//!
//! ```
//! # use layerspec::*;
//! let mapping = parse("3/1,7p").unwrap();
//! assert_eq!(mapping.get(LayerVariant::Drawing), Some(StreamLayer::new(3, Some(1))));
//! assert_eq!(mapping.get(LayerVariant::Pin), Some(StreamLayer::new(7, None)));
//! assert_eq!(format(&mapping), "3/1,7p");
//! ```
#![warn(missing_docs)]

mod format;
mod parse;

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use format::{format, format_checked, FormatIssue};
pub use parse::{parse, parse_checked};

/// The role a stream layer plays for a mask layer.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayerVariant {
    /// The drawing layer. Has no suffix.
    Drawing,
    /// The pin layer, suffix `p`.
    Pin,
    /// The text layer, suffix `t`.
    Text,
    /// The high-voltage layer, suffix `h`.
    HighVoltage,
    /// The dummy-fill layer, suffix `d`.
    Dummy,
}

impl LayerVariant {
    /// All variants, in canonical order.
    pub const ALL: [LayerVariant; 5] = [
        Self::Drawing,
        Self::Pin,
        Self::Text,
        Self::HighVoltage,
        Self::Dummy,
    ];

    /// The suffix character marking this variant, if any.
    pub const fn suffix(&self) -> Option<char> {
        match *self {
            Self::Drawing => None,
            Self::Pin => Some('p'),
            Self::Text => Some('t'),
            Self::HighVoltage => Some('h'),
            Self::Dummy => Some('d'),
        }
    }

    /// The suffix marking this variant as a string, empty for [`LayerVariant::Drawing`].
    pub const fn suffix_str(&self) -> &'static str {
        match *self {
            Self::Drawing => "",
            Self::Pin => "p",
            Self::Text => "t",
            Self::HighVoltage => "h",
            Self::Dummy => "d",
        }
    }

    /// The variant marked by the given trailing character.
    ///
    /// Any character that is not a variant suffix selects [`LayerVariant::Drawing`].
    pub const fn from_suffix(c: char) -> Self {
        match c {
            'p' => Self::Pin,
            't' => Self::Text,
            'h' => Self::HighVoltage,
            'd' => Self::Dummy,
            _ => Self::Drawing,
        }
    }

    const fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for LayerVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Drawing => write!(f, "drawing"),
            Self::Pin => write!(f, "pin"),
            Self::Text => write!(f, "text"),
            Self::HighVoltage => write!(f, "high-voltage"),
            Self::Dummy => write!(f, "dummy"),
        }
    }
}

/// A stream layer number with an optional datatype.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreamLayer {
    number: i32,
    datatype: Option<i32>,
}

impl StreamLayer {
    /// Creates a new stream layer.
    pub const fn new(number: i32, datatype: Option<i32>) -> Self {
        Self { number, datatype }
    }

    /// The layer number.
    #[inline]
    pub const fn number(&self) -> i32 {
        self.number
    }

    /// The datatype, if one was given.
    #[inline]
    pub const fn datatype(&self) -> Option<i32> {
        self.datatype
    }

    /// The largest layer number representable in the [packed](StreamLayer::packed) form.
    pub const MAX_PACKED_NUMBER: i32 = 0xFFFF;

    /// Packs the layer as `number | (datatype << 16)`.
    ///
    /// Stream layer numbers occupy the low 16 bits. An absent datatype packs
    /// as `-1`, so it stays distinguishable from datatype `0`.
    ///
    /// Returns `None` if the layer number is negative or does not fit in
    /// 16 bits, since such a layer could not be recovered by
    /// [`StreamLayer::from_packed`].
    ///
    /// # Example
    ///
    /// ```
    /// # use layerspec::StreamLayer;
    /// assert_eq!(StreamLayer::new(3, Some(1)).packed(), Some(3 | (1 << 16)));
    /// assert_ne!(StreamLayer::new(3, None).packed(), StreamLayer::new(3, Some(0)).packed());
    /// assert_eq!(StreamLayer::new(70000, Some(1)).packed(), None);
    /// ```
    pub const fn packed(&self) -> Option<i64> {
        if self.number < 0 || self.number > Self::MAX_PACKED_NUMBER {
            return None;
        }
        let datatype = match self.datatype {
            Some(datatype) => datatype as i64,
            None => -1,
        };
        Some(self.number as i64 | (datatype << 16))
    }

    /// Recovers a stream layer from its [packed](StreamLayer::packed) form.
    ///
    /// Every value returned by [`StreamLayer::packed`] unpacks to the layer
    /// it was packed from.
    pub const fn from_packed(packed: i64) -> Self {
        let datatype = packed >> 16;
        Self {
            number: (packed & 0xFFFF) as i32,
            datatype: if datatype == -1 {
                None
            } else {
                Some(datatype as i32)
            },
        }
    }
}

impl Display for StreamLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number)?;
        if let Some(datatype) = self.datatype {
            write!(f, "/{}", datatype)?;
        }
        Ok(())
    }
}

/// The stream layers of a single mask layer, at most one per [`LayerVariant`].
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerMapping {
    entries: [Option<StreamLayer>; 5],
}

impl LayerMapping {
    /// A specification that was parsed but names no layers.
    ///
    /// Distinct from a failed parse, which yields no mapping at all.
    pub const EMPTY: LayerMapping = LayerMapping { entries: [None; 5] };

    /// Creates a new, empty mapping.
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns a copy of this mapping with `variant` set to `layer`.
    pub fn with(mut self, variant: LayerVariant, layer: StreamLayer) -> Self {
        self.entries[variant.index()] = Some(layer);
        self
    }

    /// Assigns `layer` to an unassigned `variant`.
    pub(crate) fn set(&mut self, variant: LayerVariant, layer: StreamLayer) {
        debug_assert!(!self.contains(variant));
        self.entries[variant.index()] = Some(layer);
    }

    /// Assigns `layer` to `variant`, failing if the variant is already assigned.
    pub fn try_insert(
        &mut self,
        variant: LayerVariant,
        layer: StreamLayer,
    ) -> Result<(), StreamLayer> {
        let slot = &mut self.entries[variant.index()];
        match slot {
            Some(existing) => Err(*existing),
            None => {
                *slot = Some(layer);
                Ok(())
            }
        }
    }

    /// Returns `true` if a layer is assigned to `variant`.
    pub const fn contains(&self, variant: LayerVariant) -> bool {
        self.entries[variant.index()].is_some()
    }

    /// The layer assigned to `variant`, if any.
    pub const fn get(&self, variant: LayerVariant) -> Option<StreamLayer> {
        self.entries[variant.index()]
    }

    /// The drawing layer, if any.
    pub const fn drawing(&self) -> Option<StreamLayer> {
        self.get(LayerVariant::Drawing)
    }

    /// The pin layer, if any.
    pub const fn pin(&self) -> Option<StreamLayer> {
        self.get(LayerVariant::Pin)
    }

    /// The text layer, if any.
    pub const fn text(&self) -> Option<StreamLayer> {
        self.get(LayerVariant::Text)
    }

    /// The number of assigned variants.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    /// Returns `true` if no variant is assigned.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    /// Iterates over the assigned `(variant, layer)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerVariant, StreamLayer)> + '_ {
        LayerVariant::ALL
            .into_iter()
            .filter_map(|variant| self.get(variant).map(|layer| (variant, layer)))
    }
}

impl FromStr for LayerMapping {
    type Err = LayerSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_checked(s)
    }
}

impl Display for LayerMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (text, _) = format_checked(self);
        write!(f, "{}", text)
    }
}

/// An error parsing a layer specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerSpecError {
    /// The specification was empty.
    #[error("empty layer specification")]
    Empty,
    /// A variant was given more than one layer.
    #[error("layer specification `{spec}` assigns the {variant} layer (suffix `{suffix}`) more than once")]
    Duplicate {
        /// The full specification.
        spec: String,
        /// The variant that was assigned twice.
        variant: LayerVariant,
        /// The suffix marking the variant, or `none` for the drawing layer.
        suffix: &'static str,
    },
    /// A field was not an integer.
    #[error("layer specification `{spec}` has non-integer field `{field}`")]
    InvalidNumber {
        /// The full specification.
        spec: String,
        /// The offending field.
        field: String,
    },
    /// An entry had more than a layer number and a datatype.
    #[error("entry `{entry}` of layer specification `{spec}` has more than two fields")]
    TooManyFields {
        /// The full specification.
        spec: String,
        /// The offending entry.
        entry: String,
    },
}
