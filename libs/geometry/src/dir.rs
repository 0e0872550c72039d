//! The two axes along which node geometry is parametrized.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// An axis-aligned direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq)]
pub enum Dir {
    /// Along x; extents in this direction are widths.
    Horiz,
    /// Along y; extents in this direction are heights.
    Vert,
}

impl Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Horiz => write!(f, "horizontal"),
            Self::Vert => write!(f, "vertical"),
        }
    }
}
