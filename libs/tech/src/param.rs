//! Technology parameters.

use std::fmt::Display;
use std::hash::{Hash, Hasher};

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A map from parameter path to value.
pub type ParamMap = IndexMap<ArcStr, ParamValue>;

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    /// A boolean flag.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Double(f64),
    /// A string.
    Str(ArcStr),
}

impl ParamValue {
    /// Returns `true` if `self` and `other` hold the same type of value.
    ///
    /// # Example
    ///
    /// ```
    /// # use tech::param::ParamValue;
    /// assert!(ParamValue::Int(1).same_type(&ParamValue::Int(6)));
    /// assert!(!ParamValue::Int(1).same_type(&ParamValue::Double(1.0)));
    /// ```
    pub fn same_type(&self, other: &ParamValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// The name of the value's type.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Str(_) => "string",
        }
    }

    /// Returns the boolean value, if this is a [`ParamValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer value, if this is a [`ParamValue::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the floating-point value, if this is a [`ParamValue::Double`].
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string value, if this is a [`ParamValue::Str`].
    pub fn as_str(&self) -> Option<&ArcStr> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value),
            Self::Double(value) => write!(f, "{}", value),
            Self::Str(value) => write!(f, "{:?}", value.as_str()),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<ArcStr> for ParamValue {
    fn from(value: ArcStr) -> Self {
        Self::Str(value)
    }
}

/// A declared technology parameter.
///
/// Parameters are identified by their path alone.
#[derive(Debug, Clone)]
pub struct Param {
    path: ArcStr,
    pref_path: ArcStr,
    default: ParamValue,
}

impl Param {
    /// Creates a new parameter.
    pub fn new(
        path: impl Into<ArcStr>,
        pref_path: impl Into<ArcStr>,
        default: impl Into<ParamValue>,
    ) -> Self {
        Self {
            path: path.into(),
            pref_path: pref_path.into(),
            default: default.into(),
        }
    }

    /// The path identifying this parameter.
    #[inline]
    pub fn path(&self) -> &ArcStr {
        &self.path
    }

    /// The path under which user preferences store this parameter.
    #[inline]
    pub fn pref_path(&self) -> &ArcStr {
        &self.pref_path
    }

    /// The default value, which also fixes the parameter's type.
    #[inline]
    pub fn default_value(&self) -> &ParamValue {
        &self.default
    }

    /// Selects the value of this parameter from `overrides`.
    ///
    /// Overrides of a different type than the default are ignored.
    pub fn select<'a>(&'a self, overrides: &'a ParamMap) -> &'a ParamValue {
        match overrides.get(&self.path) {
            Some(value) if value.same_type(&self.default) => value,
            Some(value) => {
                tracing::debug!(
                    "ignoring {} override {} for {} parameter `{}`",
                    value.type_name(),
                    value,
                    self.default.type_name(),
                    self.path
                );
                &self.default
            }
            None => &self.default,
        }
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Param {}

impl Hash for Param {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// Fills every parameter in `schema` from `overrides`, falling back to defaults.
///
/// Keys of `overrides` that are not in the schema are ignored. The result
/// has exactly one entry per schema parameter, in schema order.
pub fn fill_params(schema: &[Param], overrides: &ParamMap) -> ParamMap {
    schema
        .iter()
        .map(|param| (param.path.clone(), param.select(overrides).clone()))
        .collect()
}
