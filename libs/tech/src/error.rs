//! Error types and error handling utilities.

use std::sync::Arc;

use arcstr::ArcStr;

/// A result type returning technology errors.
pub type Result<T, E = TechError> = std::result::Result<T, E>;

/// An error constructing a technology.
///
/// Cheaply clonable, so that a failed definition load can be memoized
/// alongside successful ones.
#[derive(thiserror::Error, Debug, Clone)]
pub enum TechError {
    /// The implementation backing a technology is not part of this build.
    #[error("implementation `{implementation}` of technology `{technology}` is not available")]
    MissingImplementation {
        /// The technology being constructed.
        technology: ArcStr,
        /// The name of the missing implementation.
        implementation: ArcStr,
    },
    /// A technology definition could not be read or parsed.
    #[error("failed to load technology definition from `{url}`: {reason}")]
    DefinitionLoad {
        /// Where the definition was loaded from.
        url: ArcStr,
        /// Why loading failed.
        reason: ArcStr,
    },
    /// A definition declares a different name than the one it is registered under.
    #[error("technology definition declares name `{found}` but is registered as `{expected}`")]
    NameMismatch {
        /// The registered name.
        expected: ArcStr,
        /// The name declared by the definition.
        found: ArcStr,
    },
    /// A definition is structurally invalid.
    #[error("invalid definition of technology `{technology}`: {reason}")]
    InvalidDefinition {
        /// The technology being constructed.
        technology: ArcStr,
        /// What is wrong with the definition.
        reason: ArcStr,
    },
    /// A parameter value is outside the range its implementation accepts.
    #[error("invalid value for parameter `{path}`: {reason}")]
    InvalidParameter {
        /// The parameter path.
        path: ArcStr,
        /// Why the value was rejected.
        reason: ArcStr,
    },
    /// The post-construction setup of a technology failed.
    #[error("setup of technology `{technology}` failed: {reason}")]
    Setup {
        /// The technology being set up.
        technology: ArcStr,
        /// Why setup failed.
        reason: ArcStr,
    },
    /// An I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] Arc<std::io::Error>),
}

impl From<std::io::Error> for TechError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}

/// Why the definition of a technology could not be embedded in a persisted reference.
#[derive(thiserror::Error, Debug)]
pub enum EmbedError {
    /// The technology is not built from a definition document.
    #[error("technology has no definition")]
    NoDefinition,
    /// The definition could not be loaded.
    #[error(transparent)]
    Load(#[from] TechError),
    /// The definition could not be encoded.
    #[error("failed to encode definition: {0}")]
    Encode(#[from] flexbuffers::SerializationError),
}

/// An error reading a persisted technology reference.
#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    /// The underlying reader failed, or the record was truncated.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A string field was not valid UTF-8.
    #[error("string field is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// The embedded definition of a user-defined technology could not be decoded.
    #[error("failed to decode embedded definition of technology `{name}`: {reason}")]
    Definition {
        /// The technology name in the record.
        name: ArcStr,
        /// Why decoding failed.
        reason: ArcStr,
    },
    /// A built-in technology reference names a technology absent from the registry.
    #[error("unknown technology `{0}`")]
    UnknownTechnology(ArcStr),
}
