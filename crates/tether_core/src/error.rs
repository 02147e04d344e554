//! Error types shared across the binding layer
//!
//! None of these ever escape an adapter operation. They are produced at the
//! boundary, logged, recorded, and replaced by a documented fallback.

use thiserror::Error;

/// Failures reported by a widget runtime
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The runtime module has not finished loading
    #[error("widget runtime module `{0}` is not loaded")]
    NotLoaded(&'static str),

    /// The widget could not be mounted on its element
    #[error("mount failed: {0}")]
    MountFailed(String),

    /// The runtime refused a value
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The handle no longer refers to live widget state
    #[error("widget state for handle has been released")]
    UnknownHandle,

    /// The runtime does not implement the requested operation
    #[error("operation `{0}` is not supported by this widget")]
    Unsupported(&'static str),
}

/// Result type for widget runtime calls
pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;

/// Recoverable marshalling failures absorbed by value codecs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarshalError {
    /// Attribute text is not valid JSON
    #[error("malformed JSON in `{attribute}`: {reason}")]
    MalformedJson {
        attribute: &'static str,
        reason: String,
    },

    /// A list-valued widget received something other than an array
    #[error("expected an array, got {0}")]
    NotAnArray(&'static str),

    /// Color text is not `#` followed by six hex digits
    #[error("invalid color `{0}`, expected '#RRGGBB'")]
    InvalidColor(String),

    /// Numeric widget received text with no leading number
    #[error("`{0}` is not a number")]
    NotANumber(String),

    /// Value has a JSON type the widget cannot represent
    #[error("unexpected {found} value, expected {expected}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors from parsing a discovery selector
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,

    /// Only compound class selectors (`.a.b`) are supported
    #[error("unsupported selector `{0}`")]
    Unsupported(String),
}
