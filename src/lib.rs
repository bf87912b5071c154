//! Page-side helpers for administrative web forms.
//!
//! The utilities never reach for ambient globals: each one receives the host
//! capabilities it needs (see [`capabilities`]). [`Page`] is a deterministic
//! in-memory host implementing all of them, which makes every helper usable
//! from plain Rust tests.

use std::error::Error as StdError;
use std::fmt;

pub mod capabilities;
pub mod checkbox;
mod dom;
pub mod dropdown;
pub mod highlight;
mod html;
pub mod membership;
pub mod navigation;
pub mod number_format;
mod page;
mod pattern;
pub mod required_fields;
mod runtime_state;
pub mod settings;
pub mod validation;

pub use capabilities::{
    Dialogs, DomQuery, FetchFailure, FetchResponse, HttpClient, Navigator, RequestId, Viewport,
};
pub use dom::NodeId;
pub use dropdown::{DropdownBinding, DropdownLoader, LoadOutcome};
pub use membership::{Equality, Haystack, Value, contains};
pub use number_format::{
    NumberFormat, format_number, number_format, number_format_str, parse_locale_float,
};
pub use page::{Navigation, Page};
pub use required_fields::{RequiredFields, add_field, remove_field};
pub use settings::Settings;
pub use validation::{FormControl, InputKind};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    ElementNotFound(String),
    ContainerNotFound(String),
    NotANumber(String),
    UnsupportedSelector(String),
    Pattern(String),
    Config(String),
    Runtime(String),
    TypeMismatch {
        target: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::ElementNotFound(id) => write!(f, "element not found: {id}"),
            Self::ContainerNotFound(id) => write!(f, "container not found: {id}"),
            Self::NotANumber(text) => write!(f, "not a number: {text:?}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::Pattern(msg) => write!(f, "pattern error: {msg}"),
            Self::Config(msg) => write!(f, "invalid settings: {msg}"),
            Self::Runtime(msg) => write!(f, "runtime error: {msg}"),
            Self::TypeMismatch {
                target,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {target}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

impl From<pattern::PatternError> for Error {
    fn from(value: pattern::PatternError) -> Self {
        Self::Pattern(value.to_string())
    }
}

#[cfg(test)]
mod tests;
