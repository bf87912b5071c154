//! Host capabilities handed to the helpers.
//!
//! A browser binding implements these against the live document; [`crate::Page`]
//! implements them against an in-memory tree.

use std::fmt;

use crate::validation::FormControl;
use crate::{NodeId, Result};

/// Element lookup and mutation by identifier.
pub trait DomQuery {
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// The element's container, if it has one.
    fn parent_element(&self, node: NodeId) -> Option<NodeId>;

    fn add_class(&mut self, node: NodeId, class_name: &str) -> Result<()>;

    fn remove_class(&mut self, node: NodeId, class_name: &str) -> Result<()>;

    fn has_class(&self, node: NodeId, class_name: &str) -> Result<bool>;

    fn value(&self, node: NodeId) -> Result<String>;

    /// Sets the current value. For a select this selects the matching option.
    fn set_value(&mut self, node: NodeId, value: &str) -> Result<()>;

    /// `input` elements below `container`, in document order.
    fn descendant_inputs(&self, container: NodeId) -> Vec<NodeId>;

    /// Raw `type` of an input, lowercased; `"text"` when the attribute is absent.
    fn input_type(&self, node: NodeId) -> Result<String>;

    fn checked(&self, node: NodeId) -> Result<bool>;

    fn set_checked(&mut self, node: NodeId, checked: bool) -> Result<()>;

    /// Controls of a form in document order.
    fn form_controls(&self, form: NodeId) -> Result<Vec<FormControl>>;

    fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()>;

    /// Inserts markup right before `node` and returns the inserted elements.
    fn insert_html_before(&mut self, node: NodeId, html: &str) -> Result<Vec<NodeId>>;

    /// Detaches the node once a transition of `duration_ms` has played.
    fn remove_with_transition(&mut self, node: NodeId, duration_ms: u32) -> Result<()>;

    fn set_visible(&mut self, node: NodeId, visible: bool) -> Result<()>;
}

pub trait Dialogs {
    /// Shows a yes/no prompt and returns the answer.
    fn confirm(&mut self, message: &str) -> bool;
}

pub trait Navigator {
    fn navigate(&mut self, destination: &str);
}

pub trait Viewport {
    fn scroll_to(&mut self, x: i64, y: i64);
}

/// Identifies an in-flight request issued through [`HttpClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Status(u16),
    Network(String),
    /// The body arrived but could not be applied as markup.
    Malformed(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "http status {code}"),
            Self::Network(message) => write!(f, "network error: {message}"),
            Self::Malformed(message) => write!(f, "malformed response: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub request: RequestId,
    pub url: String,
    pub body: std::result::Result<String, FetchFailure>,
}

/// Asynchronous GET. Requests are issued without blocking; the host hands
/// back responses in arrival order through [`HttpClient::poll_response`].
pub trait HttpClient {
    fn begin_get(&mut self, url: &str) -> RequestId;

    fn poll_response(&mut self) -> Option<FetchResponse>;
}
