//! The DOM capability the engine queries through.
//!
//! The engine never talks to a browser directly. Anything that can run a
//! selector query, read an element's attributes and geometry, and snapshot the
//! page can drive it: [`crate::EokaDom`] does this over a live `eoka::Page`, the
//! test suites do it over an in-memory fixture.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Failure reported by a [`DomCapability`] call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomError {
    /// The selector was rejected by the query engine.
    #[error("invalid selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },

    /// The element behind a handle is gone.
    #[error("stale element: {0}")]
    Stale(String),

    /// Transport or evaluation failure in the underlying browser.
    #[error("browser error: {0}")]
    Browser(String),
}

impl From<eoka::Error> for DomError {
    fn from(e: eoka::Error) -> Self {
        DomError::Browser(e.to_string())
    }
}

/// Element rectangle in viewport coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Viewport dimensions (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

/// Which landmark an input sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Header,
    Main,
    Nav,
    Other,
}

/// Summary of one `<input>`/`<textarea>` on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDescriptor {
    #[serde(rename = "type")]
    pub input_type: String,
    #[serde(default)]
    pub placeholder: String,
    pub location: Region,
}

/// Read-only snapshot of the page, for diagnostics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageContext {
    pub title: String,
    pub url: String,
    /// Comma-separated sample of distinct class-name groups.
    #[serde(default)]
    pub structure: String,
    #[serde(default)]
    pub inputs: Vec<InputDescriptor>,
    /// Button labels, at most 20.
    #[serde(default)]
    pub buttons: Vec<String>,
}

/// Query access to a single live page.
///
/// Implementations are read-only with respect to the page. Timeouts, if any,
/// belong to the implementation; the engine waits for every call to finish.
#[async_trait]
pub trait DomCapability: Send + Sync {
    /// Opaque handle to one matched element.
    type Element: Clone + Send + Sync;

    /// All elements matching `selector`, in document order.
    ///
    /// Returns an error when the selector cannot be evaluated.
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, DomError>;

    /// Attribute name/value pairs of an element, values as written in the DOM.
    async fn attributes(&self, element: &Self::Element)
        -> Result<HashMap<String, String>, DomError>;

    /// Element geometry, or `None` when the element is not rendered.
    async fn bounding_box(&self, element: &Self::Element) -> Result<Option<BoundingBox>, DomError>;

    /// Viewport geometry, or `None` when it cannot be determined.
    async fn viewport_size(&self) -> Result<Option<ViewportSize>, DomError>;

    /// Snapshot of title, URL, class structure, inputs and button labels.
    async fn page_context(&self) -> Result<PageContext, DomError>;
}
