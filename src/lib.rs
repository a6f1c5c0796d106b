//! # eoka-selector
//!
//! Self-healing element discovery for browser agents. Ask for an [`Intent`]
//! ("the search box", "the OTP field") instead of pinning a selector; the
//! engine proposes ranked candidates from several strategies, verifies them
//! against the live page, and remembers what worked.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eoka_selector::{EokaDom, Intent, SelectorEngine};
//!
//! # #[tokio::main]
//! # async fn main() -> eoka_selector::Result<()> {
//! let browser = eoka::Browser::launch().await?;
//! let page = browser.new_page("https://example.com").await?;
//!
//! let mut engine = SelectorEngine::with_dom(EokaDom::new(&page));
//! for candidate in engine.discover(Intent::Search).await? {
//!     println!("{}", candidate);
//! }
//! if let Some(found) = engine.find_element(Intent::Search).await? {
//!     page.fill(&found.selector, "milk").await?;
//! }
//!
//! browser.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Scores are heuristic and purely syntactic; a ranked list is a best guess,
//! not a guarantee.

mod browser;
mod candidate;
pub mod config;
pub mod dom;
mod engine;
pub mod generators;
mod intent;
pub mod memory;
mod probe;
pub mod scorer;

pub use browser::{EokaDom, EokaElement};
pub use candidate::{SelectorCandidate, Strategy};
pub use config::{EngineConfig, ProbeConfig};
pub use dom::{BoundingBox, DomCapability, DomError, PageContext, ViewportSize};
pub use engine::{Found, SelectorEngine};
pub use intent::{Intent, UnknownIntent};
pub use memory::{FailureMemory, FailureReason, SelectorMemory};
pub use probe::{
    resolve, FailureEntry, IntentReport, OverrideReport, Probe, ProbeReport, Resolution,
};

/// Result type for eoka-selector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers.
///
/// Selector-level failures never show up here; they are recorded in the
/// engine's [`FailureMemory`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no DOM capability bound to the engine")]
    Unbound,

    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("dom error: {0}")]
    Dom(#[from] DomError),
}
