//! Selector candidates produced by discovery.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Role / ARIA / attribute templates.
    Semantic,
    /// Input characteristics plus a keyword relevance check.
    FormInput,
    /// Header-area geometry.
    Positional,
    /// Weighted attribute substring patterns.
    Heuristic,
    /// Caller-supplied selector that verified against the DOM.
    Manual,
    /// Caller-supplied selector pinned without verification.
    Learned,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Semantic => "semantic",
            Strategy::FormInput => "form-input",
            Strategy::Positional => "positional",
            Strategy::Heuristic => "heuristic",
            Strategy::Manual => "manual",
            Strategy::Learned => "learned",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single selector guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorCandidate {
    pub selector: String,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub strategy: Strategy,
    /// Number of elements the selector matched when it was produced.
    pub element_count: usize,
}

impl SelectorCandidate {
    /// Build a candidate, clamping `confidence` into `[0, 1]`.
    pub fn new(
        selector: impl Into<String>,
        confidence: f64,
        strategy: Strategy,
        element_count: usize,
    ) -> Self {
        Self {
            selector: selector.into(),
            confidence: clamp_unit(confidence),
            strategy,
            element_count,
        }
    }
}

impl fmt::Display for SelectorCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} {:<10} x{} {}",
            self.confidence, self.strategy, self.element_count, self.selector
        )
    }
}

/// Clamp into `[0, 1]`, mapping NaN to 0.
pub(crate) fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
