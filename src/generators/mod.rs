//! Candidate generators.
//!
//! Each generator turns an [`Intent`] into zero or more candidates by probing
//! the DOM. Generators never touch [`FailureMemory`] themselves: they skip what
//! it already holds and report new failures in [`Generation::rejected`], which
//! the engine records before running the next generator.

mod form;
mod heuristic;
mod positional;
mod semantic;

pub use form::{form_selectors, relevance_keywords};
pub use heuristic::{heuristic_patterns, AttrTarget, HeuristicPattern};
pub use positional::SCAN_SELECTOR as POSITIONAL_SCAN_SELECTOR;
pub use semantic::semantic_templates;

use crate::config::EngineConfig;
use crate::dom::{DomCapability, DomError};
use crate::memory::FailureMemory;
use crate::{Intent, SelectorCandidate, Strategy};
use std::fmt;

/// A selector that failed while generating.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub selector: String,
    pub reason: DomError,
}

/// Output of one generator run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub candidates: Vec<SelectorCandidate>,
    pub rejected: Vec<Rejection>,
}

impl Generation {
    fn reject(&mut self, selector: &str, reason: DomError) {
        self.rejected.push(Rejection {
            selector: selector.to_string(),
            reason,
        });
    }
}

/// The four discovery strategies, in merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    Semantic,
    FormInput,
    Positional,
    Heuristic,
}

impl Generator {
    /// Default discovery order. Ranking ties keep this order.
    pub const ALL: [Generator; 4] = [
        Generator::Semantic,
        Generator::FormInput,
        Generator::Positional,
        Generator::Heuristic,
    ];

    pub fn strategy(self) -> Strategy {
        match self {
            Generator::Semantic => Strategy::Semantic,
            Generator::FormInput => Strategy::FormInput,
            Generator::Positional => Strategy::Positional,
            Generator::Heuristic => Strategy::Heuristic,
        }
    }

    /// Run this generator.
    ///
    /// `Err` means the generator as a whole could not run (for example the
    /// viewport could not be read); selector-level failures are reported in
    /// the returned [`Generation`] instead.
    pub async fn generate<D: DomCapability>(
        self,
        dom: &D,
        intent: Intent,
        failures: &FailureMemory,
        config: &EngineConfig,
    ) -> Result<Generation, DomError> {
        match self {
            Generator::Semantic => Ok(semantic::generate(dom, intent, failures).await),
            Generator::FormInput => {
                Ok(form::generate(dom, intent, failures, config.form_scan_limit).await)
            }
            Generator::Positional => {
                positional::generate(dom, intent, failures, &config.positional).await
            }
            Generator::Heuristic => Ok(heuristic::generate(dom, intent, failures).await),
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.strategy(), f)
    }
}
