//! Per-engine memories: the winning selector per intent, and the selectors
//! known not to work.

use crate::{Intent, SelectorCandidate};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Cache of the current best-known selector per intent.
///
/// Holds at most one candidate per intent. Every write replaces the previous
/// entry; a replaced selector is not marked as failing.
#[derive(Debug, Default, Clone)]
pub struct SelectorMemory {
    entries: HashMap<Intent, SelectorCandidate>,
}

impl SelectorMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, intent: Intent) -> Option<&SelectorCandidate> {
        self.entries.get(&intent)
    }

    /// Store `candidate` for `intent`, returning the entry it replaced.
    pub fn remember(
        &mut self,
        intent: Intent,
        candidate: SelectorCandidate,
    ) -> Option<SelectorCandidate> {
        self.entries.insert(intent, candidate)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by intent.
    pub fn iter(&self) -> impl Iterator<Item = (Intent, &SelectorCandidate)> {
        let mut items: Vec<_> = self.entries.iter().map(|(i, c)| (*i, c)).collect();
        items.sort_by_key(|(i, _)| *i);
        items.into_iter()
    }
}

/// Why a selector was blocklisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FailureReason {
    /// The query raised an error.
    Threw(String),
    /// The query ran but matched nothing.
    NoMatch,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Threw(msg) => write!(f, "threw: {}", msg),
            FailureReason::NoMatch => f.write_str("no match"),
        }
    }
}

/// Blocklist of selectors proven non-functional.
///
/// Grow-only: there is no removal API. The first recorded reason for a
/// selector is kept.
#[derive(Debug, Default, Clone)]
pub struct FailureMemory {
    entries: HashMap<String, FailureReason>,
    order: Vec<String>,
}

impl FailureMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.entries.contains_key(selector)
    }

    /// Record a failing selector. Returns `false` if it was already known.
    pub fn record(&mut self, selector: impl Into<String>, reason: FailureReason) -> bool {
        let selector = selector.into();
        if self.entries.contains_key(&selector) {
            return false;
        }
        self.order.push(selector.clone());
        self.entries.insert(selector, reason);
        true
    }

    pub fn reason(&self, selector: &str) -> Option<&FailureReason> {
        self.entries.get(selector)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Failed selectors in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FailureReason)> {
        self.order
            .iter()
            .map(move |s| (s.as_str(), &self.entries[s]))
    }
}
