//! The selector engine: discovery, ranked fallback, manual override and
//! learning against one bound page.

use crate::config::EngineConfig;
use crate::dom::{DomCapability, PageContext};
use crate::generators::Generator;
use crate::memory::{FailureMemory, FailureReason, SelectorMemory};
use crate::{Error, Intent, Result, SelectorCandidate, Strategy};
use std::collections::HashSet;
use tracing::{debug, info, warn};

const MANUAL_CONFIDENCE: f64 = 0.9;
const LEARNED_CONFIDENCE: f64 = 0.95;

/// First element matched by a verified candidate.
#[derive(Debug, Clone)]
pub struct Found<E> {
    pub element: E,
    pub selector: String,
}

/// Finds elements by intent on a single page.
///
/// The engine is not synchronized: callers drive one operation at a time
/// against a given page. Both memories live as long as the engine and survive
/// rebinding.
pub struct SelectorEngine<D: DomCapability> {
    dom: Option<D>,
    config: EngineConfig,
    cache: SelectorMemory,
    failures: FailureMemory,
}

impl<D: DomCapability> Default for SelectorEngine<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DomCapability> SelectorEngine<D> {
    /// Create an unbound engine with default tunables.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an unbound engine.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            dom: None,
            config,
            cache: SelectorMemory::new(),
            failures: FailureMemory::new(),
        }
    }

    /// Create an engine bound to `dom` with default tunables.
    pub fn with_dom(dom: D) -> Self {
        let mut engine = Self::new();
        engine.dom = Some(dom);
        engine
    }

    /// Bind (or rebind) the DOM capability, returning the previous one.
    pub fn bind(&mut self, dom: D) -> Option<D> {
        self.dom.replace(dom)
    }

    pub fn is_bound(&self) -> bool {
        self.dom.is_some()
    }

    pub fn dom(&self) -> Option<&D> {
        self.dom.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn selector_memory(&self) -> &SelectorMemory {
        &self.cache
    }

    pub fn failure_memory(&self) -> &FailureMemory {
        &self.failures
    }

    /// Cached selector for `intent`, if any.
    pub fn cached(&self, intent: Intent) -> Option<&SelectorCandidate> {
        self.cache.get(intent)
    }

    /// Run every generator and return the ranked candidates.
    ///
    /// Candidates scoring at or below `min_confidence` are dropped; the rest
    /// are sorted by confidence, ties keeping generator order.
    pub async fn discover(&mut self, intent: Intent) -> Result<Vec<SelectorCandidate>> {
        let dom = self.dom.as_ref().ok_or(Error::Unbound)?;
        let candidates = run_generators(dom, intent, &mut self.failures, &self.config).await;
        Ok(rank(candidates, self.config.min_confidence))
    }

    /// [`find_element_with_fallback`](Self::find_element_with_fallback) with
    /// the configured attempt budget.
    pub async fn find_element(&mut self, intent: Intent) -> Result<Option<Found<D::Element>>> {
        let attempts = self.config.max_attempts;
        self.find_element_with_fallback(intent, attempts).await
    }

    /// Discover, then verify the top `max_attempts` candidates against the
    /// live page in rank order.
    ///
    /// The first candidate that matches is cached for `intent` and returned.
    /// `Ok(None)` means nothing verified.
    pub async fn find_element_with_fallback(
        &mut self,
        intent: Intent,
        max_attempts: usize,
    ) -> Result<Option<Found<D::Element>>> {
        let ranked = self.discover(intent).await?;
        self.verify_candidates(intent, &ranked, max_attempts).await
    }

    /// Verify already-ranked candidates without running discovery again.
    ///
    /// Same loop as [`find_element_with_fallback`](Self::find_element_with_fallback):
    /// at most `max_attempts` candidates are tried, known failures are skipped
    /// and a throwing re-query is recorded.
    pub async fn verify_candidates(
        &mut self,
        intent: Intent,
        ranked: &[SelectorCandidate],
        max_attempts: usize,
    ) -> Result<Option<Found<D::Element>>> {
        let dom = self.dom.as_ref().ok_or(Error::Unbound)?;

        for (attempt, candidate) in ranked.iter().take(max_attempts).enumerate() {
            if self.failures.contains(&candidate.selector) {
                continue;
            }
            debug!(
                "{} attempt {}/{}: {}",
                intent,
                attempt + 1,
                max_attempts,
                candidate.selector
            );
            match dom.query_all(&candidate.selector).await {
                Ok(elements) => {
                    let Some(element) = elements.into_iter().next() else {
                        debug!("{}: {} no longer matches", intent, candidate.selector);
                        continue;
                    };
                    info!(
                        "{} -> {} ({}, {:.2})",
                        intent, candidate.selector, candidate.strategy, candidate.confidence
                    );
                    self.cache.remember(intent, candidate.clone());
                    return Ok(Some(Found {
                        element,
                        selector: candidate.selector.clone(),
                    }));
                }
                Err(e) => {
                    debug!("{}: {} failed: {}", intent, candidate.selector, e);
                    self.failures.record(
                        candidate.selector.clone(),
                        FailureReason::Threw(e.to_string()),
                    );
                }
            }
        }

        debug!("{}: no candidate verified", intent);
        Ok(None)
    }

    /// Check a caller-supplied selector against the page and cache it as a
    /// manual pick if it matches.
    ///
    /// A selector already known to fail is rejected without querying.
    pub async fn validate_selector(&mut self, intent: Intent, selector: &str) -> Result<bool> {
        let dom = self.dom.as_ref().ok_or(Error::Unbound)?;
        if self.failures.contains(selector) {
            debug!("{}: {} is known to fail", intent, selector);
            return Ok(false);
        }

        match dom.query_all(selector).await {
            Ok(elements) if !elements.is_empty() => {
                info!("{} validated: {} x{}", intent, selector, elements.len());
                self.cache.remember(
                    intent,
                    SelectorCandidate::new(
                        selector,
                        MANUAL_CONFIDENCE,
                        Strategy::Manual,
                        elements.len(),
                    ),
                );
                Ok(true)
            }
            Ok(_) => {
                self.failures.record(selector, FailureReason::NoMatch);
                Ok(false)
            }
            Err(e) => {
                self.failures
                    .record(selector, FailureReason::Threw(e.to_string()));
                Ok(false)
            }
        }
    }

    /// Pin `selector` for `intent` without touching the page.
    pub fn learn_selector(&mut self, intent: Intent, selector: &str) -> Result<()> {
        if self.dom.is_none() {
            return Err(Error::Unbound);
        }
        info!("{} learned: {}", intent, selector);
        self.cache.remember(
            intent,
            SelectorCandidate::new(selector, LEARNED_CONFIDENCE, Strategy::Learned, 1),
        );
        Ok(())
    }

    /// Snapshot the page for diagnostics.
    pub async fn page_context(&self) -> Result<PageContext> {
        let dom = self.dom.as_ref().ok_or(Error::Unbound)?;
        Ok(dom.page_context().await?)
    }
}

/// Run the generators in order, folding each one's rejections into
/// `failures` before the next starts.
async fn run_generators<D: DomCapability>(
    dom: &D,
    intent: Intent,
    failures: &mut FailureMemory,
    config: &EngineConfig,
) -> Vec<SelectorCandidate> {
    let mut candidates = Vec::new();

    for generator in Generator::ALL {
        match generator.generate(dom, intent, failures, config).await {
            Ok(generation) => {
                for rejection in generation.rejected {
                    debug!(
                        "{} {}: rejected {}: {}",
                        generator, intent, rejection.selector, rejection.reason
                    );
                    let reason = FailureReason::Threw(rejection.reason.to_string());
                    failures.record(rejection.selector, reason);
                }
                candidates.extend(generation.candidates);
            }
            Err(e) => warn!("{} generator failed for {}: {}", generator, intent, e),
        }
    }

    candidates
}

/// Drop candidates at or below `threshold`, stable-sort descending, then keep
/// only the best-ranked copy of each selector.
pub(crate) fn rank(
    mut candidates: Vec<SelectorCandidate>,
    threshold: f64,
) -> Vec<SelectorCandidate> {
    candidates.retain(|c| c.confidence > threshold);
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.selector.clone()));
    candidates
}
