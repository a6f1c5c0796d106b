//! Launch a browser, open a page and resolve a set of intents on it.

use crate::config::{BrowserConfig, ProbeConfig};
use crate::dom::{DomCapability, PageContext};
use crate::memory::FailureReason;
use crate::{EokaDom, Intent, Result, SelectorCandidate, SelectorEngine};
use eoka::{Browser, Page};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of a hand-supplied selector.
#[derive(Debug, Clone, Serialize)]
pub struct OverrideReport {
    pub intent: Intent,
    pub selector: String,
    pub trusted: bool,
    pub accepted: bool,
}

/// Outcome for one intent.
#[derive(Debug, Clone, Serialize)]
pub struct IntentReport {
    pub intent: Intent,
    /// Ranked candidates from discovery.
    pub candidates: Vec<SelectorCandidate>,
    /// Selector in effect: an accepted override, or the one verified by the
    /// fallback run.
    pub found: Option<String>,
    /// Selector memory entry after the run.
    pub cached: Option<SelectorCandidate>,
}

/// A failed selector and why.
#[derive(Debug, Clone, Serialize)]
pub struct FailureEntry {
    pub selector: String,
    pub reason: FailureReason,
}

/// Result of a probe run.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub name: String,
    pub url: String,
    pub context: Option<PageContext>,
    pub overrides: Vec<OverrideReport>,
    pub intents: Vec<IntentReport>,
    pub failures: Vec<FailureEntry>,
    pub duration_ms: u64,
}

impl ProbeReport {
    /// Intents for which nothing was found or cached.
    pub fn unresolved(&self) -> Vec<Intent> {
        self.intents
            .iter()
            .filter(|r| r.found.is_none() && r.cached.is_none())
            .map(|r| r.intent)
            .collect()
    }
}

/// Overrides, per-intent outcomes and failures from one [`resolve`] pass.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub overrides: Vec<OverrideReport>,
    pub intents: Vec<IntentReport>,
    pub failures: Vec<FailureEntry>,
}

/// Apply `config.overrides`, then resolve each configured intent.
///
/// An intent with an accepted override keeps it: its candidates are still
/// discovered for the report, but nothing is verified over it. Every other
/// intent is discovered once and its ranked list verified in place.
pub async fn resolve<D: DomCapability>(
    engine: &mut SelectorEngine<D>,
    config: &ProbeConfig,
) -> Result<Resolution> {
    let mut overrides = Vec::with_capacity(config.overrides.len());
    for o in &config.overrides {
        let accepted = if o.trust {
            engine.learn_selector(o.intent, &o.selector)?;
            true
        } else {
            engine.validate_selector(o.intent, &o.selector).await?
        };
        overrides.push(OverrideReport {
            intent: o.intent,
            selector: o.selector.clone(),
            trusted: o.trust,
            accepted,
        });
    }

    let mut intents = Vec::new();
    for intent in config.intents() {
        let candidates = engine.discover(intent).await?;
        let pinned = overrides
            .iter()
            .rev()
            .find(|o| o.intent == intent && o.accepted)
            .map(|o| o.selector.clone());

        let found = match pinned {
            Some(selector) => {
                debug!("{}: keeping override {}", intent, selector);
                Some(selector)
            }
            None => engine
                .verify_candidates(intent, &candidates, config.engine.max_attempts)
                .await?
                .map(|f| f.selector),
        };

        intents.push(IntentReport {
            intent,
            candidates,
            found,
            cached: engine.cached(intent).cloned(),
        });
    }

    let failures = engine
        .failure_memory()
        .iter()
        .map(|(selector, reason)| FailureEntry {
            selector: selector.to_string(),
            reason: reason.clone(),
        })
        .collect();

    Ok(Resolution {
        overrides,
        intents,
        failures,
    })
}

/// Owns a browser and the page probes run on.
pub struct Probe {
    browser: Browser,
    page: Page,
}

impl Probe {
    /// Launch a browser with the given config.
    pub async fn new(config: &BrowserConfig) -> Result<Self> {
        let stealth = eoka::StealthConfig {
            headless: config.headless,
            proxy: config.proxy.clone(),
            user_agent: config.user_agent.clone(),
            viewport_width: config.viewport.as_ref().map(|v| v.width).unwrap_or(1280),
            viewport_height: config.viewport.as_ref().map(|v| v.height).unwrap_or(720),
            ..Default::default()
        };

        debug!(
            "Launching browser (headless: {}, proxy: {:?})",
            config.headless, config.proxy
        );
        let browser = Browser::launch_with_config(stealth).await?;
        let page = browser.new_page("about:blank").await?;

        Ok(Self { browser, page })
    }

    /// Get a reference to the page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate, apply overrides, then discover and resolve each intent.
    pub async fn run(&self, config: &ProbeConfig) -> Result<ProbeReport> {
        let start = Instant::now();
        info!("Navigating to: {}", config.target.url);
        self.page.goto(&config.target.url).await?;

        let mut engine = SelectorEngine::with_config(config.engine.clone());
        engine.bind(EokaDom::new(&self.page));

        let context = match engine.page_context().await {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                warn!("page context unavailable: {}", e);
                None
            }
        };

        let Resolution {
            overrides,
            intents,
            failures,
        } = resolve(&mut engine, config).await?;

        Ok(ProbeReport {
            name: config.name.clone(),
            url: config.target.url.clone(),
            context,
            overrides,
            intents,
            failures,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Close the browser.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}
