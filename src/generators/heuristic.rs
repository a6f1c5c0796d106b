//! Weighted substring patterns over common attributes.

use super::Generation;
use crate::dom::DomCapability;
use crate::memory::FailureMemory;
use crate::{Intent, SelectorCandidate, Strategy};
use tracing::debug;

/// Matches at which a pattern reaches its full weight.
const SATURATION: f64 = 5.0;

/// Where a pattern is looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrTarget {
    /// Case-insensitive substring of the named attribute.
    Attr(&'static str),
    /// Case-insensitive substring of the text content.
    Text,
}

/// A substring, the places to look for it, and how much a hit is worth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicPattern {
    pub pattern: &'static str,
    pub targets: &'static [AttrTarget],
    pub weight: f64,
}

impl HeuristicPattern {
    /// Selector for one target.
    pub fn selector(&self, target: AttrTarget) -> String {
        match target {
            AttrTarget::Attr(attr) => format!(r#"[{}*="{}" i]"#, attr, self.pattern),
            AttrTarget::Text => format!(r#":has-text("{}")"#, self.pattern),
        }
    }

    /// Selectors for every target, in table order.
    pub fn selectors(&self) -> impl Iterator<Item = String> + '_ {
        self.targets.iter().map(move |t| self.selector(*t))
    }

    /// `weight` scaled by how many elements matched.
    pub fn confidence(&self, count: usize) -> f64 {
        self.weight * (count as f64 / SATURATION).min(1.0)
    }
}

use AttrTarget::{Attr, Text};

// Struct literal rather than a fn call so the tables promote to 'static.
macro_rules! pattern {
    ($pattern:expr, [$($target:expr),+ $(,)?], $weight:expr) => {
        HeuristicPattern {
            pattern: $pattern,
            targets: &[$($target),+],
            weight: $weight,
        }
    };
}

/// Patterns tried for `intent`.
pub fn heuristic_patterns(intent: Intent) -> &'static [HeuristicPattern] {
    match intent {
        Intent::Search => &[
            pattern!("search", [Attr("placeholder"), Attr("class"), Attr("id"), Attr("name")], 1.0),
            pattern!("find", [Attr("placeholder"), Attr("class"), Attr("id")], 0.8),
            pattern!("look", [Attr("placeholder"), Attr("class")], 0.7),
        ],
        Intent::Product => &[
            pattern!("product", [Attr("class"), Attr("data-testid"), Attr("id")], 1.0),
            pattern!("item", [Attr("class"), Attr("data-testid")], 0.8),
            pattern!("card", [Attr("class")], 0.6),
        ],
        Intent::Price => &[
            pattern!("price", [Attr("class"), Attr("data-testid"), Attr("id")], 1.0),
            pattern!("cost", [Attr("class")], 0.8),
            pattern!("amount", [Attr("class")], 0.7),
            pattern!("rs", [Attr("class")], 0.6),
            pattern!("₹", [Text], 1.0),
        ],
        Intent::Cart => &[
            pattern!("cart", [Attr("class"), Attr("data-testid"), Attr("id")], 1.0),
            pattern!("basket", [Attr("class"), Attr("id")], 0.8),
            pattern!("bag", [Attr("class")], 0.6),
        ],
        Intent::Login => &[
            pattern!("login", [Attr("class"), Attr("id"), Attr("href")], 1.0),
            pattern!("signin", [Attr("class"), Attr("id"), Attr("href")], 0.9),
            pattern!("sign-in", [Attr("class"), Attr("href")], 0.8),
        ],
        Intent::Quantity => &[
            pattern!("quantity", [Attr("class"), Attr("data-testid"), Attr("name")], 1.0),
            pattern!("qty", [Attr("class"), Attr("name")], 0.9),
            pattern!("stepper", [Attr("class")], 0.6),
        ],
        Intent::Checkout => &[
            pattern!("checkout", [Attr("class"), Attr("data-testid"), Attr("id"), Attr("href")], 1.0),
            pattern!("proceed", [Attr("class")], 0.6),
        ],
        Intent::Phone => &[
            pattern!("phone", [Attr("name"), Attr("placeholder"), Attr("id")], 1.0),
            pattern!("mobile", [Attr("name"), Attr("placeholder")], 0.9),
        ],
        Intent::Otp => &[
            pattern!("otp", [Attr("name"), Attr("id"), Attr("class")], 1.0),
            pattern!("code", [Attr("name"), Attr("placeholder")], 0.7),
        ],
    }
}

pub(super) async fn generate<D: DomCapability>(
    dom: &D,
    intent: Intent,
    failures: &FailureMemory,
) -> Generation {
    let mut out = Generation::default();

    for heuristic in heuristic_patterns(intent) {
        for selector in heuristic.selectors() {
            if failures.contains(&selector) {
                continue;
            }
            match dom.query_all(&selector).await {
                Ok(elements) if !elements.is_empty() => {
                    let count = elements.len();
                    let confidence = heuristic.confidence(count);
                    debug!("heuristic {}: {} x{} ({:.2})", intent, selector, count, confidence);
                    out.candidates.push(SelectorCandidate::new(
                        selector,
                        confidence,
                        Strategy::Heuristic,
                        count,
                    ));
                }
                Ok(_) => {}
                Err(e) => out.reject(&selector, e),
            }
        }
    }

    out
}
