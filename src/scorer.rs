//! Syntactic confidence scoring.
//!
//! The score looks only at the selector text and how many elements it
//! matched. Adjustments stack in a fixed order and the result is clamped to
//! `[0, 1]`.

use crate::candidate::clamp_unit;
use crate::Intent;

const BASE: f64 = 0.5;
const DATA_ATTR_BONUS: f64 = 0.2;
const ROLE_BONUS: f64 = 0.15;
const ARIA_LABEL_BONUS: f64 = 0.1;
const GENERIC_TAG_PENALTY: f64 = 0.3;
const UNIQUE_SEARCH_BONUS: f64 = 0.1;

/// Confidence for `selector` producing `count` matches for `intent`.
pub fn score(intent: Intent, selector: &str, count: usize) -> f64 {
    let mut confidence = BASE;

    // `data-testid` is itself a `data-*` attribute
    if selector.contains("data-") {
        confidence += DATA_ATTR_BONUS;
    }
    if selector.contains("role=") {
        confidence += ROLE_BONUS;
    }
    if selector.contains("aria-label") {
        confidence += ARIA_LABEL_BONUS;
    }
    if is_bare_generic(selector) {
        confidence -= GENERIC_TAG_PENALTY;
    }
    if count == 1 && intent == Intent::Search {
        confidence += UNIQUE_SEARCH_BONUS;
    }

    clamp_unit(confidence)
}

fn is_bare_generic(selector: &str) -> bool {
    matches!(selector.trim(), "input" | "button")
}
