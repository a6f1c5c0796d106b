//! Input characteristics plus a keyword relevance check.

use super::Generation;
use crate::dom::DomCapability;
use crate::memory::FailureMemory;
use crate::{Intent, SelectorCandidate, Strategy};
use tracing::debug;

const FORM_CONFIDENCE: f64 = 0.7;

/// Input-shaped selectors for `intent`.
pub fn form_selectors(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::Search => &[
            "input:not([type])",
            r#"input[type="text"]"#,
            "textarea",
        ],
        Intent::Phone => &[
            r#"input[type="tel"]"#,
            r#"input[pattern*="[0-9]"]"#,
            r#"input[maxlength="10"]"#,
            r#"input[placeholder*="phone" i]"#,
        ],
        Intent::Otp => &[
            r#"input[type="number"]"#,
            r#"input[maxlength="6"]"#,
            r#"input[minlength="6"]"#,
            r#"input[autocomplete="one-time-code"]"#,
        ],
        Intent::Login => &[
            r#"input[type="email"]"#,
            r#"input[autocomplete="username"]"#,
            r#"input[type="password"]"#,
        ],
        Intent::Quantity => &[r#"input[type="number"]"#],
        Intent::Product | Intent::Cart | Intent::Price | Intent::Checkout => &[],
    }
}

/// Keywords that must appear in some attribute value for a match to count.
pub fn relevance_keywords(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::Search => &["search", "query", "find", "lookup", "product"],
        Intent::Phone => &["phone", "mobile", "number", "tel", "contact"],
        Intent::Otp => &["otp", "code", "verify", "verification", "pin"],
        Intent::Login => &["login", "signin", "auth", "user"],
        Intent::Quantity => &["qty", "quantity"],
        Intent::Product | Intent::Cart | Intent::Price | Intent::Checkout => &[],
    }
}

pub(super) async fn generate<D: DomCapability>(
    dom: &D,
    intent: Intent,
    failures: &FailureMemory,
    scan_limit: usize,
) -> Generation {
    let mut out = Generation::default();
    let keywords = relevance_keywords(intent);

    for &selector in form_selectors(intent) {
        if failures.contains(selector) {
            continue;
        }
        let elements = match dom.query_all(selector).await {
            Ok(elements) => elements,
            Err(e) => {
                out.reject(selector, e);
                continue;
            }
        };

        let mut confirmed = 0;
        for element in elements.iter().take(scan_limit) {
            if is_relevant(dom, element, keywords).await {
                confirmed += 1;
            }
        }
        if confirmed > 0 {
            debug!("form {}: {} ({} relevant)", intent, selector, confirmed);
            out.candidates.push(SelectorCandidate::new(
                selector,
                FORM_CONFIDENCE,
                Strategy::FormInput,
                confirmed,
            ));
        }
    }

    out
}

async fn is_relevant<D: DomCapability>(dom: &D, element: &D::Element, keywords: &[&str]) -> bool {
    if keywords.is_empty() {
        return false;
    }
    let attrs = match dom.attributes(element).await {
        Ok(attrs) => attrs,
        Err(e) => {
            debug!("attribute read failed: {}", e);
            return false;
        }
    };
    let haystack = attrs
        .values()
        .map(|v| v.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    keywords.iter().any(|k| haystack.contains(k))
}
