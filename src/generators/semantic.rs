//! Role / ARIA / attribute templates.

use super::Generation;
use crate::dom::DomCapability;
use crate::memory::FailureMemory;
use crate::{scorer, Intent, SelectorCandidate, Strategy};
use tracing::debug;

/// Selector templates tried for `intent`, most specific first.
pub fn semantic_templates(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::Search => &[
            r#"[role="search"] input"#,
            r#"[role="searchbox"]"#,
            r#"input[type="search"]"#,
            r#"[aria-label*="search" i]"#,
            r#"form[role="search"] input"#,
        ],
        Intent::Product => &[
            r#"[role="article"]"#,
            r#"[role="listitem"]"#,
            "article",
            "[data-product]",
            r#"[data-item-type="product"]"#,
        ],
        Intent::Cart => &[
            r#"[role="complementary"][aria-label*="cart" i]"#,
            r#"[aria-label*="cart" i]"#,
            r#"[data-testid*="cart" i]"#,
            r#"button:has-text("Cart")"#,
            r#"a:has-text("Cart")"#,
        ],
        Intent::Login => &[
            r#"button:has-text("Login")"#,
            r#"button:has-text("Sign in")"#,
            r#"a:has-text("Login")"#,
            r#"button:has-text("Log in")"#,
            r#"[aria-label*="login" i]"#,
        ],
        Intent::Price => &[
            r#"[data-testid*="price" i]"#,
            r#"span:has-text("₹")"#,
            r#"div:has-text("₹")"#,
            r#"[aria-label*="price" i]"#,
            r#"span[class*="price" i]"#,
        ],
        Intent::Quantity => &[
            r#"[data-testid*="quantity" i]"#,
            r#"[aria-label*="quantity" i]"#,
            r#"input[role="spinbutton"]"#,
            r#"[role="spinbutton"]"#,
        ],
        Intent::Checkout => &[
            r#"[data-testid*="checkout" i]"#,
            r#"[aria-label*="checkout" i]"#,
            r#"button:has-text("Checkout")"#,
            r#"button:has-text("Proceed")"#,
            r#"a[href*="checkout" i]"#,
        ],
        Intent::Phone => &[
            r#"input[autocomplete="tel"]"#,
            r#"[aria-label*="phone" i]"#,
            r#"[aria-label*="mobile" i]"#,
        ],
        Intent::Otp => &[
            r#"input[autocomplete="one-time-code"]"#,
            r#"[aria-label*="otp" i]"#,
            r#"[data-testid*="otp" i]"#,
        ],
    }
}

pub(super) async fn generate<D: DomCapability>(
    dom: &D,
    intent: Intent,
    failures: &FailureMemory,
) -> Generation {
    let mut out = Generation::default();

    for &selector in semantic_templates(intent) {
        if failures.contains(selector) {
            continue;
        }
        match dom.query_all(selector).await {
            Ok(elements) if !elements.is_empty() => {
                let count = elements.len();
                let confidence = scorer::score(intent, selector, count);
                debug!("semantic {}: {} x{} ({:.2})", intent, selector, count, confidence);
                out.candidates.push(SelectorCandidate::new(
                    selector,
                    confidence,
                    Strategy::Semantic,
                    count,
                ));
            }
            Ok(_) => {}
            Err(e) => out.reject(selector, e),
        }
    }

    out
}
