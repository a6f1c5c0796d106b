//! Header-area geometry.

use super::Generation;
use crate::config::PositionalConfig;
use crate::dom::{DomCapability, DomError};
use crate::memory::FailureMemory;
use crate::{Intent, SelectorCandidate, Strategy};
use tracing::debug;

const POSITIONAL_CONFIDENCE: f64 = 0.6;

/// Elements measured by the positional generator, in document order.
pub const SCAN_SELECTOR: &str = "input, textarea, button";

pub(super) async fn generate<D: DomCapability>(
    dom: &D,
    intent: Intent,
    failures: &FailureMemory,
    config: &PositionalConfig,
) -> Result<Generation, DomError> {
    match intent {
        Intent::Search => header_fields(dom, failures, config).await,
        Intent::Product
        | Intent::Cart
        | Intent::Login
        | Intent::Price
        | Intent::Quantity
        | Intent::Checkout
        | Intent::Phone
        | Intent::Otp => Ok(Generation::default()),
    }
}

/// Wide fields whose top edge sits in the header band of the viewport.
async fn header_fields<D: DomCapability>(
    dom: &D,
    failures: &FailureMemory,
    config: &PositionalConfig,
) -> Result<Generation, DomError> {
    let mut out = Generation::default();
    if failures.contains(SCAN_SELECTOR) {
        return Ok(out);
    }

    let elements = match dom.query_all(SCAN_SELECTOR).await {
        Ok(elements) => elements,
        Err(e) => {
            out.reject(SCAN_SELECTOR, e);
            return Ok(out);
        }
    };
    if elements.is_empty() {
        return Ok(out);
    }

    let Some(viewport) = dom.viewport_size().await? else {
        debug!("positional: viewport unknown, skipping");
        return Ok(out);
    };
    let header_limit = viewport.height * config.header_fraction;

    for (i, element) in elements.iter().enumerate().take(config.scan_limit) {
        let bbox = match dom.bounding_box(element).await {
            Ok(Some(bbox)) => bbox,
            Ok(None) | Err(_) => continue,
        };
        if bbox.y >= header_limit || bbox.width <= config.min_width {
            continue;
        }
        let selector = nth_selector(i);
        if failures.contains(&selector) {
            continue;
        }
        debug!("positional: {} at y={} w={}", selector, bbox.y, bbox.width);
        out.candidates.push(SelectorCandidate::new(
            selector,
            POSITIONAL_CONFIDENCE,
            Strategy::Positional,
            1,
        ));
    }

    Ok(out)
}

/// Index-qualified selector into the scan list.
pub(crate) fn nth_selector(index: usize) -> String {
    format!("{} >> nth={}", SCAN_SELECTOR, index)
}
