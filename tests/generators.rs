//! Each generator in isolation.

mod common;

use common::{boxed, node, FakeDom, FakeNode};
use eoka_selector::generators::{Generator, POSITIONAL_SCAN_SELECTOR};
use eoka_selector::{
    BoundingBox, DomError, EngineConfig, FailureMemory, FailureReason, Intent, Strategy,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

async fn run(
    generator: Generator,
    dom: &FakeDom,
    intent: Intent,
) -> eoka_selector::generators::Generation {
    generator
        .generate(dom, intent, &FailureMemory::new(), &EngineConfig::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn semantic_scores_each_matching_template() {
    let dom = FakeDom::new()
        .with_matches(r#"[data-testid*="price" i]"#, 3)
        .with_matches(r#"[aria-label*="price" i]"#, 1);

    let out = run(Generator::Semantic, &dom, Intent::Price).await;

    assert!(out.rejected.is_empty());
    assert_eq!(out.candidates.len(), 2);
    assert_eq!(out.candidates[0].selector, r#"[data-testid*="price" i]"#);
    assert!(approx(out.candidates[0].confidence, 0.7));
    assert_eq!(out.candidates[0].element_count, 3);
    // uniqueness bonus only applies to search
    assert!(approx(out.candidates[1].confidence, 0.6));
    assert!(out
        .candidates
        .iter()
        .all(|c| c.strategy == Strategy::Semantic));
}

#[tokio::test]
async fn semantic_reports_throwing_templates() {
    let dom = FakeDom::new().invalid(r#"button:has-text("Login")"#);

    let out = run(Generator::Semantic, &dom, Intent::Login).await;

    assert!(out.candidates.is_empty());
    assert_eq!(out.rejected.len(), 1);
    assert_eq!(out.rejected[0].selector, r#"button:has-text("Login")"#);
    assert!(matches!(
        out.rejected[0].reason,
        DomError::InvalidSelector { .. }
    ));
}

#[tokio::test]
async fn generators_skip_known_failures_without_querying() {
    let dom = FakeDom::new().with_matches(r#"[role="searchbox"]"#, 2);
    let mut failures = FailureMemory::new();
    failures.record(r#"[role="searchbox"]"#, FailureReason::NoMatch);

    let out = Generator::Semantic
        .generate(&dom, Intent::Search, &failures, &EngineConfig::default())
        .await
        .unwrap();

    assert!(out.candidates.is_empty());
    assert_eq!(dom.query_count(r#"[role="searchbox"]"#), 0);
}

#[tokio::test]
async fn form_requires_a_relevant_attribute() {
    let dom = FakeDom::new()
        .with_node(r#"input[type="text"]"#, node(&[("name", "email")]))
        .with_node(
            r#"input[type="text"]"#,
            node(&[("placeholder", "Search for apples")]),
        )
        .with_node(r#"input[type="text"]"#, node(&[("id", "coupon")]))
        .with_node("textarea", node(&[("name", "comments")]));

    let out = run(Generator::FormInput, &dom, Intent::Search).await;

    assert_eq!(out.candidates.len(), 1);
    let c = &out.candidates[0];
    assert_eq!(c.selector, r#"input[type="text"]"#);
    assert_eq!(c.strategy, Strategy::FormInput);
    assert!(approx(c.confidence, 0.7));
    assert_eq!(c.element_count, 1);
}

#[tokio::test]
async fn form_emits_one_candidate_per_selector() {
    let dom = FakeDom::new()
        .with_node(r#"input[type="tel"]"#, node(&[("name", "mobile")]))
        .with_node(r#"input[type="tel"]"#, node(&[("placeholder", "Phone")]))
        .with_node(r#"input[type="tel"]"#, node(&[("aria-label", "CONTACT")]));

    let out = run(Generator::FormInput, &dom, Intent::Phone).await;

    assert_eq!(out.candidates.len(), 1);
    assert_eq!(out.candidates[0].element_count, 3);
}

#[tokio::test]
async fn form_only_inspects_the_first_matches() {
    let mut dom = FakeDom::new();
    for _ in 0..5 {
        dom = dom.with_node(r#"input[type="number"]"#, node(&[("name", "age")]));
    }
    dom = dom.with_node(r#"input[type="number"]"#, node(&[("name", "otp")]));

    let out = run(Generator::FormInput, &dom, Intent::Otp).await;

    assert!(out.candidates.is_empty());
}

#[tokio::test]
async fn form_has_nothing_for_display_intents() {
    let dom = FakeDom::new().with_node("textarea", node(&[("class", "price")]));

    for intent in [Intent::Product, Intent::Cart, Intent::Price, Intent::Checkout] {
        let out = run(Generator::FormInput, &dom, intent).await;
        assert!(out.candidates.is_empty());
    }
    assert!(dom.queries().is_empty());
}

#[tokio::test]
async fn positional_picks_wide_fields_in_the_header_band() {
    let dom = FakeDom::new()
        // 720px viewport: band ends at 180
        .with_node(POSITIONAL_SCAN_SELECTOR, boxed(10.0, 20.0, 400.0, 36.0))
        .with_node(POSITIONAL_SCAN_SELECTOR, boxed(10.0, 20.0, 120.0, 36.0))
        .with_node(POSITIONAL_SCAN_SELECTOR, boxed(10.0, 180.0, 400.0, 36.0))
        .with_node(POSITIONAL_SCAN_SELECTOR, FakeNode::default())
        .with_node(POSITIONAL_SCAN_SELECTOR, boxed(10.0, 179.0, 201.0, 36.0));

    let out = run(Generator::Positional, &dom, Intent::Search).await;
    let selectors: Vec<_> = out.candidates.iter().map(|c| c.selector.as_str()).collect();

    assert_eq!(
        selectors,
        vec![
            "input, textarea, button >> nth=0",
            "input, textarea, button >> nth=4"
        ]
    );
    for c in &out.candidates {
        assert_eq!(c.strategy, Strategy::Positional);
        assert_eq!(c.element_count, 1);
        assert!(approx(c.confidence, 0.6));
    }
}

#[tokio::test]
async fn positional_scans_a_bounded_number_of_elements() {
    let mut dom = FakeDom::new();
    for _ in 0..20 {
        dom = dom.with_node(POSITIONAL_SCAN_SELECTOR, boxed(0.0, 500.0, 400.0, 30.0));
    }
    dom = dom.with_node(POSITIONAL_SCAN_SELECTOR, boxed(0.0, 10.0, 400.0, 30.0));

    let out = run(Generator::Positional, &dom, Intent::Search).await;

    assert!(out.candidates.is_empty());
}

#[tokio::test]
async fn positional_without_viewport_is_empty() {
    let dom = FakeDom::new()
        .without_viewport()
        .with_node(POSITIONAL_SCAN_SELECTOR, boxed(0.0, 10.0, 400.0, 30.0));

    let out = run(Generator::Positional, &dom, Intent::Search).await;

    assert!(out.candidates.is_empty());
    assert!(out.rejected.is_empty());
}

#[tokio::test]
async fn positional_viewport_error_fails_the_generator() {
    let dom = FakeDom::new()
        .viewport_error()
        .with_node(POSITIONAL_SCAN_SELECTOR, boxed(0.0, 10.0, 400.0, 30.0));

    let result = Generator::Positional
        .generate(&dom, Intent::Search, &FailureMemory::new(), &EngineConfig::default())
        .await;

    assert!(matches!(result, Err(DomError::Browser(_))));
}

#[tokio::test]
async fn positional_only_runs_for_search() {
    let dom =
        FakeDom::new().with_node(POSITIONAL_SCAN_SELECTOR, boxed(0.0, 10.0, 400.0, 30.0));

    for intent in Intent::ALL {
        if intent == Intent::Search {
            continue;
        }
        let out = run(Generator::Positional, &dom, intent).await;
        assert!(out.candidates.is_empty());
    }
    assert!(dom.queries().is_empty());
}

#[tokio::test]
async fn positional_skips_failed_index_selectors() {
    let dom = FakeDom::new()
        .with_node(POSITIONAL_SCAN_SELECTOR, boxed(0.0, 10.0, 400.0, 30.0))
        .with_node(POSITIONAL_SCAN_SELECTOR, boxed(0.0, 60.0, 400.0, 30.0));
    let mut failures = FailureMemory::new();
    failures.record(
        "input, textarea, button >> nth=0",
        FailureReason::Threw("detached".into()),
    );

    let out = Generator::Positional
        .generate(&dom, Intent::Search, &failures, &EngineConfig::default())
        .await
        .unwrap();

    assert_eq!(out.candidates.len(), 1);
    assert_eq!(out.candidates[0].selector, "input, textarea, button >> nth=1");
}

#[tokio::test]
async fn heuristic_scales_weight_by_match_count() {
    let dom = FakeDom::new()
        .with_matches(r#"[class*="price" i]"#, 2)
        .with_matches(r#"[class*="cost" i]"#, 12);

    let out = run(Generator::Heuristic, &dom, Intent::Price).await;

    assert_eq!(out.candidates.len(), 2);
    assert_eq!(out.candidates[0].selector, r#"[class*="price" i]"#);
    assert!(approx(out.candidates[0].confidence, 0.4));
    assert_eq!(out.candidates[0].element_count, 2);
    assert_eq!(out.candidates[1].selector, r#"[class*="cost" i]"#);
    assert!(approx(out.candidates[1].confidence, 0.8));
    assert!(out
        .candidates
        .iter()
        .all(|c| c.strategy == Strategy::Heuristic));
}

#[tokio::test]
async fn heuristic_matches_rupee_text() {
    let dom = FakeDom::new().with_matches(r#":has-text("₹")"#, 5);

    let out = run(Generator::Heuristic, &dom, Intent::Price).await;

    assert_eq!(out.candidates.len(), 1);
    assert!(approx(out.candidates[0].confidence, 1.0));
}

#[tokio::test]
async fn heuristic_reports_throwing_patterns() {
    let dom = FakeDom::new()
        .invalid(r#":has-text("₹")"#)
        .with_matches(r#"[id*="price" i]"#, 1);

    let out = run(Generator::Heuristic, &dom, Intent::Price).await;

    assert_eq!(out.candidates.len(), 1);
    assert_eq!(out.rejected.len(), 1);
    assert_eq!(out.rejected[0].selector, r#":has-text("₹")"#);
}

#[tokio::test]
async fn zero_size_elements_are_ignored() {
    let dom = FakeDom::new().with_node(
        POSITIONAL_SCAN_SELECTOR,
        FakeNode {
            bbox: Some(BoundingBox::default()),
            ..Default::default()
        },
    );

    let out = run(Generator::Positional, &dom, Intent::Search).await;

    assert!(out.candidates.is_empty());
}
