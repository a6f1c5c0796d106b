//! In-memory DOM capability for driving the engine without a browser.

#![allow(dead_code)]

use async_trait::async_trait;
use eoka_selector::{BoundingBox, DomCapability, DomError, PageContext, ViewportSize};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// One fake element.
#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    pub attrs: HashMap<String, String>,
    pub bbox: Option<BoundingBox>,
}

/// Node with the given attributes and no geometry.
pub fn node(attrs: &[(&str, &str)]) -> FakeNode {
    FakeNode {
        attrs: attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        bbox: None,
    }
}

/// Node rendered at the given rectangle.
pub fn boxed(x: f64, y: f64, width: f64, height: f64) -> FakeNode {
    FakeNode {
        attrs: HashMap::new(),
        bbox: Some(BoundingBox {
            x,
            y,
            width,
            height,
        }),
    }
}

/// Index into the fake node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle(pub usize);

/// Selector-keyed fake page. Unknown selectors match nothing.
pub struct FakeDom {
    nodes: Vec<FakeNode>,
    selectors: HashMap<String, Vec<usize>>,
    invalid: HashSet<String>,
    breaks_after: HashMap<String, usize>,
    vanishes_after: HashMap<String, usize>,
    viewport: Result<Option<ViewportSize>, DomError>,
    context: PageContext,
    log: Mutex<Vec<String>>,
}

impl Default for FakeDom {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            selectors: HashMap::new(),
            invalid: HashSet::new(),
            breaks_after: HashMap::new(),
            vanishes_after: HashMap::new(),
            viewport: Ok(Some(ViewportSize {
                width: 1280.0,
                height: 720.0,
            })),
            context: PageContext::default(),
            log: Mutex::new(Vec::new()),
        }
    }
}

impl FakeDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// `selector` matches `count` fresh attribute-less nodes.
    pub fn with_matches(mut self, selector: &str, count: usize) -> Self {
        for _ in 0..count {
            self = self.with_node(selector, FakeNode::default());
        }
        self
    }

    /// Append `node` to the matches of `selector`.
    pub fn with_node(mut self, selector: &str, node: FakeNode) -> Self {
        let id = self.nodes.len();
        self.nodes.push(node);
        self.selectors.entry(selector.to_string()).or_default().push(id);
        self
    }

    /// `selector` fails to parse.
    pub fn invalid(mut self, selector: &str) -> Self {
        self.invalid.insert(selector.to_string());
        self
    }

    /// `selector` works for the first `n` queries, then throws.
    pub fn breaks_after(mut self, selector: &str, n: usize) -> Self {
        self.breaks_after.insert(selector.to_string(), n);
        self
    }

    /// `selector` works for the first `n` queries, then matches nothing.
    pub fn vanishes_after(mut self, selector: &str, n: usize) -> Self {
        self.vanishes_after.insert(selector.to_string(), n);
        self
    }

    pub fn without_viewport(mut self) -> Self {
        self.viewport = Ok(None);
        self
    }

    pub fn viewport_error(mut self) -> Self {
        self.viewport = Err(DomError::Browser("target closed".into()));
        self
    }

    pub fn with_context(mut self, context: PageContext) -> Self {
        self.context = context;
        self
    }

    /// Every `query_all` call so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn query_count(&self, selector: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.as_str() == selector)
            .count()
    }

    fn node(&self, handle: &Handle) -> Result<&FakeNode, DomError> {
        self.nodes
            .get(handle.0)
            .ok_or_else(|| DomError::Stale(format!("node {}", handle.0)))
    }
}

#[async_trait]
impl DomCapability for FakeDom {
    type Element = Handle;

    async fn query_all(&self, selector: &str) -> Result<Vec<Handle>, DomError> {
        let previous = {
            let mut log = self.log.lock().unwrap();
            let previous = log.iter().filter(|s| s.as_str() == selector).count();
            log.push(selector.to_string());
            previous
        };

        if self.invalid.contains(selector) {
            return Err(DomError::InvalidSelector {
                selector: selector.to_string(),
                message: "not a valid selector".into(),
            });
        }
        if let Some(&n) = self.breaks_after.get(selector) {
            if previous >= n {
                return Err(DomError::Browser("execution context was destroyed".into()));
            }
        }
        if let Some(&n) = self.vanishes_after.get(selector) {
            if previous >= n {
                return Ok(Vec::new());
            }
        }

        Ok(self
            .selectors
            .get(selector)
            .map(|ids| ids.iter().map(|&id| Handle(id)).collect())
            .unwrap_or_default())
    }

    async fn attributes(&self, element: &Handle) -> Result<HashMap<String, String>, DomError> {
        Ok(self.node(element)?.attrs.clone())
    }

    async fn bounding_box(&self, element: &Handle) -> Result<Option<BoundingBox>, DomError> {
        Ok(self.node(element)?.bbox)
    }

    async fn viewport_size(&self) -> Result<Option<ViewportSize>, DomError> {
        self.viewport.clone()
    }

    async fn page_context(&self) -> Result<PageContext, DomError> {
        Ok(self.context.clone())
    }
}
