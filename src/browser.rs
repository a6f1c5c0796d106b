//! [`DomCapability`] over a live `eoka::Page`.
//!
//! Every call injects a small script and reads back a JSON string. Element
//! handles are `(selector, index)` pairs re-resolved on each use, so a handle
//! outlives DOM churn only as long as its selector still finds it.

use crate::dom::{BoundingBox, DomCapability, DomError, PageContext, ViewportSize};
use async_trait::async_trait;
use eoka::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

/// Selector engine used by every script.
///
/// Plain CSS, plus a trailing `:has-text("…")` (case-insensitive text filter)
/// and a trailing `>> nth=N` (pick one match, negative counts from the end).
const QUERY_JS: &str = r#"
(selector) => {
    let sel = selector;
    let nth = null;
    const nthMatch = sel.match(/^(.*?)\s*>>\s*nth=(-?\d+)\s*$/);
    if (nthMatch) {
        sel = nthMatch[1];
        nth = parseInt(nthMatch[2], 10);
    }
    let text = null;
    const textMatch = sel.match(/^(.*?):has-text\((["'])(.*)\2\)\s*$/);
    if (textMatch) {
        sel = textMatch[1].trim() || '*';
        text = textMatch[3].toLowerCase();
    }
    let els = [...document.querySelectorAll(sel)];
    if (text !== null) {
        els = els.filter(el => (el.textContent || '').toLowerCase().includes(text));
    }
    if (nth !== null) {
        const el = nth < 0 ? els[els.length + nth] : els[nth];
        els = el ? [el] : [];
    }
    return els;
}
"#;

/// Counts matches, or reports why the selector could not run.
const COUNT_JS: &str = r#"
try {
    return JSON.stringify({ count: query(__sel).length });
} catch (e) {
    return JSON.stringify({ error: String((e && e.message) || e) });
}
"#;

const ATTRIBUTES_JS: &str = r#"
const el = query(__sel)[__idx];
if (!el) return JSON.stringify(null);
const attrs = {};
for (const a of el.attributes) attrs[a.name] = a.value;
return JSON.stringify(attrs);
"#;

const BOUNDING_BOX_JS: &str = r#"
const el = query(__sel)[__idx];
if (!el) return JSON.stringify({ stale: true });
const style = getComputedStyle(el);
const r = el.getBoundingClientRect();
if (style.display === 'none' || style.visibility === 'hidden' || (r.width === 0 && r.height === 0)) {
    return JSON.stringify({ bbox: null });
}
return JSON.stringify({ bbox: { x: r.x, y: r.y, width: r.width, height: r.height } });
"#;

const VIEWPORT_JS: &str = r#"
(() => {
    const width = window.innerWidth;
    const height = window.innerHeight;
    if (!width || !height) return JSON.stringify(null);
    return JSON.stringify({ width, height });
})()
"#;

const PAGE_CONTEXT_JS: &str = r#"
(() => {
    const inputs = Array.from(document.querySelectorAll('input, textarea')).map(el => ({
        type: el.type || 'text',
        placeholder: el.getAttribute('placeholder') || '',
        location: el.closest('header') ? 'header'
            : el.closest('main') ? 'main'
            : el.closest('nav') ? 'nav'
            : 'other',
    }));
    const buttons = Array.from(document.querySelectorAll('button'))
        .map(b => (b.textContent || '').trim())
        .filter(Boolean)
        .slice(0, 20);
    const groups = new Set();
    for (const el of document.querySelectorAll('[class]')) {
        const name = typeof el.className === 'string' ? el.className : el.getAttribute('class') || '';
        const classes = name.split(/\s+/).filter(c => c.length > 3);
        groups.add(classes.slice(0, 3).join(' '));
    }
    const structure = Array.from(groups).filter(Boolean).slice(0, 30).join(', ');
    return JSON.stringify({
        title: document.title,
        url: window.location.href,
        structure,
        inputs,
        buttons,
    });
})()
"#;

#[derive(Deserialize)]
struct CountReply {
    count: Option<usize>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct BoundingBoxReply {
    #[serde(default)]
    stale: bool,
    bbox: Option<BoundingBox>,
}

/// Handle to the `index`-th match of `selector`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EokaElement {
    pub selector: String,
    pub index: usize,
}

/// DOM capability backed by an `eoka::Page`.
pub struct EokaDom<'a> {
    page: &'a Page,
}

impl<'a> EokaDom<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }

    /// Get a reference to the underlying Page.
    pub fn page(&self) -> &Page {
        self.page
    }

    /// Run `body` with `query`, `__sel` and `__idx` in scope.
    async fn run_scoped<T: DeserializeOwned>(
        &self,
        selector: &str,
        index: usize,
        body: &str,
    ) -> Result<T, DomError> {
        let js = format!(
            "(() => {{ const query = {}; const __sel = {}; const __idx = {}; {} }})()",
            QUERY_JS,
            js_string(selector)?,
            index,
            body
        );
        self.eval_json(&js).await
    }

    async fn eval_json<T: DeserializeOwned>(&self, js: &str) -> Result<T, DomError> {
        let json_str: String = self.page.evaluate(js).await?;
        serde_json::from_str(&json_str)
            .map_err(|e| DomError::Browser(format!("script reply parse error: {}", e)))
    }
}

fn js_string(s: &str) -> Result<String, DomError> {
    serde_json::to_string(s).map_err(|e| DomError::Browser(e.to_string()))
}

#[async_trait]
impl<'a> DomCapability for EokaDom<'a> {
    type Element = EokaElement;

    async fn query_all(&self, selector: &str) -> Result<Vec<EokaElement>, DomError> {
        let reply: CountReply = self.run_scoped(selector, 0, COUNT_JS).await?;
        if let Some(message) = reply.error {
            return Err(DomError::InvalidSelector {
                selector: selector.to_string(),
                message,
            });
        }
        let count = reply.count.unwrap_or(0);
        Ok((0..count)
            .map(|index| EokaElement {
                selector: selector.to_string(),
                index,
            })
            .collect())
    }

    async fn attributes(&self, element: &EokaElement) -> Result<HashMap<String, String>, DomError> {
        let attrs: Option<HashMap<String, String>> = self
            .run_scoped(&element.selector, element.index, ATTRIBUTES_JS)
            .await?;
        attrs.ok_or_else(|| stale(element))
    }

    async fn bounding_box(&self, element: &EokaElement) -> Result<Option<BoundingBox>, DomError> {
        let reply: BoundingBoxReply = self
            .run_scoped(&element.selector, element.index, BOUNDING_BOX_JS)
            .await?;
        if reply.stale {
            return Err(stale(element));
        }
        Ok(reply.bbox)
    }

    async fn viewport_size(&self) -> Result<Option<ViewportSize>, DomError> {
        self.eval_json(VIEWPORT_JS).await
    }

    async fn page_context(&self) -> Result<PageContext, DomError> {
        self.eval_json(PAGE_CONTEXT_JS).await
    }
}

fn stale(element: &EokaElement) -> DomError {
    DomError::Stale(format!("{} [{}]", element.selector, element.index))
}
