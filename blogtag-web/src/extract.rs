//! Main-content text extraction.
//!
//! The article body is the first element matched by the first selector that
//! matches anything. Its text is gathered without `script`/`style` content,
//! block boundaries become spaces, and whitespace is collapsed. A page with no
//! recognisable content region yields empty text.

use scraper::{ElementRef, Html, Selector};

const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "svg"];

const BLOCK: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

#[derive(Debug, thiserror::Error)]
#[error("invalid content selector `{selector}`: {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

/// Ordered list of CSS selectors identifying an article body.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    selectors: Vec<(String, Selector)>,
}

impl ContentExtractor {
    /// Compile `selectors`, in priority order.
    ///
    /// ```
    /// use blogtag_web::ContentExtractor;
    ///
    /// let ex = ContentExtractor::new(&["article", ".entry-content"]).unwrap();
    /// let html = "<html><body><nav>Menu</nav><article><h1>Hi</h1><p>Body &amp; soul</p></article></body></html>";
    /// assert_eq!(ex.main_text(html), "Hi Body & soul");
    /// ```
    pub fn new<S: AsRef<str>>(selectors: &[S]) -> Result<Self, SelectorError> {
        let selectors = selectors
            .iter()
            .map(|s| {
                let raw = s.as_ref();
                Selector::parse(raw)
                    .map(|sel| (raw.to_string(), sel))
                    .map_err(|e| SelectorError {
                        selector: raw.to_string(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }

    /// Plain text of the main content region, or `""` when none is found.
    pub fn main_text(&self, html: &str) -> String {
        let doc = Html::parse_document(html);
        for (raw, sel) in &self.selectors {
            if let Some(el) = doc.select(sel).next() {
                let mut out = String::new();
                collect_text(el, &mut out);
                let text = out.split_whitespace().collect::<Vec<_>>().join(" ");
                tracing::trace!(selector = %raw, chars = text.chars().count(), "extract.main_text");
                return text;
            }
        }
        tracing::debug!("extract.no_content_region");
        String::new()
    }
}

fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if SKIPPED.contains(&name) {
                continue;
            }
            let block = BLOCK.contains(&name);
            if block {
                out.push(' ');
            }
            collect_text(child_el, out);
            if block {
                out.push(' ');
            }
        }
    }
}
