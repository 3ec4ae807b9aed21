use std::fs;
use std::path::Path;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::error::AppResult;
use crate::services::DocumentSnapshot;

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Table cells sit on one line but never run into each other.
const CELL_ELEMENTS: &[&str] = &["td", "th"];

/// Elements that start a new line of visible text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary",
    "table", "tr", "ul",
];

/// A saved HTML page.
pub struct HtmlSnapshot {
    document: Html,
}

impl HtmlSnapshot {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
        }
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let markup = fs::read_to_string(path)?;
        Ok(Self::parse(&markup))
    }
}

impl DocumentSnapshot for HtmlSnapshot {
    fn select_text(&self, selector: &str) -> Vec<String> {
        let parsed = match Selector::parse(selector) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(selector, error = ?err, "ignoring unparsable selector");
                return Vec::new();
            }
        };

        self.document
            .select(&parsed)
            .map(|element| element.text().collect::<String>())
            .collect()
    }

    fn visible_text(&self) -> String {
        let mut raw = String::new();
        collect_text(self.document.root_element(), &mut raw);

        raw.lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Flattens text the way a browser lays it out: inline runs stay on one line,
/// block boundaries become newlines. Whitespace inside text nodes is folded to
/// spaces so only block boundaries produce line breaks.
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if HIDDEN_ELEMENTS.contains(&name) {
        return;
    }
    if name == "br" {
        out.push('\n');
        return;
    }

    let block = BLOCK_ELEMENTS.contains(&name);
    if block {
        out.push('\n');
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
        } else if let Some(child) = ElementRef::wrap(child) {
            collect_text(child, out);
        }
    }
    if block {
        out.push('\n');
    } else if CELL_ELEMENTS.contains(&name) {
        out.push(' ');
    }
}
