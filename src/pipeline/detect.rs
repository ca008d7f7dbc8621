//! Page mode detection from an HTML document.

use scraper::{Html, Selector};

use super::PageMode;

const REPORTS_SELECTOR: &str = "#reports";
const GALLERY_SELECTOR: &str = "#container";

impl PageMode {
    /// Classify a page by probing for the reports mount and gallery container.
    pub fn detect_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        PageMode::from_flags(
            has_match(&document, REPORTS_SELECTOR),
            has_match(&document, GALLERY_SELECTOR),
        )
    }
}

fn has_match(document: &Html, selector: &str) -> bool {
    match Selector::parse(selector) {
        Ok(sel) => document.select(&sel).next().is_some(),
        Err(_) => false,
    }
}
