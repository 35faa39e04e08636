//! Pagination block reader

use scraper::{Html, Selector};

use super::compile_selector;
use crate::infrastructure::config::SelectorConfig;
use crate::infrastructure::error::ScrapeResult;

/// Reads the link labels of a result page's pagination block.
#[derive(Debug)]
pub struct PaginationParser {
    block: Selector,
    link: Selector,
}

impl PaginationParser {
    pub fn new(selectors: &SelectorConfig) -> ScrapeResult<Self> {
        Ok(Self {
            block: compile_selector("selectors.pagination", &selectors.pagination)?,
            link: compile_selector("selectors.pagination_link", &selectors.pagination_link)?,
        })
    }

    /// Link labels of the first pagination block, in document order.
    /// `None` when the page has no pagination block.
    pub fn link_labels(&self, page_html: &str) -> Option<Vec<String>> {
        let document = Html::parse_document(page_html);
        let block = document.select(&self.block).next()?;
        Some(
            block
                .select(&self.link)
                .map(|a| a.text().collect::<String>())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> PaginationParser {
        PaginationParser::new(&SelectorConfig::default()).unwrap()
    }

    #[test]
    fn reads_labels_in_dom_order() {
        let html = r#"
            <nav><ul class="pagination-list"></ul></nav>
            <div class="pagination">
              <a href="?start=50">2</a><a href="?start=100">3</a>
              <a href="?start=150"><span>4</span></a><a aria-label="Next">Next</a>
            </div>"#;
        assert_eq!(
            parser().link_labels(html),
            Some(vec!["2".into(), "3".into(), "4".into(), "Next".into()])
        );
    }

    #[test]
    fn missing_block() {
        assert_eq!(parser().link_labels("<html><body></body></html>"), None);
    }

    #[test]
    fn empty_block() {
        assert_eq!(
            parser().link_labels(r#"<div class="pagination"></div>"#),
            Some(vec![])
        );
    }
}
