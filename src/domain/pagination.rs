//! Pagination domain logic centralization.
//!
//! Responsibility:
//! - the terminal rule for a single pagination block (exactly three links)
//! - choosing the next probe candidate (second link from the end, DOM order)
//! - page-number <-> zero-based page index conversion

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

/// Link count of a pagination block that has no further pages to reveal.
pub const TERMINAL_LINK_COUNT: usize = 3;

lazy_static! {
    static ref PAGE_NUMBER: Regex = Regex::new(r"\d+").expect("static regex");
}

/// Number of result pages to fetch. Indices are `0..count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageCount(u32);

impl PageCount {
    /// A run always covers at least the first page.
    pub fn new(count: u32) -> Self {
        Self(count.max(1))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn indices(self) -> Range<u32> {
        0..self.0
    }
}

impl std::fmt::Display for PageCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of applying the discovery rule to one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationStep {
    /// The page has no pagination block at all.
    Absent,
    /// The block has exactly [`TERMINAL_LINK_COUNT`] links.
    Terminal,
    /// Re-probe the page carrying this 1-based page number.
    Next(u32),
    /// The candidate link holds no page number.
    Unreadable(String),
}

/// Apply the discovery rule to the link texts of a pagination block,
/// in document order. `None` means the block is missing.
pub fn evaluate(links: Option<&[String]>) -> PaginationStep {
    let Some(links) = links else {
        return PaginationStep::Absent;
    };

    if links.len() == TERMINAL_LINK_COUNT {
        return PaginationStep::Terminal;
    }

    // Position len-2 is authoritative even when a larger number appears elsewhere.
    let Some(candidate) = links.len().checked_sub(2).and_then(|i| links.get(i)) else {
        return PaginationStep::Unreadable(links.join("|"));
    };

    match parse_page_number(candidate) {
        Some(page) => PaginationStep::Next(page),
        None => PaginationStep::Unreadable(candidate.clone()),
    }
}

/// First run of digits in a link label (`" 12 "` -> 12).
pub fn parse_page_number(label: &str) -> Option<u32> {
    PAGE_NUMBER
        .find(label)
        .and_then(|m| m.as_str().parse().ok())
}

/// Zero-based page index for a 1-based page number (page 1 -> index 0).
pub fn page_number_to_index(page_number: u32) -> u32 {
    page_number.saturating_sub(1)
}

/// `start` offset for a page index.
pub fn start_offset(page_index: u32, page_size: u32) -> u64 {
    u64::from(page_index) * u64::from(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn absent_block() {
        assert_eq!(evaluate(None), PaginationStep::Absent);
    }

    #[test]
    fn three_links_is_terminal() {
        let l = links(&["Previous", "4", "Next"]);
        assert_eq!(evaluate(Some(&l)), PaginationStep::Terminal);
    }

    #[test]
    fn candidate_is_second_from_end_not_maximum() {
        let l = links(&["2", "30", "4", "5", "Next"]);
        assert_eq!(evaluate(Some(&l)), PaginationStep::Next(5));
    }

    #[test]
    fn candidate_label_with_whitespace() {
        let l = links(&["2", "\n  7\n", "Next"]);
        // three links -> terminal regardless of content
        assert_eq!(evaluate(Some(&l)), PaginationStep::Terminal);

        let l = links(&["2", "3", "\n  7\n", "Next"]);
        assert_eq!(evaluate(Some(&l)), PaginationStep::Next(7));
    }

    #[test]
    fn non_numeric_candidate() {
        let l = links(&["2", "3", "…", "Next"]);
        assert_eq!(
            evaluate(Some(&l)),
            PaginationStep::Unreadable("…".to_string())
        );
    }

    #[test]
    fn single_link_block_is_unreadable() {
        let l = links(&["Next"]);
        assert!(matches!(evaluate(Some(&l)), PaginationStep::Unreadable(_)));
    }

    #[test]
    fn page_count_never_zero() {
        assert_eq!(PageCount::new(0).get(), 1);
        assert_eq!(PageCount::new(4).indices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn offsets() {
        assert_eq!(page_number_to_index(1), 0);
        assert_eq!(page_number_to_index(0), 0);
        assert_eq!(start_offset(2, 50), 100);
        assert_eq!(start_offset(page_number_to_index(5), 50), 200);
    }
}
