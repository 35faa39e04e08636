//! Text normalization shared by the card parser and the trigger server.

/// Trim the string and collapse every internal whitespace run (spaces,
/// tabs, newlines) into a single ASCII space.
///
/// ```
/// use job_scraper_lib::domain::text::clean_text;
/// assert_eq!(clean_text("  Senior\n Engineer  "), "Senior Engineer");
/// ```
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
