//! Job listing record extracted from a single result card.

use serde::{Deserialize, Serialize};

/// One discovered job listing.
///
/// Created once by the card parser from a single card fragment and never
/// mutated afterwards. Free-text fields are already normalized
/// (see [`crate::domain::text::clean_text`]).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobRecord {
    /// Site-assigned identifier (`data-jk`). Empty when the card has none.
    pub id: String,
    pub title: String,
    #[serde(rename = "companyName")]
    pub company_name: String,
    pub location: String,
}

impl JobRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        company_name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company_name: company_name.into(),
            location: location.into(),
        }
    }

    /// True when the card carried no identifier attribute.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Canonical detail-page URL for this listing, e.g.
    /// `https://www.indeed.com/viewjob?jk=abc123`.
    pub fn detail_url(&self, detail_base: &str) -> String {
        format!("{detail_base}{}", self.id)
    }
}
