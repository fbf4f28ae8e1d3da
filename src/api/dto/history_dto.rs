//! History lookup query parameters.

use serde::Deserialize;
use utoipa::IntoParams;

/// Query string of `GET /messages`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Website whose recent messages are requested.
    pub website: Option<String>,
}

impl HistoryQuery {
    /// Returns the website if present and non-empty.
    #[must_use]
    pub fn website(&self) -> Option<&str> {
        self.website.as_deref().filter(|w| !w.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_website_counts_as_missing() {
        let query = HistoryQuery {
            website: Some(String::new()),
        };
        assert_eq!(query.website(), None);

        let query = HistoryQuery {
            website: Some("example.com".to_string()),
        };
        assert_eq!(query.website(), Some("example.com"));
    }
}
