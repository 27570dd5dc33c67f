//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::controller::list::ResponseOrdering;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

fn default_page_size() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared by every list page and resource client.
pub struct ConsoleConfig {
    /// Base URL of the REST API, e.g. `https://crm.example.com/api`.
    pub api_base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub response_ordering: ResponseOrdering,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_settings_fall_back_to_defaults() {
        let config: ConsoleConfig =
            serde_json::from_value(json!({"api_base_url": "http://localhost:8000/api"})).unwrap();

        assert_eq!(config.page_size, 25);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.api_token, None);
        assert_eq!(config.response_ordering, ResponseOrdering::LatestIssued);
    }

    #[test]
    fn legacy_ordering_can_be_selected() {
        let config: ConsoleConfig = serde_json::from_value(json!({
            "api_base_url": "http://localhost:8000/api",
            "response_ordering": "last_settled"
        }))
        .unwrap();

        assert_eq!(config.response_ordering, ResponseOrdering::LastSettled);
    }
}
