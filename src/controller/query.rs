//! Query state of a list page and the request parameters derived from it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::resources::QueryParams;

/// Filter values meaning "no filter" in select controls.
const ALL_SENTINELS: [&str; 2] = ["all", "__all__"];

/// Page, search and filter values driving what a list page fetches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryState {
    /// 1-based page number.
    pub page: u32,
    pub search: String,
    pub filters: BTreeMap<String, Option<String>>,
    /// True exactly while a fetch is in flight, and before the first fetch.
    pub loading: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            filters: BTreeMap::new(),
            loading: true,
        }
    }
}

impl QueryState {
    /// Same page, search and filters; `loading` is ignored.
    pub fn same_query(&self, other: &QueryState) -> bool {
        self.page == other.page && self.search == other.search && self.filters == other.filters
    }

    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).and_then(|value| value.as_deref())
    }

    /// Flat request parameters.
    ///
    /// `page` is always sent. `search` and filters are sent only when set to
    /// a non-blank value other than an "all" sentinel.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert("page".to_string(), self.page.max(1).to_string());

        if let Some(search) = active_value(Some(self.search.as_str())) {
            params.insert("search".to_string(), search);
        }

        for (name, value) in &self.filters {
            if let Some(value) = active_value(value.as_deref()) {
                params.insert(name.clone(), value);
            }
        }

        params
    }
}

/// Returns the trimmed value when it should be sent to the backend.
pub fn active_value(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty()
        || ALL_SENTINELS
            .iter()
            .any(|sentinel| value.eq_ignore_ascii_case(sentinel))
    {
        return None;
    }
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(filters: &[(&str, Option<&str>)]) -> QueryState {
        QueryState {
            filters: filters
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
            ..QueryState::default()
        }
    }

    #[test]
    fn initial_state_is_first_page_and_loading() {
        let state = QueryState::default();
        assert_eq!(state.page, 1);
        assert!(state.search.is_empty());
        assert!(state.filters.is_empty());
        assert!(state.loading);
    }

    #[test]
    fn falsy_filters_are_omitted() {
        let state = state_with(&[
            ("status", Some("")),
            ("owner", None),
            ("folder", Some("all")),
            ("tags", Some("__all__")),
            ("priority", Some("  ")),
            ("kind", Some("ALL")),
        ]);

        let params = state.to_params();

        assert_eq!(params.len(), 1);
        assert_eq!(params.get("page").map(String::as_str), Some("1"));
    }

    #[test]
    fn empty_search_is_not_sent() {
        let params = QueryState::default().to_params();
        assert!(!params.contains_key("search"));
    }

    #[test]
    fn set_values_are_sent_trimmed() {
        let mut state = state_with(&[("status", Some(" open ")), ("owner", Some("0"))]);
        state.search = " acme ".to_string();
        state.page = 3;

        let params = state.to_params();

        assert_eq!(params.get("page").map(String::as_str), Some("3"));
        assert_eq!(params.get("search").map(String::as_str), Some("acme"));
        assert_eq!(params.get("status").map(String::as_str), Some("open"));
        assert_eq!(params.get("owner").map(String::as_str), Some("0"));
    }

    #[test]
    fn loading_does_not_affect_query_equality() {
        let mut a = QueryState::default();
        let b = QueryState::default();
        a.loading = false;
        assert!(a.same_query(&b));
        assert_ne!(a, b);
    }
}
