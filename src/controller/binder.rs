//! Transition rules applied to [`QueryState`] before a list is re-fetched.
//!
//! Changing the search or any filter resets the page to 1 so the next request
//! never asks for a page that may not exist under the new criteria. Changing
//! the page alone keeps every other field.

use crate::controller::query::QueryState;

/// A user-initiated change to the query of a list page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryChange {
    Search(String),
    Filter { name: String, value: Option<String> },
    ClearFilters,
    Page(u32),
}

impl QueryChange {
    pub fn filter(name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        QueryChange::Filter {
            name: name.into(),
            value: value.map(Into::into),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed; no request must be issued.
    Unchanged,
    /// The query changed; exactly one fetch must follow.
    Refetch,
}

/// Applies `change` to `state` and reports whether a fetch must follow.
pub fn apply(state: &mut QueryState, change: QueryChange) -> Transition {
    match change {
        QueryChange::Search(search) => {
            if state.search == search {
                return Transition::Unchanged;
            }
            state.search = search;
            state.page = 1;
            Transition::Refetch
        }
        QueryChange::Filter { name, value } => {
            let current = state.filters.get(&name).cloned().flatten();
            if current == value {
                return Transition::Unchanged;
            }
            match value {
                Some(value) => {
                    state.filters.insert(name, Some(value));
                }
                None => {
                    state.filters.remove(&name);
                }
            }
            state.page = 1;
            Transition::Refetch
        }
        QueryChange::ClearFilters => {
            if state.filters.is_empty() {
                return Transition::Unchanged;
            }
            state.filters.clear();
            state.page = 1;
            Transition::Refetch
        }
        QueryChange::Page(page) => {
            let page = page.max(1);
            if state.page == page {
                return Transition::Unchanged;
            }
            state.page = page;
            Transition::Refetch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page(page: u32) -> QueryState {
        QueryState {
            page,
            ..QueryState::default()
        }
    }

    #[test]
    fn search_change_resets_page() {
        let mut state = on_page(4);

        let transition = apply(&mut state, QueryChange::Search("acme".to_string()));

        assert_eq!(transition, Transition::Refetch);
        assert_eq!(state.page, 1);
        assert_eq!(state.search, "acme");
    }

    #[test]
    fn filter_change_resets_page() {
        let mut state = on_page(3);

        let transition = apply(&mut state, QueryChange::filter("status", Some("open")));

        assert_eq!(transition, Transition::Refetch);
        assert_eq!(state.page, 1);
        assert_eq!(state.filter("status"), Some("open"));
    }

    #[test]
    fn clearing_a_filter_resets_page_and_removes_key() {
        let mut state = on_page(2);
        state
            .filters
            .insert("status".to_string(), Some("open".to_string()));

        let transition = apply(&mut state, QueryChange::filter("status", None::<String>));

        assert_eq!(transition, Transition::Refetch);
        assert_eq!(state.page, 1);
        assert!(state.filters.is_empty());
    }

    #[test]
    fn page_change_keeps_search_and_filters() {
        let mut state = QueryState::default();
        apply(&mut state, QueryChange::Search("acme".to_string()));
        apply(&mut state, QueryChange::filter("status", Some("open")));

        let transition = apply(&mut state, QueryChange::Page(5));

        assert_eq!(transition, Transition::Refetch);
        assert_eq!(state.page, 5);
        assert_eq!(state.search, "acme");
        assert_eq!(state.filter("status"), Some("open"));
    }

    #[test]
    fn identical_values_do_not_refetch() {
        let mut state = on_page(2);
        state.search = "acme".to_string();

        assert_eq!(
            apply(&mut state, QueryChange::Search("acme".to_string())),
            Transition::Unchanged
        );
        assert_eq!(apply(&mut state, QueryChange::Page(2)), Transition::Unchanged);
        assert_eq!(apply(&mut state, QueryChange::ClearFilters), Transition::Unchanged);
        assert_eq!(
            apply(&mut state, QueryChange::filter("status", None::<String>)),
            Transition::Unchanged
        );
        assert_eq!(state.page, 2);
    }

    #[test]
    fn page_zero_clamps_to_first_page() {
        let mut state = on_page(3);
        assert_eq!(apply(&mut state, QueryChange::Page(0)), Transition::Refetch);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn typing_search_on_filtered_second_page_requests_first_page() {
        let mut state = QueryState {
            page: 2,
            filters: [("status".to_string(), Some("open".to_string()))].into(),
            ..QueryState::default()
        };

        apply(&mut state, QueryChange::Search("acme".to_string()));
        let params = state.to_params();

        assert_eq!(params.get("page").map(String::as_str), Some("1"));
        assert_eq!(params.get("search").map(String::as_str), Some("acme"));
        assert_eq!(params.get("status").map(String::as_str), Some("open"));
        assert_eq!(params.len(), 3);
    }
}
