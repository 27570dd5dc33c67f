use serde::{Deserialize, Serialize};

/// Page size every list endpoint of the backend uses.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 25;

/// `{count, results}` envelope returned by every list endpoint.
///
/// `count` is the total across all pages, not `results.len()`. A response is
/// never patched in place: each fetch replaces the previous one wholesale.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResponse<T> {
    pub count: usize,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Default for PaginatedResponse<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> PaginatedResponse<T> {
    pub fn new(count: usize, results: Vec<T>) -> Self {
        Self {
            count,
            next: None,
            previous: None,
            results,
        }
    }

    pub fn total_pages(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        self.count.div_ceil(page_size)
    }
}

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Pagination control rendered under a list table.
///
/// `pages` is an elided window of page numbers; `None` marks an ellipsis.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PageControl {
    pub current: usize,
    pub total_pages: usize,
    pub pages: Vec<Option<usize>>,
}

impl PageControl {
    pub fn new(count: usize, page_size: usize, current_page: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };
        let total_pages = if page_size == 0 {
            0
        } else {
            count.div_ceil(page_size)
        };

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            current: current_page,
            total_pages,
            pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    pub fn is_current(&self, page: usize) -> bool {
        page == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_seven_items_make_three_pages() {
        let control = PageControl::new(57, DEFAULT_ITEMS_PER_PAGE, 1);

        assert_eq!(control.total_pages, 3);
        assert_eq!(control.pages, vec![Some(1), Some(2), Some(3)]);
        assert!(control.is_current(1));
        assert!(!control.has_previous());
        assert!(control.has_next());
    }

    #[test]
    fn long_ranges_are_elided_around_current_page() {
        let control = PageControl::new(25 * 20, DEFAULT_ITEMS_PER_PAGE, 10);

        assert_eq!(
            control.pages,
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20)
            ]
        );
    }

    #[test]
    fn zero_page_is_treated_as_first() {
        let control = PageControl::new(10, DEFAULT_ITEMS_PER_PAGE, 0);
        assert_eq!(control.current, 1);
        assert_eq!(control.total_pages, 1);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let control = PageControl::new(0, DEFAULT_ITEMS_PER_PAGE, 1);
        assert_eq!(control.total_pages, 0);
        assert!(control.pages.is_empty());
        assert!(!control.has_next());
    }

    #[test]
    fn deserializes_drf_envelope() {
        let page: PaginatedResponse<u32> = serde_json::from_str(
            r#"{"count": 57, "next": "http://api/contacts/?page=2", "previous": null, "results": [1, 2]}"#,
        )
        .unwrap();

        assert_eq!(page.count, 57);
        assert_eq!(page.results, vec![1, 2]);
        assert_eq!(page.total_pages(DEFAULT_ITEMS_PER_PAGE), 3);
    }
}
