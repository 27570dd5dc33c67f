//! What a list page renders, derived from a [`ListSnapshot`].

use crate::controller::list::ListSnapshot;
use crate::domain::resource::ResourceKind;
use crate::pagination::PageControl;
use crate::resources::errors::ClientError;

/// Call-to-action shown on an empty list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallToAction {
    pub label: String,
    pub route: String,
}

impl CallToAction {
    pub fn create(kind: ResourceKind) -> Self {
        Self {
            label: format!("Create {}", kind.slug().trim_end_matches('s').replace('-', " ")),
            route: kind.new_route(),
        }
    }
}

/// Body of a list page.
///
/// Rows are shown exactly as the backend returned them: no sorting, filtering
/// or slicing happens here.
#[derive(Clone, Debug, PartialEq)]
pub enum ListView<'a, T> {
    Loading,
    Empty(CallToAction),
    Table {
        rows: &'a [T],
        pagination: PageControl,
    },
}

impl<'a, T> ListView<'a, T> {
    pub fn from_snapshot(
        kind: ResourceKind,
        snapshot: &'a ListSnapshot<T>,
        page_size: usize,
    ) -> Self {
        if snapshot.query.loading {
            return ListView::Loading;
        }

        if snapshot.result.results.is_empty() {
            return ListView::Empty(CallToAction::create(kind));
        }

        ListView::Table {
            rows: &snapshot.result.results,
            pagination: PageControl::new(
                snapshot.result.count,
                page_size,
                snapshot.query.page as usize,
            ),
        }
    }
}

/// Message for the single error slot every page renders above its body.
pub fn error_banner(error: &ClientError) -> String {
    match error {
        ClientError::Network(_) => {
            "The server could not be reached. Check your connection and try again.".to_string()
        }
        ClientError::Validation(errors) => errors.to_string(),
        ClientError::Server { status, .. } => {
            format!("The server failed to process the request ({status}).")
        }
        ClientError::InvalidResponse(_) => {
            "The server returned an unexpected response.".to_string()
        }
    }
}
