//! The list-page controller shared by every resource page.

pub mod binder;
pub mod events;
pub mod list;
pub mod query;
pub mod view;

pub use binder::{QueryChange, Transition};
pub use events::{MutationAction, MutationBus, MutationEvent};
pub use list::{
    Confirm, Deletion, FetchOutcome, ListController, ListSettings, ListSnapshot, Refresh,
    ResponseOrdering,
};
pub use query::QueryState;
pub use view::ListView;
