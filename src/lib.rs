//! Client-side engine of the CRM front end.
//!
//! Every resource page of the CRM is a list backed by a REST endpoint. This
//! crate provides the typed [`resources`] clients for those endpoints and the
//! generic [`controller::ListController`] that owns a page's query, fetches
//! it, keeps pagination consistent and refreshes after mutations.

#[cfg(feature = "cli")]
pub mod cli;
pub mod controller;
pub mod domain;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod resources;

pub use controller::{ListController, ListSettings};
pub use pagination::{DEFAULT_ITEMS_PER_PAGE, PaginatedResponse};
pub use resources::errors::{ClientError, ClientResult};
pub use resources::http::{ApiClient, HttpResource};
pub use resources::{QueryParams, ResourceClient};
