//! Resource kinds known to the console and how they map to the backend and UI.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Every list page of the front end is backed by one of these resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Contacts,
    Quotes,
    InternalTickets,
    Documents,
    Playbooks,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Contacts,
        ResourceKind::Quotes,
        ResourceKind::InternalTickets,
        ResourceKind::Documents,
        ResourceKind::Playbooks,
    ];

    /// URL segment shared by the REST endpoint and the page route.
    pub const fn slug(self) -> &'static str {
        match self {
            ResourceKind::Contacts => "contacts",
            ResourceKind::Quotes => "quotes",
            ResourceKind::InternalTickets => "internal-tickets",
            ResourceKind::Documents => "documents",
            ResourceKind::Playbooks => "playbooks",
        }
    }

    /// Collection endpoint relative to the API base, DRF style.
    pub fn api_path(self) -> String {
        format!("/{}/", self.slug())
    }

    /// Item endpoint relative to the API base.
    pub fn item_path(self, id: &str) -> String {
        format!("/{}/{}/", self.slug(), id)
    }

    /// Route of the list page.
    pub fn list_route(self) -> String {
        format!("/{}", self.slug())
    }

    /// Route a row click navigates to.
    pub fn detail_route(self, id: &str) -> String {
        format!("/{}/{}", self.slug(), id)
    }

    /// Route of the full-page creation flow.
    pub fn new_route(self) -> String {
        format!("/{}/new", self.slug())
    }

    /// Filter names the list page exposes besides `search`.
    pub const fn filter_names(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Contacts => &["status", "owner"],
            ResourceKind::Quotes => &["status"],
            ResourceKind::InternalTickets => &["status", "priority"],
            ResourceKind::Documents => &["folder", "tags"],
            ResourceKind::Playbooks => &["status"],
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ResourceKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == normalized)
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}

/// A backend resource representation together with its mutation payloads.
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    const KIND: ResourceKind;

    /// Body of `POST <path>`.
    type Create: Serialize + Send + Sync;
    /// Body of `PATCH <path><id>/`.
    type Update: Serialize + Send + Sync;

    /// Typed identifier; item URLs are only built from values that parse.
    type Id: FromStr<Err = TypeConstraintError> + Display;

    /// Identifier used in item URLs.
    fn id_string(&self) -> String;

    /// Item endpoint for an untrusted id such as a CLI argument.
    fn item_path(id: &str) -> Result<String, TypeConstraintError> {
        let id: Self::Id = id.parse()?;
        Ok(Self::KIND.item_path(&id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_follow_resource_slug() {
        let kind = ResourceKind::InternalTickets;
        assert_eq!(kind.api_path(), "/internal-tickets/");
        assert_eq!(kind.item_path("9"), "/internal-tickets/9/");
        assert_eq!(kind.list_route(), "/internal-tickets");
        assert_eq!(kind.detail_route("9"), "/internal-tickets/9");
        assert_eq!(kind.new_route(), "/internal-tickets/new");
    }

    #[test]
    fn kinds_parse_from_slugs() {
        assert_eq!(
            "internal_tickets".parse::<ResourceKind>(),
            Ok(ResourceKind::InternalTickets)
        );
        assert_eq!("Quotes".parse::<ResourceKind>(), Ok(ResourceKind::Quotes));
        assert!("invoices".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn item_paths_are_built_from_typed_ids() {
        use crate::domain::contact::Contact;
        use crate::domain::document::Document;

        assert_eq!(Contact::item_path(" 12 "), Ok("/contacts/12/".to_string()));
        assert_eq!(
            Document::item_path("0f8fad5b-d9cb-469f-a165-70867728950e"),
            Ok("/documents/0f8fad5b-d9cb-469f-a165-70867728950e/".to_string())
        );
        assert!(Contact::item_path("../quotes").is_err());
        assert!(Contact::item_path("3/?x").is_err());
        assert_eq!(Contact::item_path("0"), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(
            Document::item_path("1"),
            Err(TypeConstraintError::InvalidUuid)
        );
    }

    #[test]
    fn every_kind_exposes_its_filters() {
        assert_eq!(ResourceKind::Contacts.filter_names(), ["status", "owner"]);
        assert_eq!(
            ResourceKind::InternalTickets.filter_names(),
            ["status", "priority"]
        );
        assert!(
            ResourceKind::ALL
                .iter()
                .all(|kind| !kind.filter_names().is_empty())
        );
    }
}
