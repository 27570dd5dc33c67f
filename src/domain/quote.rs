use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::resource::{Resource, ResourceKind};
use crate::domain::types::{Amount, ContactId, QuoteId, QuoteTitle};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

impl QuoteStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Expired => "expired",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub id: QuoteId,
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub contact: Option<ContactId>,
    pub status: QuoteStatus,
    /// Decimal string as rendered by the backend.
    pub total: String,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewQuote {
    pub title: QuoteTitle,
    pub contact: ContactId,
    pub status: QuoteStatus,
    pub total: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct UpdateQuote {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<QuoteTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QuoteStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
}

impl Resource for Quote {
    const KIND: ResourceKind = ResourceKind::Quotes;

    type Create = NewQuote;
    type Update = UpdateQuote;
    type Id = QuoteId;

    fn id_string(&self) -> String {
        self.id.to_string()
    }
}
