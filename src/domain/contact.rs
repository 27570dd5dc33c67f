use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::resource::{Resource, ResourceKind};
use crate::domain::types::{ContactEmail, ContactId, ContactName, PhoneNumber};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewContact {
    pub name: ContactName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<ContactEmail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl NewContact {
    #[must_use]
    pub fn new(
        name: ContactName,
        email: Option<ContactEmail>,
        phone: Option<PhoneNumber>,
        company: Option<String>,
        status: Option<String>,
    ) -> Self {
        Self {
            name,
            email,
            phone,
            company: company
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            status: status
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Partial update sent as `PATCH`; absent fields are left untouched server-side.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct UpdateContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<ContactName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<ContactEmail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Resource for Contact {
    const KIND: ResourceKind = ResourceKind::Contacts;

    type Create = NewContact;
    type Update = UpdateContact;
    type Id = ContactId;

    fn id_string(&self) -> String {
        self.id.to_string()
    }
}
