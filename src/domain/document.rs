use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::resource::{Resource, ResourceKind};
use crate::domain::types::{DocumentId, DocumentTitle};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Download location served by the document store.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Metadata-only document record (link documents without a file body).
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewDocument {
    pub title: DocumentTitle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct UpdateDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<DocumentTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Resource for Document {
    const KIND: ResourceKind = ResourceKind::Documents;

    type Create = NewDocument;
    type Update = UpdateDocument;
    type Id = DocumentId;

    fn id_string(&self) -> String {
        self.id.to_string()
    }
}
