use serde::{Deserialize, Serialize};

use crate::domain::resource::{Resource, ResourceKind};
use crate::domain::types::{PlaybookId, PlaybookName};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Playbook {
    pub id: PlaybookId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub steps_count: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewPlaybook {
    pub name: PlaybookName,
    pub description: String,
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct UpdatePlaybook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<PlaybookName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Resource for Playbook {
    const KIND: ResourceKind = ResourceKind::Playbooks;

    type Create = NewPlaybook;
    type Update = UpdatePlaybook;
    type Id = PlaybookId;

    fn id_string(&self) -> String {
        self.id.to_string()
    }
}
