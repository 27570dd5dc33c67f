use serde::Deserialize;
use validator::Validate;

use crate::domain::playbook::{NewPlaybook, UpdatePlaybook};
use crate::domain::types::PlaybookName;
use crate::forms::{FormError, not_blank};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct PlaybookForm {
    #[validate(custom(function = "not_blank"), length(max = 120))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
}

impl TryFrom<PlaybookForm> for NewPlaybook {
    type Error = FormError;

    fn try_from(form: PlaybookForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewPlaybook {
            name: PlaybookName::new(form.name).map_err(FormError::field("name"))?,
            description: form.description.trim().to_string(),
            is_active: form.is_active,
        })
    }
}

impl TryFrom<PlaybookForm> for UpdatePlaybook {
    type Error = FormError;

    fn try_from(form: PlaybookForm) -> Result<Self, Self::Error> {
        let playbook = NewPlaybook::try_from(form)?;
        Ok(UpdatePlaybook {
            name: Some(playbook.name),
            description: Some(playbook.description),
            is_active: Some(playbook.is_active),
        })
    }
}
