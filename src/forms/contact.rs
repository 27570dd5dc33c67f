use serde::Deserialize;
use validator::Validate;

use crate::domain::contact::{NewContact, UpdateContact};
use crate::domain::types::{ContactEmail, ContactName, PhoneNumber};
use crate::forms::{FormError, not_blank, optional, optional_email, optional_phone};

#[derive(Debug, Default, Deserialize, Validate)]
/// Contact create/edit dialog.
pub struct ContactForm {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "optional_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "optional_phone"))]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub status: String,
}

struct ContactFields {
    name: ContactName,
    email: Option<ContactEmail>,
    phone: Option<PhoneNumber>,
    company: Option<String>,
    status: Option<String>,
}

impl ContactForm {
    fn parse(self) -> Result<ContactFields, FormError> {
        self.validate()?;

        Ok(ContactFields {
            name: ContactName::new(self.name).map_err(FormError::field("name"))?,
            email: optional(&self.email)
                .map(ContactEmail::new)
                .transpose()
                .map_err(FormError::field("email"))?,
            phone: optional(&self.phone)
                .map(PhoneNumber::new)
                .transpose()
                .map_err(FormError::field("phone"))?,
            company: optional(&self.company),
            status: optional(&self.status),
        })
    }
}

impl TryFrom<ContactForm> for NewContact {
    type Error = FormError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        let fields = form.parse()?;
        Ok(NewContact::new(
            fields.name,
            fields.email,
            fields.phone,
            fields.company,
            fields.status,
        ))
    }
}

impl TryFrom<ContactForm> for UpdateContact {
    type Error = FormError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        let fields = form.parse()?;
        Ok(UpdateContact {
            name: Some(fields.name),
            email: fields.email,
            phone: fields.phone,
            company: fields.company,
            status: fields.status,
            owner: None,
        })
    }
}
