use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::ticket::{NewTicket, TicketPriority, UpdateTicket};
use crate::domain::types::TicketSubject;
use crate::forms::{FormError, not_blank, optional};

fn priority(value: &str) -> Result<(), ValidationError> {
    TicketPriority::try_from(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("priority"))
}

#[derive(Debug, Deserialize, Validate)]
/// New internal ticket dialog.
pub struct TicketForm {
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "priority"))]
    pub priority: String,
    #[serde(default)]
    pub assignee: String,
}

impl Default for TicketForm {
    fn default() -> Self {
        Self {
            subject: String::new(),
            description: String::new(),
            priority: "medium".to_string(),
            assignee: String::new(),
        }
    }
}

impl TryFrom<TicketForm> for NewTicket {
    type Error = FormError;

    fn try_from(form: TicketForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(NewTicket {
            subject: TicketSubject::new(form.subject).map_err(FormError::field("subject"))?,
            description: form.description.trim().to_string(),
            priority: TicketPriority::try_from(form.priority.as_str()).map_err(|reason| {
                FormError::InvalidField {
                    field: "priority",
                    reason,
                }
            })?,
            assignee: optional(&form.assignee),
        })
    }
}

impl TryFrom<TicketForm> for UpdateTicket {
    type Error = FormError;

    fn try_from(form: TicketForm) -> Result<Self, Self::Error> {
        let ticket = NewTicket::try_from(form)?;
        Ok(UpdateTicket {
            subject: Some(ticket.subject),
            description: Some(ticket.description),
            priority: Some(ticket.priority),
            status: None,
            assignee: ticket.assignee,
        })
    }
}
