use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::resource::{Resource, ResourceKind};
use crate::domain::types::{TicketId, TicketSubject};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Display for TicketPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketPriority::Low => write!(f, "low"),
            TicketPriority::Medium => write!(f, "medium"),
            TicketPriority::High => write!(f, "high"),
            TicketPriority::Urgent => write!(f, "urgent"),
        }
    }
}

impl Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "open"),
            TicketStatus::InProgress => write!(f, "in_progress"),
            TicketStatus::Resolved => write!(f, "resolved"),
            TicketStatus::Closed => write!(f, "closed"),
        }
    }
}

impl TryFrom<&str> for TicketPriority {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TicketPriority::Low),
            "medium" => Ok(TicketPriority::Medium),
            "high" => Ok(TicketPriority::High),
            "urgent" => Ok(TicketPriority::Urgent),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InternalTicket {
    pub id: TicketId,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewTicket {
    pub subject: TicketSubject,
    pub description: String,
    pub priority: TicketPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct UpdateTicket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<TicketSubject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl Resource for InternalTicket {
    const KIND: ResourceKind = ResourceKind::InternalTickets;

    type Create = NewTicket;
    type Update = UpdateTicket;
    type Id = TicketId;

    fn id_string(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_uses_backend_spelling() {
        let ticket: InternalTicket = serde_json::from_value(json!({
            "id": 1,
            "subject": "Printer",
            "priority": "high",
            "status": "in_progress"
        }))
        .unwrap();

        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.status.to_string(), "in_progress");
        assert_eq!(ticket.description, "");
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!(TicketPriority::try_from(" URGENT "), Ok(TicketPriority::Urgent));
        assert!(TicketPriority::try_from("whenever").is_err());
    }
}
