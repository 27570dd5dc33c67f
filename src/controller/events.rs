//! Mutation notifications shared between list pages and the dialogs that edit
//! their resources.

use std::fmt::{Display, Formatter};

use tokio::sync::broadcast;

use crate::domain::resource::ResourceKind;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationAction {
    Created,
    Updated,
    Deleted,
    Uploaded,
}

impl MutationAction {
    pub const fn verb(self) -> &'static str {
        match self {
            MutationAction::Created => "create",
            MutationAction::Updated => "update",
            MutationAction::Deleted => "delete",
            MutationAction::Uploaded => "upload",
        }
    }
}

impl Display for MutationAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationAction::Created => write!(f, "created"),
            MutationAction::Updated => write!(f, "updated"),
            MutationAction::Deleted => write!(f, "deleted"),
            MutationAction::Uploaded => write!(f, "uploaded"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationEvent {
    pub kind: ResourceKind,
    pub action: MutationAction,
    pub id: String,
    /// Controller that performed the mutation, if any. A controller never
    /// refreshes twice for its own mutations.
    pub origin: Option<u64>,
}

impl MutationEvent {
    pub fn new(kind: ResourceKind, action: MutationAction, id: impl Into<String>) -> Self {
        Self {
            kind,
            action,
            id: id.into(),
            origin: None,
        }
    }
}

/// Broadcast channel carrying [`MutationEvent`]s to every subscribed list.
#[derive(Clone, Debug)]
pub struct MutationBus {
    sender: broadcast::Sender<MutationEvent>,
}

impl Default for MutationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl MutationBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MutationEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of subscribers that received the event.
    pub fn publish(&self, event: MutationEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                log::debug!("No subscribers for {} {} {}", event.kind, event.id, event.action);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = MutationBus::default();
        let mut events = bus.subscribe();

        let delivered = bus.publish(MutationEvent::new(
            ResourceKind::Quotes,
            MutationAction::Created,
            "12",
        ));

        assert_eq!(delivered, 1);
        let event = events.recv().await.unwrap();
        assert_eq!(event.kind, ResourceKind::Quotes);
        assert_eq!(event.id, "12");
        assert_eq!(event.origin, None);
    }

    #[test]
    fn publishing_without_subscribers_is_not_an_error() {
        let bus = MutationBus::new(4);
        assert_eq!(
            bus.publish(MutationEvent::new(
                ResourceKind::Contacts,
                MutationAction::Deleted,
                "1"
            )),
            0
        );
    }
}
