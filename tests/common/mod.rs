//! Scripted contact resource whose list responses settle only when a test
//! releases them.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use pushkind_crm_console::domain::contact::{Contact, NewContact, UpdateContact};
use pushkind_crm_console::domain::types::ContactId;
use pushkind_crm_console::{
    ClientError, ClientResult, PaginatedResponse, QueryParams, ResourceClient,
};

pub type ListReply = ClientResult<PaginatedResponse<Contact>>;

#[derive(Default)]
pub struct ScriptedContacts {
    gates: Mutex<VecDeque<oneshot::Receiver<ListReply>>>,
    calls: Mutex<Vec<QueryParams>>,
    mutations: Mutex<Vec<String>>,
}

impl ScriptedContacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the next list call; it stays pending until the sender is used.
    pub fn gate(&self) -> oneshot::Sender<ListReply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    /// Queues a list call that settles immediately with `reply`.
    pub fn respond(&self, reply: ListReply) {
        let _ = self.gate().send(reply);
    }

    pub fn calls(&self) -> Vec<QueryParams> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<String> {
        self.mutations.lock().unwrap().clone()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls.lock().unwrap().len() < count {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("list calls issued in time");
    }
}

#[async_trait]
impl ResourceClient for ScriptedContacts {
    type Item = Contact;
    type Create = NewContact;
    type Update = UpdateContact;

    async fn list(&self, params: &QueryParams) -> ListReply {
        self.calls.lock().unwrap().push(params.clone());
        let gate = self.gates.lock().unwrap().pop_front();
        match gate {
            Some(gate) => gate
                .await
                .unwrap_or_else(|_| Err(ClientError::Network("gate dropped".to_string()))),
            None => Err(ClientError::Network("unscripted list call".to_string())),
        }
    }

    async fn create(&self, payload: &NewContact) -> ClientResult<Contact> {
        self.mutations
            .lock()
            .unwrap()
            .push(format!("create {}", payload.name));
        Ok(contact(100, payload.name.as_str()))
    }

    async fn update(&self, id: &str, _payload: &UpdateContact) -> ClientResult<Contact> {
        self.mutations.lock().unwrap().push(format!("update {id}"));
        Ok(contact(id.parse().unwrap_or(1), "Updated"))
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        self.mutations.lock().unwrap().push(format!("delete {id}"));
        Ok(())
    }
}

pub fn contact(id: i64, name: &str) -> Contact {
    Contact {
        id: ContactId::new(id).expect("valid contact id"),
        name: name.to_string(),
        email: None,
        phone: None,
        company: None,
        status: None,
        owner: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn page(count: usize, names: &[&str]) -> ListReply {
    Ok(PaginatedResponse::new(
        count,
        names
            .iter()
            .enumerate()
            .map(|(i, name)| contact(i as i64 + 1, name))
            .collect(),
    ))
}

pub fn param<'a>(params: &'a QueryParams, name: &str) -> Option<&'a str> {
    params.get(name).map(String::as_str)
}
