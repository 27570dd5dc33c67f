//! Resource representations exchanged with the CRM backend.

pub mod contact;
pub mod document;
pub mod playbook;
pub mod quote;
pub mod resource;
pub mod ticket;
pub mod types;
