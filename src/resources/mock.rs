//! Mock resource clients for isolating the list controller in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::contact::{Contact, NewContact, UpdateContact};
use crate::domain::document::{Document, NewDocument, UpdateDocument};
use crate::pagination::PaginatedResponse;
use crate::resources::errors::ClientResult;
use crate::resources::{FileUpload, QueryParams, ResourceClient, UploadResource};

mock! {
    pub ContactResource {}

    #[async_trait]
    impl ResourceClient for ContactResource {
        type Item = Contact;
        type Create = NewContact;
        type Update = UpdateContact;

        async fn list(&self, params: &QueryParams) -> ClientResult<PaginatedResponse<Contact>>;
        async fn create(&self, payload: &NewContact) -> ClientResult<Contact>;
        async fn update(&self, id: &str, payload: &UpdateContact) -> ClientResult<Contact>;
        async fn delete(&self, id: &str) -> ClientResult<()>;
    }
}

mock! {
    pub DocumentResource {}

    #[async_trait]
    impl ResourceClient for DocumentResource {
        type Item = Document;
        type Create = NewDocument;
        type Update = UpdateDocument;

        async fn list(&self, params: &QueryParams) -> ClientResult<PaginatedResponse<Document>>;
        async fn create(&self, payload: &NewDocument) -> ClientResult<Document>;
        async fn update(&self, id: &str, payload: &UpdateDocument) -> ClientResult<Document>;
        async fn delete(&self, id: &str) -> ClientResult<()>;
    }

    #[async_trait]
    impl UploadResource for DocumentResource {
        async fn upload(&self, upload: &FileUpload) -> ClientResult<Document>;
    }
}
