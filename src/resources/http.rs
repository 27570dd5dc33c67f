//! `reqwest` implementation of the resource clients.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::document::Document;
use crate::domain::resource::Resource;
use crate::models::config::ConsoleConfig;
use crate::pagination::PaginatedResponse;
use crate::resources::errors::{ClientError, ClientResult, FieldErrors};
use crate::resources::{FileUpload, QueryParams, ResourceClient, UploadResource};

/// Shared HTTP client resolving resource paths against the API base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn from_config(config: &ConsoleConfig) -> ClientResult<Self> {
        Self::new(
            config.api_base_url.clone(),
            config.api_token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = self.authorize(request).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(status.as_u16(), &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse response: {e}")))
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> ClientResult<T> {
        log::debug!("GET {path} {params:?}");
        let response = self
            .send(self.http.get(self.url(path)).query(params))
            .await?;
        Self::decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        log::debug!("POST {path}");
        let response = self.send(self.http.post(self.url(path)).json(body)).await?;
        Self::decode(response).await
    }

    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        log::debug!("PATCH {path}");
        let response = self.send(self.http.patch(self.url(path)).json(body)).await?;
        Self::decode(response).await
    }

    /// Deletes the item; the response body is ignored.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        log::debug!("DELETE {path}");
        self.send(self.http.delete(self.url(path))).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        upload: &FileUpload,
    ) -> ClientResult<T> {
        log::debug!("POST multipart {path} ({} bytes)", upload.bytes.len());

        let mut part = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
        if let Some(content_type) = &upload.content_type {
            part = part.mime_str(content_type).map_err(|_| {
                ClientError::Validation(
                    FieldErrors::default()
                        .field("file", format!("Unsupported content type `{content_type}`.")),
                )
            })?;
        }

        let mut form = Form::new().part("file", part);
        for (name, value) in &upload.fields {
            form = form.text(name.clone(), value.clone());
        }

        let response = self
            .send(self.http.post(self.url(path)).multipart(form))
            .await?;
        Self::decode(response).await
    }
}

/// [`ResourceClient`] bound to the collection endpoint of `R`.
pub struct HttpResource<R> {
    api: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> HttpResource<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }
}

impl<R> Clone for HttpResource<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Resource> ResourceClient for HttpResource<R> {
    type Item = R;
    type Create = R::Create;
    type Update = R::Update;

    async fn list(&self, params: &QueryParams) -> ClientResult<PaginatedResponse<R>> {
        self.api.get_json(&R::KIND.api_path(), params).await
    }

    async fn create(&self, payload: &R::Create) -> ClientResult<R> {
        self.api.post_json(&R::KIND.api_path(), payload).await
    }

    async fn update(&self, id: &str, payload: &R::Update) -> ClientResult<R> {
        self.api.patch_json(&R::item_path(id)?, payload).await
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        self.api.delete(&R::item_path(id)?).await
    }
}

#[async_trait]
impl UploadResource for HttpResource<Document> {
    async fn upload(&self, upload: &FileUpload) -> ClientResult<Document> {
        self.api
            .post_multipart(&Document::KIND.api_path(), upload)
            .await
    }
}
