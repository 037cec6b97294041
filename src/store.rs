use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Method};
use serde::Deserialize;

use crate::bills::dto::Bill;
use crate::config::StoreConfig;
use crate::error::StoreError;

/// Remote bills resource. Production talks HTTP; tests substitute doubles.
#[async_trait]
pub trait BillsStore: Send + Sync {
    /// Fetch every bill visible to the current user.
    async fn list(&self) -> Result<Vec<Bill>, StoreError>;

    /// Upload a receipt image. The store assigns the durable file URL and
    /// the bill key reused on the later update.
    async fn create(&self, upload: ReceiptUpload) -> Result<ReceiptHandle, StoreError>;

    /// Send a JSON-encoded bill, addressed by the key captured at upload.
    async fn update(&self, patch: BillPatch) -> Result<(), StoreError>;
}

/// Receipt file plus the owner identity, as sent in the multipart form.
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    pub file_name: String,
    pub content: Bytes,
    pub email: String,
}

/// Store response to a receipt upload.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptHandle {
    pub file_url: String,
    pub key: String,
}

/// JSON-encoded bill plus the optional store-assigned id it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillPatch {
    pub data: String,
    pub selector: Option<String>,
}

/// HTTP implementation of [`BillsStore`].
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn bills_url(&self) -> String {
        format!("{}/bills", self.base_url)
    }

    fn patch_url(&self, selector: Option<&str>) -> String {
        match selector {
            Some(id) => format!("{}/{}", self.bills_url(), id),
            None => self.bills_url(),
        }
    }

    fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        let req = self.client.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl BillsStore for HttpStore {
    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        let response = self.request(Method::GET, self.bills_url()).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    async fn create(&self, upload: ReceiptUpload) -> Result<ReceiptHandle, StoreError> {
        let part = multipart::Part::bytes(upload.content.to_vec()).file_name(upload.file_name);
        let form = multipart::Form::new()
            .text("email", upload.email)
            .part("file", part);
        let response = self
            .request(Method::POST, self.bills_url())
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    async fn update(&self, patch: BillPatch) -> Result<(), StoreError> {
        let url = self.patch_url(patch.selector.as_deref());
        let response = self
            .request(Method::PATCH, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(patch.data)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}
