//! HTTP transport to the inventory backend.
//!
//! One attempt per call: no retry, no timeout policy, no deduplication.

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use stockpad_auth::Authorization;

use crate::dto;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint paths are relative to the base URL; a leading slash is optional.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str, auth: Option<&Authorization>) -> Result<Value, ApiError> {
        self.execute(self.request(Method::GET, path, auth)).await
    }

    pub async fn delete(&self, path: &str, auth: Option<&Authorization>) -> Result<Value, ApiError> {
        self.execute(self.request(Method::DELETE, path, auth)).await
    }

    pub async fn post<B>(
        &self,
        path: &str,
        auth: Option<&Authorization>,
        body: &B,
    ) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::POST, path, auth).json(body))
            .await
    }

    pub async fn put<B>(
        &self,
        path: &str,
        auth: Option<&Authorization>,
        body: &B,
    ) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::PUT, path, auth).json(body))
            .await
    }

    fn request(&self, method: Method, path: &str, auth: Option<&Authorization>) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, authorized = auth.is_some(), "sending request");

        let req = self.http.request(method, url);
        match auth {
            // Raw token, no scheme prefix.
            Some(auth) => req.header(reqwest::header::AUTHORIZATION, auth.header_value()),
            None => req,
        }
    }

    async fn execute(&self, req: RequestBuilder) -> Result<Value, ApiError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: dto::error_message(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Decode a response body already read as JSON into its typed shape.
pub fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::Parse(e.to_string()))
}
