//! The HTTP client adapter.
//!
//! # Design
//! `ApiClient` is the one place that performs network I/O. It is built once
//! from a `ClientConfig` and borrowed by every service. It executes the plain
//! `HttpRequest` values the services build and hands back `HttpResponse`
//! values with the status untouched; interpreting the status is the parse
//! step's job. Only network failures become errors here.
//!
//! Every request carries `Accept: application/json`. JSON bodies carry
//! `Content-Type: application/json`; multipart bodies carry their own
//! boundary content type. No cookies or credentials are forwarded.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::types::ImageUpload;

/// Shared async transport. Clone is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// Client configured from the environment (see `ClientConfig::from_env`).
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for a request path.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.config.base_url())
        } else {
            format!("{}/{path}", self.config.base_url())
        }
    }

    /// Perform `request` and return the response whatever its status.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = self.url_for(&request.path);
        debug!(method = request.method.as_str(), url = %url, "sending request");

        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
        };
        let mut builder = self.http.request(method, &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            None => builder,
            Some(RequestBody::Json(text)) => builder.body(text),
            Some(RequestBody::Multipart { field, upload }) => {
                builder.multipart(Form::new().part(field, file_part(upload)?))
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await?;
        debug!(status, url = %url, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    pub async fn get(&self, path: &str) -> Result<HttpResponse, ApiError> {
        self.execute(HttpRequest::get(path.to_string())).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<HttpResponse, ApiError> {
        self.execute(HttpRequest::json(HttpMethod::Post, path.to_string(), to_json(body)?))
            .await
    }

    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<HttpResponse, ApiError> {
        self.execute(HttpRequest::json(HttpMethod::Put, path.to_string(), to_json(body)?))
            .await
    }

    /// POST `upload` as a one-file multipart form under `field`.
    pub async fn upload(&self, path: &str, field: &str, upload: ImageUpload) -> Result<HttpResponse, ApiError> {
        self.execute(HttpRequest::multipart(path.to_string(), field, upload))
            .await
    }
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn file_part(upload: ImageUpload) -> Result<Part, ApiError> {
    Part::bytes(upload.bytes)
        .file_name(upload.file_name)
        .mime_str(&upload.content_type)
        .map_err(|e| ApiError::Serialization(format!("invalid content type: {e}")))
}
