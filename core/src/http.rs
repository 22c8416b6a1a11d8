//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! services build `HttpRequest` values and parse `HttpResponse` values without
//! touching the network; `transport::ApiClient` (or any other host) executes
//! them. Paths are relative to the configured base URL and already carry
//! their query string.

use crate::error::ApiError;
use crate::types::ImageUpload;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// Request body variants the backend accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// A serialized JSON document.
    Json(String),
    /// A single-file multipart form under `field`.
    Multipart { field: String, upload: ImageUpload },
}

impl RequestBody {
    /// The JSON text, if this is a JSON body.
    pub fn as_json(&self) -> Option<&str> {
        match self {
            RequestBody::Json(text) => Some(text),
            RequestBody::Multipart { .. } => None,
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn get(path: String) -> Self {
        Self {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn json(method: HttpMethod, path: String, body: String) -> Self {
        Self {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(RequestBody::Json(body)),
        }
    }

    pub fn multipart(path: String, field: &str, upload: ImageUpload) -> Self {
        Self {
            method: HttpMethod::Post,
            path,
            headers: Vec::new(),
            body: Some(RequestBody::Multipart {
                field: field.to_string(),
                upload,
            }),
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    /// Case-insensitive header lookup; returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 200,
            headers: vec![("X-Total-Count".to_string(), "12".to_string())],
            body: String::new(),
        };
        assert_eq!(response.header("x-total-count"), Some("12"));
        assert_eq!(response.header("link"), None);
    }

    #[test]
    fn any_2xx_passes_status_check() {
        assert!(check_status(&HttpResponse::new(200, "")).is_ok());
        assert!(check_status(&HttpResponse::new(201, "")).is_ok());
        assert!(matches!(
            check_status(&HttpResponse::new(404, "")),
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            check_status(&HttpResponse::new(500, "boom")),
            Err(ApiError::HttpStatus { status: 500, .. })
        ));
    }

    #[test]
    fn json_request_sets_content_type() {
        let req = HttpRequest::json(HttpMethod::Post, "/events".into(), "{}".into());
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        assert_eq!(req.body.as_ref().and_then(RequestBody::as_json), Some("{}"));
    }
}
