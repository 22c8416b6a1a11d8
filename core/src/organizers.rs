//! Organizer access service, including organization registration and image
//! upload.
//!
//! Organizer listing always uses the `_page` / `_limit` convention with the
//! defaults from `query`, regardless of the client's event dialect.

use serde_json::Value;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::http::{check_status, HttpMethod, HttpRequest, HttpResponse};
use crate::normalize::{decode_list, decode_one, decode_page, parse_list_body};
use crate::query::{build_path, organizer_pagination, Pagination};
use crate::transport::{to_json, ApiClient};
use crate::types::{ImageUpload, NewOrganization, NewOrganizer, Organizer, OrganizerDetail, Page};

const ORGANIZERS: &str = "/organizers";
const UPLOAD_IMAGE: &str = "/uploadImage";

/// Multipart field the backend reads the file from.
pub const IMAGE_FIELD: &str = "image";

/// Object fields that may carry the stored image reference.
const IMAGE_REFERENCE_FIELDS: [&str; 3] = ["url", "image", "imageUrl"];

#[derive(Debug, Clone, Copy)]
pub struct OrganizerService<'a> {
    client: &'a ApiClient,
}

impl<'a> OrganizerService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn build_list_organizers(&self, pagination: Pagination) -> HttpRequest {
        HttpRequest::get(build_path(ORGANIZERS, &organizer_pagination(pagination)))
    }

    pub fn build_list_all_organizers(&self) -> HttpRequest {
        HttpRequest::get(ORGANIZERS.to_string())
    }

    pub fn build_get_organizer(&self, id: i64) -> HttpRequest {
        HttpRequest::get(format!("{ORGANIZERS}/{id}"))
    }

    pub fn build_create_organizer(&self, payload: &NewOrganizer) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Post, ORGANIZERS.to_string(), to_json(payload)?))
    }

    pub fn build_create_organization(&self, payload: &NewOrganization) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Post, ORGANIZERS.to_string(), to_json(payload)?))
    }

    pub fn build_update_organizer(&self, id: i64, payload: &NewOrganizer) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(
            HttpMethod::Put,
            format!("{ORGANIZERS}/{id}"),
            to_json(payload)?,
        ))
    }

    pub fn build_upload_image(&self, upload: ImageUpload) -> HttpRequest {
        HttpRequest::multipart(UPLOAD_IMAGE.to_string(), IMAGE_FIELD, upload)
    }

    pub fn parse_organizer_page(&self, response: HttpResponse) -> Result<Page<Organizer>, ApiError> {
        decode_page(response)
    }

    /// Decode the unpaged listing. Unknown shapes and non-JSON bodies give an
    /// empty list.
    pub fn parse_all_organizers(&self, response: HttpResponse) -> Result<Vec<Organizer>, ApiError> {
        check_status(&response)?;
        decode_list(parse_list_body(&response.body))
    }

    pub fn parse_organizer_detail(&self, response: HttpResponse) -> Result<OrganizerDetail, ApiError> {
        decode_one(response)
    }

    pub fn parse_organizer(&self, response: HttpResponse) -> Result<Organizer, ApiError> {
        decode_one(response)
    }

    /// Extract the stored image reference from an upload response.
    ///
    /// Accepts a JSON string, a JSON object with a `url`, `image` or
    /// `imageUrl` field, or a plain-text body.
    pub fn parse_upload_image(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response)?;
        let text = response.body.trim();
        match serde_json::from_str::<Value>(text) {
            Ok(Value::String(reference)) => Ok(reference),
            Ok(Value::Object(map)) => IMAGE_REFERENCE_FIELDS
                .iter()
                .find_map(|field| map.get(*field).and_then(Value::as_str))
                .map(str::to_string)
                .ok_or_else(|| ApiError::Deserialization("upload response has no image reference".into())),
            _ if text.is_empty() => Err(ApiError::Deserialization("empty upload response".into())),
            _ => Ok(text.to_string()),
        }
    }

    /// One page of organizers; page 1 and 50 per page unless given.
    pub async fn list_organizers(&self, pagination: Pagination) -> Result<Page<Organizer>, ApiError> {
        let response = self.client.execute(self.build_list_organizers(pagination)).await?;
        self.parse_organizer_page(response)
    }

    pub async fn list_all_organizers(&self) -> Result<Vec<Organizer>, ApiError> {
        let response = self.client.execute(self.build_list_all_organizers()).await?;
        self.parse_all_organizers(response)
    }

    pub async fn get_organizer(&self, id: i64) -> Result<OrganizerDetail, ApiError> {
        let response = self.client.execute(self.build_get_organizer(id)).await?;
        self.parse_organizer_detail(response)
    }

    pub async fn create_organizer(&self, payload: &NewOrganizer) -> Result<Organizer, ApiError> {
        let response = self.client.execute(self.build_create_organizer(payload)?).await?;
        self.parse_organizer(response)
    }

    pub async fn create_organization(&self, payload: &NewOrganization) -> Result<Organizer, ApiError> {
        let response = self.client.execute(self.build_create_organization(payload)?).await?;
        self.parse_organizer(response)
    }

    pub async fn update_organizer(&self, id: i64, payload: &NewOrganizer) -> Result<Organizer, ApiError> {
        let response = self.client.execute(self.build_update_organizer(id, payload)?).await?;
        self.parse_organizer(response)
    }

    pub async fn upload_image(&self, upload: ImageUpload) -> Result<String, ApiError> {
        debug!(file = %upload.file_name, bytes = upload.bytes.len(), "uploading image");
        let response = self.client.execute(self.build_upload_image(upload)).await?;
        let reference = self.parse_upload_image(response)?;
        info!(reference = %reference, "image stored");
        Ok(reference)
    }
}
