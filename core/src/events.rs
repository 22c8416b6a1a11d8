//! Event access service.
//!
//! # Design
//! Like every service here, each operation is split into a pure `build_*`
//! step that produces an `HttpRequest`, a pure `parse_*` step that consumes
//! an `HttpResponse`, and an async method of the operation's name that runs
//! both around one round-trip through the borrowed `ApiClient`.
//!
//! Pagination and keyword filters follow the service's `Dialect`, which
//! defaults to the one in the client configuration.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{check_status, HttpMethod, HttpRequest, HttpResponse};
use crate::normalize::{decode_one, decode_page, parse_body};
use crate::query::{build_path, Dialect};
use crate::transport::{to_json, ApiClient};
use crate::types::{Event, EventPayload, Page};

const EVENTS: &str = "/events";

#[derive(Debug, Clone, Copy)]
pub struct EventService<'a> {
    client: &'a ApiClient,
    dialect: Dialect,
}

impl<'a> EventService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            dialect: client.config().dialect,
        }
    }

    /// Same service speaking a different query dialect.
    pub fn with_dialect(self, dialect: Dialect) -> Self {
        Self { dialect, ..self }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn build_list_events(&self, per_page: i64, page: i64) -> HttpRequest {
        HttpRequest::get(build_path(EVENTS, &self.dialect.pagination(per_page, page)))
    }

    /// Pagination first, then the keyword filter for the active dialect.
    pub fn build_search_events(&self, keyword: &str, per_page: i64, page: i64) -> HttpRequest {
        let mut params = self.dialect.pagination(per_page, page);
        params.extend(self.dialect.keyword(keyword));
        HttpRequest::get(build_path(EVENTS, &params))
    }

    pub fn build_get_event(&self, id: i64) -> HttpRequest {
        HttpRequest::get(format!("{EVENTS}/{id}"))
    }

    /// POST the backend-shaped payload for `event`. The client-side `id` is
    /// dropped and the pets flag is sent as `petAllowed`.
    pub fn build_create_event(&self, event: &Event) -> Result<HttpRequest, ApiError> {
        let payload = EventPayload::from(event);
        Ok(HttpRequest::json(HttpMethod::Post, EVENTS.to_string(), to_json(&payload)?))
    }

    /// POST `payload` as-is, for callers that already hold the backend shape.
    pub fn build_create_event_raw(&self, payload: &Value) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Post, EVENTS.to_string(), to_json(payload)?))
    }

    pub fn build_update_event(&self, id: i64, event: &Event) -> Result<HttpRequest, ApiError> {
        let payload = EventPayload::from(event);
        Ok(HttpRequest::json(
            HttpMethod::Put,
            format!("{EVENTS}/{id}"),
            to_json(&payload)?,
        ))
    }

    /// Decode a list or search response. Unknown shapes give an empty page.
    pub fn parse_event_page(&self, response: HttpResponse) -> Result<Page<Event>, ApiError> {
        let page: Page<Event> = decode_page(response)?;
        let unsaved = page.items.iter().filter(|e| e.id.is_none()).count();
        if unsaved > 0 {
            warn!(count = unsaved, "backend returned events without an id");
        }
        Ok(page)
    }

    /// Decode a get, create or update response.
    pub fn parse_event(&self, response: HttpResponse) -> Result<Event, ApiError> {
        let event: Event = decode_one(response)?;
        if event.id.is_none() {
            warn!(title = %event.title, "backend returned an event without an id");
        }
        Ok(event)
    }

    /// Decode a raw create response without assuming the event shape.
    pub fn parse_raw(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        parse_body(&response.body)
    }

    pub async fn list_events(&self, per_page: i64, page: i64) -> Result<Page<Event>, ApiError> {
        let response = self.client.execute(self.build_list_events(per_page, page)).await?;
        self.parse_event_page(response)
    }

    pub async fn search_events(&self, keyword: &str, per_page: i64, page: i64) -> Result<Page<Event>, ApiError> {
        debug!(keyword, dialect = %self.dialect, "searching events");
        let response = self
            .client
            .execute(self.build_search_events(keyword, per_page, page))
            .await?;
        self.parse_event_page(response)
    }

    pub async fn get_event(&self, id: i64) -> Result<Event, ApiError> {
        let response = self.client.execute(self.build_get_event(id)).await?;
        self.parse_event(response)
    }

    pub async fn create_event(&self, event: &Event) -> Result<Event, ApiError> {
        let response = self.client.execute(self.build_create_event(event)?).await?;
        self.parse_event(response)
    }

    pub async fn create_event_raw(&self, payload: &Value) -> Result<Value, ApiError> {
        let response = self.client.execute(self.build_create_event_raw(payload)?).await?;
        self.parse_raw(response)
    }

    pub async fn update_event(&self, id: i64, event: &Event) -> Result<Event, ApiError> {
        let response = self.client.execute(self.build_update_event(id, event)?).await?;
        self.parse_event(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::http::RequestBody;
    use crate::types::Organizer;

    fn client() -> ApiClient {
        ApiClient::new(ClientConfig::new("http://localhost:3000")).unwrap()
    }

    fn event() -> Event {
        Event {
            id: Some(99),
            category: "music".into(),
            title: "Jazz night".into(),
            description: "Live jazz".into(),
            location: "Old hall".into(),
            date: "2024-05-01".into(),
            time: "20:00".into(),
            pets_allowed: true,
            organizer: Organizer {
                id: 1,
                name: "Swing Club".into(),
                image: None,
                roles: None,
            },
            images: Vec::new(),
        }
    }

    fn body_json(req: &HttpRequest) -> Value {
        let text = req.body.as_ref().and_then(RequestBody::as_json).unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn list_uses_configured_dialect() {
        let client = client();
        let req = EventService::new(&client).build_list_events(3, 1);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "/events?_limit=3&_page=1");
        assert!(req.body.is_none());
    }

    #[test]
    fn managed_search_broadcasts_aliases() {
        let client = client();
        let svc = EventService::new(&client).with_dialect(Dialect::Managed);
        let req = svc.build_search_events("jazz", 10, 2);
        assert_eq!(
            req.path,
            "/events?perSize=10&page=2&keyword=jazz&title=jazz&name=jazz&q=jazz"
        );
    }

    #[test]
    fn mock_search_encodes_title() {
        let client = client();
        let req = EventService::new(&client).build_search_events("café nights", 5, 1);
        assert_eq!(req.path, "/events?_limit=5&_page=1&title=caf%C3%A9%20nights");
    }

    #[test]
    fn get_embeds_id_in_path() {
        let client = client();
        assert_eq!(EventService::new(&client).build_get_event(42).path, "/events/42");
    }

    #[test]
    fn create_payload_renames_flag_and_drops_id() {
        let client = client();
        let req = EventService::new(&client).build_create_event(&event()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/events");
        let body = body_json(&req);
        assert_eq!(body["petAllowed"], true);
        assert_eq!(body["images"], serde_json::json!([]));
        assert!(body.get("id").is_none());
        assert!(body.get("petsAllowed").is_none());
    }

    #[test]
    fn create_from_json_without_images_sends_empty_list() {
        let parsed: Event = serde_json::from_value(serde_json::json!({
            "category": "c", "title": "t", "description": "d", "location": "l",
            "date": "2024-01-01", "time": "10:00", "petsAllowed": true,
            "organizer": {"id": 1, "name": "o"}
        }))
        .unwrap();
        let client = client();
        let req = EventService::new(&client).build_create_event(&parsed).unwrap();
        let body = body_json(&req);
        assert_eq!(body["images"], serde_json::json!([]));
        assert_eq!(body["petAllowed"], true);
    }

    #[test]
    fn raw_create_passes_payload_through() {
        let client = client();
        let payload = serde_json::json!({"title": "as is", "petAllowed": false, "id": 5});
        let req = EventService::new(&client).build_create_event_raw(&payload).unwrap();
        assert_eq!(body_json(&req), payload);
    }

    #[test]
    fn update_targets_record_path() {
        let client = client();
        let req = EventService::new(&client).build_update_event(7, &event()).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "/events/7");
        assert!(body_json(&req).get("id").is_none());
    }

    #[test]
    fn parse_event_accepts_wrapped_record() {
        let client = client();
        let mut expected = event();
        expected.id = Some(3);
        let body = serde_json::json!({"data": [serde_json::to_value(&expected).unwrap()]});
        let parsed = EventService::new(&client)
            .parse_event(HttpResponse::new(200, &body.to_string()))
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parse_event_without_id_still_decodes() {
        let client = client();
        let mut record = event();
        record.id = None;
        let body = serde_json::to_string(&record).unwrap();
        let svc = EventService::new(&client);
        let parsed = svc.parse_event(HttpResponse::new(200, &body)).unwrap();
        assert_eq!(parsed.id, None);
        let page = svc
            .parse_event_page(HttpResponse::new(200, &format!("[{body}]")))
            .unwrap();
        assert_eq!(page.items, vec![record]);
    }

    #[test]
    fn parse_event_not_found() {
        let client = client();
        let err = EventService::new(&client)
            .parse_event(HttpResponse::new(404, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}
