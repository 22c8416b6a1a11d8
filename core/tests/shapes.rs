//! Response-shape and status handling against a scripted backend.
//!
//! Each test mounts one canned response on a wiremock server and checks what
//! the services make of it: wrapped lists, unknown shapes, error statuses and
//! the exact query the server received.

use events_core::{ApiClient, ApiError, ClientConfig, Dialect, EventService, OrganizerService, Pagination};
use serde_json::json;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn event_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id, "category": "music", "title": title, "description": "d",
        "location": "l", "date": "2024-01-01", "time": "20:00", "petAllowed": false,
        "organizer": {"id": 1, "name": "Swing Society"}, "images": []
    })
}

fn client_for(server: &MockServer, dialect: Dialect) -> ApiClient {
    ApiClient::new(ClientConfig::new(&server.uri()).with_dialect(dialect)).unwrap()
}

#[tokio::test]
async fn managed_search_sends_every_alias() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("perSize", "10"))
        .and(query_param("page", "2"))
        .and(query_param("keyword", "jazz"))
        .and(query_param("title", "jazz"))
        .and(query_param("name", "jazz"))
        .and(query_param("q", "jazz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [event_json(1, "Jazz Night")],
            "totalElements": 11
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Dialect::Managed);
    let page = EventService::new(&client).search_events("jazz", 10, 2).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "Jazz Night");
    assert_eq!(page.total_count, Some(11));
}

#[tokio::test]
async fn data_wrapped_list_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("_limit", "5"))
        .and(query_param("_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [event_json(1, "A"), event_json(2, "B")]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Dialect::Mock);
    let page = EventService::new(&client).list_events(5, 1).await.unwrap();
    let titles: Vec<_> = page.items.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["A", "B"]);
    assert_eq!(page.total_count, None);
}

#[tokio::test]
async fn unknown_list_shape_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(&server)
        .await;

    let client = client_for(&server, Dialect::Mock);
    let organizers = OrganizerService::new(&client);
    assert!(organizers.list_all_organizers().await.unwrap().is_empty());
    assert!(organizers.list_organizers(Pagination::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn html_body_degrades_to_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizers"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html><body>maintenance</body></html>"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Dialect::Mock);
    let organizers = OrganizerService::new(&client);
    assert!(organizers.list_all_organizers().await.unwrap().is_empty());
    assert!(organizers.list_organizers(Pagination::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn organizer_defaults_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizers"))
        .and(query_param("_page", "1"))
        .and(query_param("_limit", "50"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "1")
                .set_body_json(json!([{"id": 1, "name": "Swing Society", "roles": ["ROLE_ORGANIZER"]}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Dialect::Managed);
    let page = OrganizerService::new(&client)
        .list_organizers(Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, Some(1));
    assert_eq!(page.items[0].roles.as_deref(), Some(&["ROLE_ORGANIZER".to_string()][..]));
}

#[tokio::test]
async fn accept_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events/3"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json(3, "C")))
        .mount(&server)
        .await;

    let client = client_for(&server, Dialect::Mock);
    let event = EventService::new(&client).get_event(3).await.unwrap();
    assert_eq!(event.id, Some(3));
}

#[tokio::test]
async fn server_errors_surface_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/organizers"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server, Dialect::Mock);
    let err = OrganizerService::new(&client)
        .create_organizer(&events_core::NewOrganizer {
            name: "X".to_string(),
            image: "y".to_string(),
        })
        .await
        .unwrap_err();
    match err {
        ApiError::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "database down");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }

    let err = EventService::new(&client).list_events(1, 1).await.unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus { status: 503, .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn upload_reads_json_reference() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uploadImage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "https://cdn/img/9.png"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Dialect::Mock);
    let reference = OrganizerService::new(&client)
        .upload_image(events_core::ImageUpload::new("9.png", "image/png", vec![0x89, 0x50]))
        .await
        .unwrap();
    assert_eq!(reference, "https://cdn/img/9.png");
}
