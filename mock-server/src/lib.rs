use std::{collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

/// Keyword parameter names accepted on the paged (`perSize`) listing.
/// Port the dev binary binds when `PORT` is unset; the client's local
/// fallback base URL points here.
pub const DEFAULT_PORT: u16 = 8082;

const KEYWORD_ALIASES: [&str; 4] = ["keyword", "title", "name", "q"];

/// Page size json-server uses when only `_page` is given.
const DEFAULT_LIMIT: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: u64,
    pub category: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub pet_allowed: bool,
    pub organizer: Organizer,
    pub images: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default, alias = "petsAllowed")]
    pub pet_allowed: bool,
    pub organizer: Organizer,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Deserialize)]
pub struct OrganizerInput {
    pub name: String,
    pub image: Option<String>,
    pub address: Option<String>,
}

/// Organizer with the events it owns, as served by `GET /organizers/{id}`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerDetail {
    pub id: u64,
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    pub own_events: Vec<Event>,
}

#[derive(Clone, Debug)]
pub struct StoredImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct Store {
    pub events: BTreeMap<u64, Event>,
    pub organizers: BTreeMap<u64, Organizer>,
    pub images: Vec<StoredImage>,
}

impl Store {
    /// A small data set for running the binary locally.
    pub fn seeded() -> Self {
        let mut store = Store::default();
        let club = store.add_organizer(OrganizerInput {
            name: "Swing Society".to_string(),
            image: Some("/images/swing.png".to_string()),
            address: None,
        });
        let shelter = store.add_organizer(OrganizerInput {
            name: "Paws Shelter".to_string(),
            image: None,
            address: Some("12 Elm Street".to_string()),
        });
        let samples = [
            ("music", "Jazz Night", "Live jazz downstairs", "Blue Room", false, &club),
            ("dance", "Lindy Hop Social", "Beginner friendly", "Old Hall", false, &club),
            ("animal welfare", "Adoption Day", "Meet the dogs", "Meadow Park", true, &shelter),
        ];
        for (category, title, description, location, pet_allowed, organizer) in samples {
            store.add_event(EventInput {
                category: category.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                location: location.to_string(),
                date: "2024-06-01".to_string(),
                time: "19:00".to_string(),
                pet_allowed,
                organizer: organizer.clone(),
                images: Vec::new(),
            });
        }
        store
    }

    pub fn add_event(&mut self, input: EventInput) -> Event {
        let id = next_id(&self.events);
        let event = Event {
            id,
            category: input.category,
            title: input.title,
            description: input.description,
            location: input.location,
            date: input.date,
            time: input.time,
            pet_allowed: input.pet_allowed,
            organizer: input.organizer,
            images: input.images,
        };
        self.events.insert(id, event.clone());
        event
    }

    pub fn add_organizer(&mut self, input: OrganizerInput) -> Organizer {
        let id = next_id(&self.organizers);
        let organizer = Organizer {
            id,
            name: input.name,
            image: input.image,
            roles: None,
            address: input.address,
        };
        self.organizers.insert(id, organizer.clone());
        organizer
    }
}

fn next_id<T>(map: &BTreeMap<u64, T>) -> u64 {
    map.keys().next_back().map_or(1, |last| last + 1)
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Store::default())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", get(get_event).put(update_event))
        .route("/organizers", get(list_organizers).post(create_organizer))
        .route("/organizers/{id}", get(get_organizer).put(update_organizer))
        .route("/uploadImage", post(upload_image))
        .route("/images/{id}", get(get_image))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(store)).await
}

type Params = HashMap<String, String>;

fn number(params: &Params, key: &str) -> Option<i64> {
    params.get(key).and_then(|value| value.parse().ok())
}

/// Slice `items` for a 1-based `page` of `limit` records. Without a limit the
/// whole list is returned unless a page was requested.
fn paginate<T: Clone>(items: &[T], page: Option<i64>, limit: Option<i64>) -> Vec<T> {
    let limit = match (page, limit) {
        (_, Some(limit)) => usize::try_from(limit).unwrap_or(0),
        (Some(_), None) => DEFAULT_LIMIT,
        (None, None) => return items.to_vec(),
    };
    let page = usize::try_from(page.unwrap_or(1).max(1)).unwrap_or(1);
    items
        .iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .cloned()
        .collect()
}

fn with_total(total: usize, body: impl IntoResponse) -> Response {
    ([("x-total-count", total.to_string())], body).into_response()
}

async fn list_events(State(db): State<Db>, Query(params): Query<Params>) -> Response {
    let store = db.read().await;
    let events: Vec<Event> = store.events.values().cloned().collect();

    if params.contains_key("perSize") {
        let keyword = KEYWORD_ALIASES
            .iter()
            .find_map(|alias| params.get(*alias))
            .map(|k| k.to_lowercase());
        let matching: Vec<Event> = events
            .into_iter()
            .filter(|e| keyword.as_ref().is_none_or(|k| e.title.to_lowercase().contains(k)))
            .collect();
        let page = paginate(&matching, number(&params, "page"), number(&params, "perSize"));
        return Json(json!({ "content": page, "totalElements": matching.len() })).into_response();
    }

    let matching: Vec<Event> = events
        .into_iter()
        .filter(|e| params.get("title").is_none_or(|t| &e.title == t))
        .collect();
    let page = paginate(&matching, number(&params, "_page"), number(&params, "_limit"));
    with_total(matching.len(), Json(page))
}

async fn create_event(State(db): State<Db>, Json(input): Json<EventInput>) -> (StatusCode, Json<Event>) {
    let event = db.write().await.add_event(input);
    info!(id = event.id, title = %event.title, "event created");
    (StatusCode::CREATED, Json(event))
}

async fn get_event(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Event>, StatusCode> {
    let store = db.read().await;
    store.events.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_event(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<EventInput>,
) -> Result<Json<Event>, StatusCode> {
    let mut store = db.write().await;
    let event = store.events.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    *event = Event {
        id,
        category: input.category,
        title: input.title,
        description: input.description,
        location: input.location,
        date: input.date,
        time: input.time,
        pet_allowed: input.pet_allowed,
        organizer: input.organizer,
        images: input.images,
    };
    Ok(Json(event.clone()))
}

async fn list_organizers(State(db): State<Db>, Query(params): Query<Params>) -> Response {
    let store = db.read().await;
    let organizers: Vec<Organizer> = store.organizers.values().cloned().collect();
    let page = paginate(&organizers, number(&params, "_page"), number(&params, "_limit"));
    with_total(organizers.len(), Json(page))
}

async fn create_organizer(
    State(db): State<Db>,
    Json(input): Json<OrganizerInput>,
) -> (StatusCode, Json<Organizer>) {
    let organizer = db.write().await.add_organizer(input);
    info!(id = organizer.id, name = %organizer.name, "organizer created");
    (StatusCode::CREATED, Json(organizer))
}

async fn get_organizer(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<OrganizerDetail>, StatusCode> {
    let store = db.read().await;
    let organizer = store.organizers.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let own_events = store
        .events
        .values()
        .filter(|e| e.organizer.id == id)
        .cloned()
        .collect();
    Ok(Json(OrganizerDetail {
        id,
        name: organizer.name.clone(),
        image: organizer.image.clone().unwrap_or_default(),
        roles: organizer.roles.clone(),
        own_events,
    }))
}

async fn update_organizer(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<OrganizerInput>,
) -> Result<Json<Organizer>, StatusCode> {
    let mut store = db.write().await;
    let organizer = store.organizers.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    organizer.name = input.name;
    if input.image.is_some() {
        organizer.image = input.image;
    }
    if input.address.is_some() {
        organizer.address = input.address;
    }
    Ok(Json(organizer.clone()))
}

/// Store the multipart `image` field and answer with its URL path as text.
async fn upload_image(State(db): State<Db>, mut multipart: Multipart) -> Result<(StatusCode, String), StatusCode> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "malformed multipart body");
        StatusCode::BAD_REQUEST
    })? {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;

        let mut store = db.write().await;
        store.images.push(StoredImage {
            file_name: file_name.clone(),
            content_type,
            bytes: bytes.to_vec(),
        });
        let id = store.images.len();
        info!(id, file = %file_name, size = bytes.len(), "image stored");
        return Ok((StatusCode::CREATED, format!("/images/{id}")));
    }
    Err(StatusCode::BAD_REQUEST)
}

async fn get_image(State(db): State<Db>, Path(id): Path<usize>) -> Result<Response, StatusCode> {
    let store = db.read().await;
    let image = id
        .checked_sub(1)
        .and_then(|index| store.images.get(index))
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(([(header::CONTENT_TYPE, image.content_type.clone())], image.bytes.clone()).into_response())
}
