//! Canonical data model for events and organizers.
//!
//! # Design
//! These types are what callers work with regardless of which backend is
//! behind the base URL. Backend spellings are absorbed here with serde
//! attributes (`petAllowed` is read as an alias of `petsAllowed`) or by the
//! dedicated submission payloads below. The mock-server crate defines its own
//! copies; integration tests catch schema drift between the two.

use serde::{Deserialize, Serialize};

/// A community event as returned by the backend.
///
/// `id` is assigned by the server. It is `None` only for events the caller
/// has not saved yet, and it is never sent on create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub category: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub time: String,
    #[serde(alias = "petAllowed")]
    pub pets_allowed: bool,
    pub organizer: Organizer,
    #[serde(default)]
    pub images: Vec<String>,
}

/// An organizer as embedded in events and returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organizer {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

/// A single organizer with its image and the events it owns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerDetail {
    pub id: i64,
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub own_events: Vec<Event>,
}

impl OrganizerDetail {
    /// The organizer part of the detail record.
    pub fn organizer(&self) -> Organizer {
        Organizer {
            id: self.id,
            name: self.name.clone(),
            image: Some(self.image.clone()),
            roles: self.roles.clone(),
        }
    }
}

/// Event body in the shape the backend accepts on create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
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

impl From<&Event> for EventPayload {
    fn from(event: &Event) -> Self {
        Self {
            category: event.category.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            pet_allowed: event.pets_allowed,
            organizer: event.organizer.clone(),
            images: event.images.clone(),
        }
    }
}

/// Request payload for creating an organizer with an uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOrganizer {
    pub name: String,
    pub image: String,
}

/// Request payload for registering an organization. Posted to the organizer
/// collection; `address` is omitted from the JSON when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOrganization {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// An image file to upload as multipart form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }
}

/// One page of a list result.
///
/// `total_count` is known only when the backend reports it, either through
/// the `X-Total-Count` header or a `totalElements` body field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: Option<u64>,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
