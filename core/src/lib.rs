//! Async data-access layer for the events API.
//!
//! # Overview
//! Turns caller requests (page, page size, keyword, record to save) into
//! HTTP requests for either the mock JSON server or the managed backend, and
//! turns whatever response shape comes back into the canonical `Event` /
//! `Organizer` model.
//!
//! # Design
//! - `ApiClient` is the single transport, built once from `ClientConfig` and
//!   borrowed by each service.
//! - Each operation is split into `build_*` (produces request), `parse_*`
//!   (consumes response) and an async method that runs both, so the I/O
//!   boundary stays explicit and the pure parts are testable without a
//!   network.
//! - Backend query conventions live in `query::Dialect`; response shapes are
//!   flattened by `normalize`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod normalize;
pub mod organizers;
pub mod query;
pub mod transport;
pub mod types;

pub use config::ClientConfig;
pub use error::ApiError;
pub use events::EventService;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use organizers::OrganizerService;
pub use query::{Dialect, Pagination};
pub use transport::ApiClient;
pub use types::{
    Event, EventPayload, ImageUpload, NewOrganization, NewOrganizer, Organizer, OrganizerDetail, Page,
};
