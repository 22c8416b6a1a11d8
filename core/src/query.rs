//! Query-string building for the two backend dialects.
//!
//! # Design
//! The mock JSON server and the managed backend spell pagination and
//! filtering differently. `Dialect` is the configuration-selected strategy;
//! every variant answers the same questions (which pagination pairs, which
//! filter pairs) so the services never branch on backend kind themselves.
//!
//! Everything here is pure and infallible. Out-of-range values (zero,
//! negative) are emitted as given; validating them is the caller's job.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Organizer listing defaults applied when the caller omits a value.
pub const DEFAULT_ORGANIZER_PAGE: i64 = 1;
pub const DEFAULT_ORGANIZER_LIMIT: i64 = 50;

/// Parameter names the managed backend might use for a keyword filter. The
/// keyword is sent under all of them, in this order.
pub const KEYWORD_ALIASES: [&str; 4] = ["keyword", "title", "name", "q"];

/// A query parameter whose value is already percent-encoded.
pub type QueryParam = (&'static str, String);

/// Backend query-parameter convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `_limit` / `_page` pagination, `title=` filter.
    #[default]
    Mock,
    /// `perSize` / `page` pagination, keyword broadcast under every alias.
    Managed,
}

impl Dialect {
    pub fn size_param(self) -> &'static str {
        match self {
            Dialect::Mock => "_limit",
            Dialect::Managed => "perSize",
        }
    }

    pub fn page_param(self) -> &'static str {
        match self {
            Dialect::Mock => "_page",
            Dialect::Managed => "page",
        }
    }

    /// Size first, then page.
    pub fn pagination(self, per_page: i64, page: i64) -> Vec<QueryParam> {
        vec![
            (self.size_param(), per_page.to_string()),
            (self.page_param(), page.to_string()),
        ]
    }

    /// Filter pairs for `keyword`. Only the empty string produces no filter;
    /// any other value, whitespace included, is sent as given.
    pub fn keyword(self, keyword: &str) -> Vec<QueryParam> {
        if keyword.is_empty() {
            return Vec::new();
        }
        let encoded = encode_value(keyword);
        match self {
            Dialect::Mock => vec![("title", encoded)],
            Dialect::Managed => KEYWORD_ALIASES
                .iter()
                .map(|alias| (*alias, encoded.clone()))
                .collect(),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Mock => write!(f, "mock"),
            Dialect::Managed => write!(f, "managed"),
        }
    }
}

impl FromStr for Dialect {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" | "json-server" => Ok(Dialect::Mock),
            "managed" | "backend" => Ok(Dialect::Managed),
            other => Err(ApiError::Config(format!("unknown backend dialect: {other}"))),
        }
    }
}

/// Caller-facing pagination request. Missing fields take the defaults of the
/// entity being listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// `(page, limit)` with the given defaults filled in.
    pub fn resolve(self, default_page: i64, default_limit: i64) -> (i64, i64) {
        (
            self.page.unwrap_or(default_page),
            self.limit.unwrap_or(default_limit),
        )
    }
}

/// Organizer pagination: `_page` then `_limit`, with the organizer defaults.
pub fn organizer_pagination(pagination: Pagination) -> Vec<QueryParam> {
    let (page, limit) = pagination.resolve(DEFAULT_ORGANIZER_PAGE, DEFAULT_ORGANIZER_LIMIT);
    vec![("_page", page.to_string()), ("_limit", limit.to_string())]
}

/// Percent-encode a query value, keeping only RFC 3986 unreserved characters.
pub fn encode_value(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Join `resource` and `params` into a request path.
pub fn build_path(resource: &str, params: &[QueryParam]) -> String {
    if params.is_empty() {
        return resource.to_string();
    }
    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{resource}?{query}")
}
