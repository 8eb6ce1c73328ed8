//! Wire types for the marketplace API.
//!
//! Every endpoint wraps its payload in the same envelope; request bodies and
//! the course-list query live here alongside it.

use super::error::ApiError;
use crate::types::{Level, Session, User};
use serde::{Deserialize, Serialize};

/// The `{success, message, data, timestamp}` wrapper every API response uses
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    /// Whether the service reports the operation as successful
    pub success: bool,
    /// Human-readable outcome message
    #[serde(default)]
    pub message: String,
    /// Payload; must not be trusted when `success` is false
    #[serde(default)]
    pub data: Option<T>,
    /// Server timestamp, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload of a successful envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] carrying the envelope message when
    /// `success` is false (the payload is untrusted then, even if present),
    /// and [`ApiError::Parse`] when a successful envelope is missing its
    /// payload.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Api {
                status: None,
                message: self.message,
            });
        }
        self.data
            .ok_or_else(|| ApiError::Parse("envelope missing data".to_string()))
    }

    /// Check a payload-less envelope for success.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] carrying the envelope message when
    /// `success` is false.
    pub fn into_ack(self) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::Api {
                status: None,
                message: self.message,
            })
        }
    }
}

/// Body of `POST /api/auth/login`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Body of `POST /api/auth/register`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// Registration role (API value, e.g. `student`)
    pub role: String,
}

/// Payload of a successful login
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginData {
    /// The authenticated user
    pub user: User,
    /// Bearer token for subsequent requests
    pub token: String,
}

impl From<LoginData> for Session {
    fn from(data: LoginData) -> Self {
        Self {
            user: data.user,
            token: data.token,
        }
    }
}

/// Sort direction for course listings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filter/sort/pagination parameters for `GET /api/courses`
///
/// Unset fields are omitted from the query string entirely.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CourseQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Category filter
    pub category: Option<String>,
    /// Free-text search
    pub search: Option<String>,
    /// Difficulty filter
    pub level: Option<Level>,
    /// Minimum price filter
    pub min_price: Option<f64>,
    /// Maximum price filter
    pub max_price: Option<f64>,
    /// Sort key
    pub sort_by: Option<String>,
    /// Sort direction
    pub sort_order: Option<SortOrder>,
}

impl CourseQuery {
    /// Empty query (server defaults apply)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the category filter
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the free-text search filter
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Set the difficulty filter
    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Serialize set fields into query pairs, in wire order.
    ///
    /// Unset fields are omitted; nothing else is ever emitted.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(level) = self.level {
            pairs.push(("level", level.as_str().to_string()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("minPrice", min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("maxPrice", max_price.to_string()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy", sort_by.clone()));
        }
        if let Some(sort_order) = self.sort_order {
            pairs.push(("sortOrder", sort_order.as_str().to_string()));
        }
        pairs
    }
}
