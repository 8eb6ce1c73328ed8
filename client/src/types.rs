//! Domain types for the storefront client.
//!
//! These types mirror the records served by the marketplace API. They are
//! read-only to the navigation layer: courses come from the API gateway and
//! are never mutated locally.

use serde::{Deserialize, Serialize};

/// Canonical course identifier.
///
/// The marketplace API identifies courses by an opaque string (wire field
/// `_id`). Older API iterations used numeric ids; those are not supported.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseId(String);

impl CourseId {
    /// Creates a `CourseId` from a raw identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CourseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Course difficulty level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// No prior experience assumed
    Beginner,
    /// Some familiarity with the subject
    Intermediate,
    /// For experienced practitioners
    Advanced,
}

impl Level {
    /// Wire/display value for the level
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of curriculum entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurriculumItemKind {
    /// Video lesson
    Video,
    /// Written lesson
    Text,
    /// Knowledge check
    Quiz,
}

/// A single entry in a course curriculum
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumItem {
    /// Entry title
    pub title: String,
    /// Entry kind (video, text, quiz)
    #[serde(rename = "type")]
    pub kind: CurriculumItemKind,
    /// Length in minutes
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    /// Entry content or content reference
    pub content: String,
    /// Display ordering key (ascending)
    pub order: u32,
}

/// A course as served by the marketplace API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Canonical identifier (wire field `_id`)
    #[serde(rename = "_id")]
    pub id: CourseId,
    /// Course title
    pub title: String,
    /// Long-form description
    pub description: String,
    /// Instructor display name
    pub instructor: String,
    /// Price in dollars (non-negative)
    pub price: f64,
    /// Category label
    pub category: String,
    /// Total length in minutes
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    /// Difficulty level
    pub level: Level,
    /// Thumbnail image URL
    pub thumbnail: String,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Prerequisites
    #[serde(default)]
    pub requirements: Vec<String>,
    /// What the student will learn
    #[serde(default)]
    pub learning_outcomes: Vec<String>,
    /// Curriculum entries (unordered on the wire)
    #[serde(default)]
    pub curriculum: Vec<CurriculumItem>,
    /// Whether the course is visible in the catalog
    pub is_published: bool,
    /// Creation timestamp (server-formatted)
    pub created_at: String,
    /// Last-update timestamp (server-formatted)
    pub updated_at: String,
}

impl Course {
    /// Curriculum entries in display order (ascending `order`)
    #[must_use]
    pub fn sorted_curriculum(&self) -> Vec<&CurriculumItem> {
        let mut items: Vec<&CurriculumItem> = self.curriculum.iter().collect();
        items.sort_by_key(|item| item.order);
        items
    }
}

/// An authenticated user profile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address (also the billing identity)
    pub email: String,
    /// Server-side role label
    pub role: String,
    /// Last login timestamp (server-formatted)
    pub last_login_at: String,
}

/// The authenticated user plus bearer token, persisted client-side
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The authenticated user
    pub user: User,
    /// Bearer token for authenticated requests
    pub token: String,
}

impl Session {
    /// Whether this session carries a usable token
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Registration role choices
///
/// The closed set of roles a new account can register with. API values
/// follow the `lower_snake` convention of the auth service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// A learner
    Student,
    /// An industry practitioner
    ItProfessional,
    /// An academic
    Professor,
    /// An independent professional
    Freelancer,
}

impl Role {
    /// All selectable roles, in display order
    pub const ALL: [Role; 4] = [
        Role::Student,
        Role::ItProfessional,
        Role::Professor,
        Role::Freelancer,
    ];

    /// Value sent to the registration endpoint
    #[must_use]
    pub const fn api_value(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::ItProfessional => "it_professional",
            Self::Professor => "professor",
            Self::Freelancer => "freelancer",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::ItProfessional => "IT Professional",
            Self::Professor => "Professor",
            Self::Freelancer => "Freelancer",
        }
    }
}

/// Paging metadata returned alongside course lists
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number
    pub current_page: u32,
    /// Total number of pages
    pub total_pages: u32,
    /// Total number of courses across all pages
    pub total_courses: u32,
    /// Whether a next page exists
    pub has_next: bool,
    /// Whether a previous page exists
    pub has_prev: bool,
}

/// One page of courses plus paging metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoursesPage {
    /// Courses on this page
    pub courses: Vec<Course>,
    /// Paging metadata
    pub pagination: Pagination,
}
