//! Marketplace API gateway.
//!
//! Wraps outbound requests to the course/auth API: builds absolute URLs,
//! injects the bearer token from the session store, unwraps envelope
//! responses, and normalizes every failure mode into [`ApiError`].
//!
//! The navigation layer talks to the [`StorefrontApi`] trait, not to the
//! concrete client, so tests and the demo can swap in an in-memory
//! implementation.

use crate::types::{Course, CourseId, CoursesPage, User};
use std::future::Future;
use std::pin::Pin;

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{ApiEnvelope, CourseQuery, LoginData, LoginRequest, RegisterRequest, SortOrder};

/// Boxed future returned by [`StorefrontApi`] methods
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// The typed operations of the marketplace API
///
/// Abstraction over the remote service, in the shape the navigation layer
/// consumes. Implementations: [`ApiClient`] (HTTP) and
/// [`crate::mocks::MockStorefrontApi`] (in-memory).
pub trait StorefrontApi: Send + Sync {
    /// `POST /api/auth/register`
    fn register(&self, request: RegisterRequest) -> BoxFuture<Result<(), ApiError>>;

    /// `POST /api/auth/login`
    fn login(&self, request: LoginRequest) -> BoxFuture<Result<LoginData, ApiError>>;

    /// `GET /api/auth/me` (bearer-authenticated)
    fn me(&self) -> BoxFuture<Result<User, ApiError>>;

    /// `POST /api/auth/logout` (bearer-authenticated)
    fn logout(&self) -> BoxFuture<Result<(), ApiError>>;

    /// `GET /api/courses` with optional filter/sort/pagination
    fn courses(&self, query: CourseQuery) -> BoxFuture<Result<CoursesPage, ApiError>>;

    /// `GET /api/public/courses/{id}`
    fn course_detail(&self, id: CourseId) -> BoxFuture<Result<Course, ApiError>>;

    /// `GET /api/courses/purchased/all` (bearer-authenticated)
    fn purchased_courses(&self, page: u32, limit: u32) -> BoxFuture<Result<CoursesPage, ApiError>>;
}
