//! HTTP implementation of the marketplace API gateway

use super::error::ApiError;
use super::types::{ApiEnvelope, CourseQuery, LoginData, LoginRequest, RegisterRequest};
use super::{BoxFuture, StorefrontApi};
use crate::config::ApiConfig;
use crate::session::SessionStore;
use crate::types::{Course, CourseId, CoursesPage, User};
use reqwest::{Client, Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Marketplace API client
///
/// One instance per process; cheap to clone. The session store is consulted
/// at request time so that login/logout take effect on the next request, and
/// is never written by the client (the navigation layer owns session
/// lifecycle).
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    sessions: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client for the configured base URL
    ///
    /// Trailing slashes on the base URL are trimmed so path concatenation is
    /// uniform.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &ApiConfig, sessions: Arc<SessionStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sessions,
        })
    }

    /// Perform a request and unwrap the response envelope
    ///
    /// - Merges default headers (`Accept`, `Content-Type: application/json`)
    ///   with caller headers, caller's winning on conflict.
    /// - Injects `Authorization: Bearer <token>` when the session store holds
    ///   a token.
    /// - On a 2xx response, parses the body as an envelope.
    /// - On a non-2xx response, surfaces the envelope message when one
    ///   parses, else a generic HTTP-status message.
    #[tracing::instrument(skip(self, body, query, headers))]
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(&str, String)],
        headers: &[(&str, &str)],
    ) -> Result<ApiEnvelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method, &url)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json");

        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(token) = self.sessions.token() {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::debug!(error = %e, "Transport failure");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if status.is_success() {
            serde_json::from_slice::<ApiEnvelope<T>>(&bytes)
                .map_err(|e| ApiError::Parse(e.to_string()))
        } else {
            Err(Self::status_error(status, &bytes))
        }
    }

    /// Normalize a non-2xx response into an [`ApiError::Api`]
    fn status_error(status: StatusCode, bytes: &[u8]) -> ApiError {
        let message = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(bytes)
            .ok()
            .map(|envelope| envelope.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

        tracing::debug!(status = status.as_u16(), %message, "API reported failure");
        ApiError::Api {
            status: Some(status.as_u16()),
            message,
        }
    }

    async fn register_inner(&self, request: RegisterRequest) -> Result<(), ApiError> {
        self.request::<serde_json::Value, _>(
            Method::POST,
            "/api/auth/register",
            Some(&request),
            &[],
            &[],
        )
        .await?
        .into_ack()
    }

    async fn login_inner(&self, request: LoginRequest) -> Result<LoginData, ApiError> {
        self.request::<LoginData, _>(Method::POST, "/api/auth/login", Some(&request), &[], &[])
            .await?
            .into_data()
    }

    async fn me_inner(&self) -> Result<User, ApiError> {
        self.request::<User, ()>(Method::GET, "/api/auth/me", None, &[], &[])
            .await?
            .into_data()
    }

    async fn logout_inner(&self) -> Result<(), ApiError> {
        self.request::<serde_json::Value, ()>(Method::POST, "/api/auth/logout", None, &[], &[])
            .await?
            .into_ack()
    }

    async fn courses_inner(&self, query: CourseQuery) -> Result<CoursesPage, ApiError> {
        let pairs = query.to_pairs();
        self.request::<CoursesPage, ()>(Method::GET, "/api/courses", None, &pairs, &[])
            .await?
            .into_data()
    }

    async fn course_detail_inner(&self, id: CourseId) -> Result<Course, ApiError> {
        let path = format!("/api/public/courses/{id}");
        self.request::<Course, ()>(Method::GET, &path, None, &[], &[])
            .await?
            .into_data()
    }

    async fn purchased_inner(&self, page: u32, limit: u32) -> Result<CoursesPage, ApiError> {
        let pairs = [("page", page.to_string()), ("limit", limit.to_string())];
        self.request::<CoursesPage, ()>(Method::GET, "/api/courses/purchased/all", None, &pairs, &[])
            .await?
            .into_data()
    }
}

impl StorefrontApi for ApiClient {
    fn register(&self, request: RegisterRequest) -> BoxFuture<Result<(), ApiError>> {
        let client = self.clone();
        Box::pin(async move { client.register_inner(request).await })
    }

    fn login(&self, request: LoginRequest) -> BoxFuture<Result<LoginData, ApiError>> {
        let client = self.clone();
        Box::pin(async move { client.login_inner(request).await })
    }

    fn me(&self) -> BoxFuture<Result<User, ApiError>> {
        let client = self.clone();
        Box::pin(async move { client.me_inner().await })
    }

    fn logout(&self) -> BoxFuture<Result<(), ApiError>> {
        let client = self.clone();
        Box::pin(async move { client.logout_inner().await })
    }

    fn courses(&self, query: CourseQuery) -> BoxFuture<Result<CoursesPage, ApiError>> {
        let client = self.clone();
        Box::pin(async move { client.courses_inner(query).await })
    }

    fn course_detail(&self, id: CourseId) -> BoxFuture<Result<Course, ApiError>> {
        let client = self.clone();
        Box::pin(async move { client.course_detail_inner(id).await })
    }

    fn purchased_courses(&self, page: u32, limit: u32) -> BoxFuture<Result<CoursesPage, ApiError>> {
        let client = self.clone();
        Box::pin(async move { client.purchased_inner(page, limit).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slashes_are_trimmed() {
        let config = ApiConfig {
            base_url: "http://localhost:3007///".to_string(),
            request_timeout: 5,
        };
        let client = ApiClient::new(&config, Arc::new(SessionStore::in_memory()));
        assert!(client.is_ok_and(|c| c.base_url == "http://localhost:3007"));
    }
}
