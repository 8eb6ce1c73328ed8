//! In-memory implementation of the marketplace API.
//!
//! Used by the demo binary and the integration tests: a small catalog plus
//! canned accounts, behaving like the remote service (envelope semantics,
//! auth failures, pagination) without a network.

use crate::api::{ApiError, BoxFuture, CourseQuery, LoginData, LoginRequest, RegisterRequest, StorefrontApi};
use crate::types::{Course, CourseId, CoursesPage, Level, Pagination, User};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

#[derive(Clone)]
struct Account {
    password: String,
    user: User,
}

/// In-memory marketplace API
///
/// Login hands out a fresh mock token; bearer state is tracked internally
/// (login sets it, logout clears it) since no real requests flow.
#[derive(Clone)]
pub struct MockStorefrontApi {
    latency: Duration,
    catalog: Arc<RwLock<Vec<Course>>>,
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    current: Arc<Mutex<Option<User>>>,
    purchased: Arc<RwLock<Vec<CourseId>>>,
}

impl MockStorefrontApi {
    /// Empty mock: no courses, no accounts
    #[must_use]
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
            catalog: Arc::new(RwLock::new(Vec::new())),
            accounts: Arc::new(Mutex::new(HashMap::new())),
            current: Arc::new(Mutex::new(None)),
            purchased: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Mock pre-loaded with a small VR-training catalog
    #[must_use]
    pub fn with_sample_catalog() -> Self {
        let mock = Self::new();
        for course in sample_catalog() {
            mock.add_course(course);
        }
        mock
    }

    /// Simulate network latency on every operation
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Register a known account
    #[must_use]
    pub fn with_account(self, name: &str, email: &str, password: &str, role: &str) -> Self {
        let user = User {
            id: format!("u-{}", uuid::Uuid::new_v4()),
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            last_login_at: chrono::Utc::now().to_rfc3339(),
        };
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                email.to_string(),
                Account {
                    password: password.to_string(),
                    user,
                },
            );
        self
    }

    /// Mark a course as purchased by the signed-in account
    #[must_use]
    pub fn with_purchased(self, id: CourseId) -> Self {
        self.purchased
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(id);
        self
    }

    /// Add a course to the catalog
    pub fn add_course(&self, course: Course) {
        self.catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(course);
    }

    fn unauthorized() -> ApiError {
        ApiError::Api {
            status: Some(401),
            message: "Unauthorized".to_string(),
        }
    }

    fn signed_in_user(&self) -> Option<User> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn matching_courses(&self, query: &CourseQuery) -> Vec<Course> {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|course| course.is_published)
            .filter(|course| {
                query.category.as_ref().is_none_or(|c| &course.category == c)
            })
            .filter(|course| query.level.is_none_or(|l| course.level == l))
            .filter(|course| {
                query.search.as_ref().is_none_or(|needle| {
                    course
                        .title
                        .to_lowercase()
                        .contains(&needle.to_lowercase())
                })
            })
            .filter(|course| query.min_price.is_none_or(|p| course.price >= p))
            .filter(|course| query.max_price.is_none_or(|p| course.price <= p))
            .cloned()
            .collect()
    }
}

impl Default for MockStorefrontApi {
    fn default() -> Self {
        Self::new()
    }
}

/// Slice a course list into one page plus paging metadata
fn paginate(courses: Vec<Course>, page: u32, limit: u32) -> CoursesPage {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = u32::try_from(courses.len()).unwrap_or(u32::MAX);
    let total_pages = total.div_ceil(limit).max(1);

    let start = ((page - 1) * limit) as usize;
    let selected: Vec<Course> = courses
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .collect();

    CoursesPage {
        courses: selected,
        pagination: Pagination {
            current_page: page,
            total_pages,
            total_courses: total,
            has_next: page < total_pages,
            has_prev: page > 1,
        },
    }
}

impl StorefrontApi for MockStorefrontApi {
    fn register(&self, request: RegisterRequest) -> BoxFuture<Result<(), ApiError>> {
        let mock = self.clone();
        Box::pin(async move {
            tokio::time::sleep(mock.latency).await;

            let mut accounts = mock.accounts.lock().unwrap_or_else(PoisonError::into_inner);
            if accounts.contains_key(&request.email) {
                return Err(ApiError::Api {
                    status: Some(409),
                    message: "Email already registered".to_string(),
                });
            }

            let user = User {
                id: format!("u-{}", uuid::Uuid::new_v4()),
                name: request.name.clone(),
                email: request.email.clone(),
                role: request.role.clone(),
                last_login_at: chrono::Utc::now().to_rfc3339(),
            };
            accounts.insert(
                request.email,
                Account {
                    password: request.password,
                    user,
                },
            );
            Ok(())
        })
    }

    fn login(&self, request: LoginRequest) -> BoxFuture<Result<LoginData, ApiError>> {
        let mock = self.clone();
        Box::pin(async move {
            tokio::time::sleep(mock.latency).await;

            let account = mock
                .accounts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&request.email)
                .cloned();

            match account {
                Some(account) if account.password == request.password => {
                    let mut user = account.user;
                    user.last_login_at = chrono::Utc::now().to_rfc3339();

                    *mock.current.lock().unwrap_or_else(PoisonError::into_inner) =
                        Some(user.clone());

                    Ok(LoginData {
                        user,
                        token: format!("mock-token-{}", uuid::Uuid::new_v4()),
                    })
                },
                _ => Err(ApiError::Api {
                    status: Some(401),
                    message: "Invalid credentials".to_string(),
                }),
            }
        })
    }

    fn me(&self) -> BoxFuture<Result<User, ApiError>> {
        let mock = self.clone();
        Box::pin(async move {
            tokio::time::sleep(mock.latency).await;
            mock.signed_in_user().ok_or_else(Self::unauthorized)
        })
    }

    fn logout(&self) -> BoxFuture<Result<(), ApiError>> {
        let mock = self.clone();
        Box::pin(async move {
            tokio::time::sleep(mock.latency).await;
            *mock.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
            Ok(())
        })
    }

    fn courses(&self, query: CourseQuery) -> BoxFuture<Result<CoursesPage, ApiError>> {
        let mock = self.clone();
        Box::pin(async move {
            tokio::time::sleep(mock.latency).await;

            let matching = mock.matching_courses(&query);
            Ok(paginate(
                matching,
                query.page.unwrap_or(1),
                query.limit.unwrap_or(10),
            ))
        })
    }

    fn course_detail(&self, id: CourseId) -> BoxFuture<Result<Course, ApiError>> {
        let mock = self.clone();
        Box::pin(async move {
            tokio::time::sleep(mock.latency).await;

            mock.catalog
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .find(|course| course.id == id)
                .cloned()
                .ok_or_else(|| ApiError::Api {
                    status: Some(404),
                    message: "Course not found".to_string(),
                })
        })
    }

    fn purchased_courses(&self, page: u32, limit: u32) -> BoxFuture<Result<CoursesPage, ApiError>> {
        let mock = self.clone();
        Box::pin(async move {
            tokio::time::sleep(mock.latency).await;

            if mock.signed_in_user().is_none() {
                return Err(Self::unauthorized());
            }

            let purchased = mock
                .purchased
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            let owned: Vec<Course> = mock
                .catalog
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .filter(|course| purchased.contains(&course.id))
                .cloned()
                .collect();

            Ok(paginate(owned, page, limit))
        })
    }
}

/// A small published catalog in the marketplace's wire shape
#[must_use]
pub fn sample_catalog() -> Vec<Course> {
    let mk = |id: &str, title: &str, price: f64, category: &str, minutes: u32, level: Level| Course {
        id: CourseId::new(id),
        title: title.to_string(),
        description: format!("{title}: immersive VR training with guided practice."),
        instructor: "Dana Flores".to_string(),
        price,
        category: category.to_string(),
        duration_minutes: minutes,
        level,
        thumbnail: format!("https://cdn.skillsphere.example/{id}.png"),
        tags: vec!["vr".to_string(), category.to_string()],
        requirements: vec!["VR headset recommended".to_string()],
        learning_outcomes: vec![format!("Apply {category} techniques under pressure")],
        curriculum: Vec::new(),
        is_published: true,
        created_at: "2025-01-01T00:00:00Z".to_string(),
        updated_at: "2025-03-01T00:00:00Z".to_string(),
    };

    vec![
        mk(
            "c-negotiation",
            "Negotiation Essentials in VR",
            49.99,
            "negotiation",
            180,
            Level::Beginner,
        ),
        mk(
            "c-public-speaking",
            "Public Speaking Under Pressure",
            79.99,
            "communication",
            240,
            Level::Intermediate,
        ),
        mk(
            "c-leadership",
            "Leadership Presence Masterclass",
            129.99,
            "leadership",
            360,
            Level::Advanced,
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_requires_known_credentials() {
        let mock = MockStorefrontApi::with_sample_catalog().with_account(
            "Ada",
            "ada@example.com",
            "secret123",
            "student",
        );

        let bad = mock
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert_eq!(bad.unwrap_err().to_string(), "Invalid credentials");

        let good = mock
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();
        assert!(good.token.starts_with("mock-token-"));
    }

    #[tokio::test]
    async fn purchased_requires_sign_in() {
        let mock = MockStorefrontApi::with_sample_catalog();
        let result = mock.purchased_courses(1, 10).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn catalog_filters_and_paginates() {
        let mock = MockStorefrontApi::with_sample_catalog();

        let all = mock.courses(CourseQuery::new()).await.unwrap();
        assert_eq!(all.courses.len(), 3);
        assert_eq!(all.pagination.total_courses, 3);
        assert!(!all.pagination.has_next);

        let paged = mock
            .courses(CourseQuery::new().page(2).limit(2))
            .await
            .unwrap();
        assert_eq!(paged.courses.len(), 1);
        assert!(paged.pagination.has_prev);

        let searched = mock
            .courses(CourseQuery::new().search("leadership"))
            .await
            .unwrap();
        assert_eq!(searched.courses.len(), 1);
        assert_eq!(searched.courses[0].id, CourseId::new("c-leadership"));
    }

    #[tokio::test]
    async fn course_detail_unknown_id_is_not_found() {
        let mock = MockStorefrontApi::with_sample_catalog();
        let result = mock.course_detail(CourseId::new("missing")).await;
        assert_eq!(result.unwrap_err().to_string(), "Course not found");
    }
}
