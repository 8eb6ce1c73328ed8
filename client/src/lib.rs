//! # SkillSphere Storefront Client
//!
//! The presentation-layer controller of the SkillSphere course marketplace:
//! browse courses, view detail, check out, pay, register/sign in, and view
//! purchased courses. Rendering is out of scope; this crate owns the state
//! any front end would render.
//!
//! ## Architecture
//!
//! Unidirectional data flow on top of `skillsphere-core`/`skillsphere-runtime`:
//!
//! - [`session::SessionStore`] — the one persisted client record (user + token)
//! - [`api::ApiClient`] — the HTTP gateway (token attachment, envelope
//!   unwrapping, error normalization), behind the [`api::StorefrontApi`] trait
//! - [`navigation::NavigationReducer`] — the page state machine, including
//!   the checkout/payment sub-flow
//! - [`validate`] — synchronous pre-submission form gates
//!
//! ## Example
//!
//! ```ignore
//! use skillsphere_client::prelude::*;
//! use skillsphere_runtime::Store;
//!
//! let config = Config::from_env();
//! let sessions = Arc::new(SessionStore::open(config.session_file.clone()));
//! let api = Arc::new(ApiClient::new(&config.api, Arc::clone(&sessions))?);
//! let env = NavigationEnvironment::new(
//!     api,
//!     Arc::clone(&sessions),
//!     SimulatedPaymentProcessor::shared(config.payment.processing_delay(), Arc::new(SystemClock)),
//!     config.payment.redirect_delay(),
//! );
//! let store = Store::new(
//!     NavigationState::with_session(sessions.get()),
//!     NavigationReducer::new(),
//!     env,
//! );
//! store.send(NavigationAction::ViewAllCourses).await?;
//! ```

pub mod api;
pub mod config;
pub mod mocks;
pub mod navigation;
pub mod session;
pub mod types;
pub mod validate;

/// Commonly used items, re-exported for binaries and tests
pub mod prelude {
    pub use crate::api::{ApiClient, ApiError, CourseQuery, StorefrontApi};
    pub use crate::config::Config;
    pub use crate::navigation::{
        Flash, NavigationAction, NavigationEnvironment, NavigationReducer, NavigationState, Page,
        PaymentField, PaymentPhase, SimulatedPaymentProcessor,
    };
    pub use crate::session::SessionStore;
    pub use crate::types::{Course, CourseId, Role, Session};
}
