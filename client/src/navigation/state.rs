//! Navigation state types.
//!
//! The whole client-visible state of the storefront lives here: the current
//! page, the active course selection, the session mirror, and the four form
//! states. The reducer owns every mutation.

use crate::navigation::payment::PaymentForm;
use crate::types::{Course, CourseId, CoursesPage, Role, Session};
use crate::validate::FieldErrors;

/// The pages of the storefront
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    /// Landing page
    Home,
    /// Course catalog (authenticated)
    Courses,
    /// Detail view of the selected course
    CourseDetail,
    /// Order summary before payment
    Checkout,
    /// Card entry and processing
    Payment,
    /// Purchased courses (authenticated)
    MyCourses,
    /// Sign-in form
    Login,
    /// Account creation form
    Registration,
    /// Learning-progress dashboard (authenticated)
    Progress,
    /// Contact form
    Contact,
}

impl Page {
    /// Whether this page is only reachable with an authenticated session
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        matches!(self, Self::Courses | Self::MyCourses | Self::Progress)
    }
}

/// A transient page-level message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flash {
    /// Something went wrong; shown inline in the error style
    Error(String),
    /// Confirmation of a completed operation
    Info(String),
}

impl Flash {
    /// The message text, regardless of kind
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Error(text) | Self::Info(text) => text,
        }
    }
}

/// Sign-in form state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginForm {
    /// Email field
    pub email: String,
    /// Password field
    pub password: String,
    /// Field-keyed validation messages
    pub errors: FieldErrors,
    /// A login request is in flight
    pub submitting: bool,
}

/// Account-creation form state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegistrationForm {
    /// Full-name field
    pub name: String,
    /// Email field
    pub email: String,
    /// Password field
    pub password: String,
    /// Selected role, if any
    pub role: Option<Role>,
    /// Field-keyed validation messages
    pub errors: FieldErrors,
    /// A registration request is in flight
    pub submitting: bool,
}

/// Contact form state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContactForm {
    /// Name field
    pub name: String,
    /// Email field
    pub email: String,
    /// Subject field
    pub subject: String,
    /// Message field
    pub message: String,
    /// Field-keyed validation messages
    pub errors: FieldErrors,
}

/// The navigation controller's state
///
/// `epoch` is the staleness guard: every page or selection change increments
/// it, and every async result action carries the epoch current when its
/// effect was issued. Results whose epoch no longer matches are discarded,
/// so a response for a since-abandoned page or course can never mutate
/// current state.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationState {
    /// Current page
    pub page: Page,
    /// Identifier of the selected course, if any
    pub selected_course_id: Option<CourseId>,
    /// Snapshot of the selected course, carried through checkout
    pub selected_course: Option<Course>,
    /// Mirror of the persisted session (source of truth: the session store)
    pub session: Option<Session>,
    /// Most recent catalog page
    pub catalog: Option<CoursesPage>,
    /// Most recent purchased-courses page
    pub purchased: Option<CoursesPage>,
    /// Sign-in form
    pub login_form: LoginForm,
    /// Registration form
    pub registration_form: RegistrationForm,
    /// Contact form
    pub contact_form: ContactForm,
    /// Payment step state
    pub payment_form: PaymentForm,
    /// Transient page-level message
    pub flash: Option<Flash>,
    /// Staleness guard for async results
    pub epoch: u64,
}

impl NavigationState {
    /// Fresh state on the landing page, logged out
    #[must_use]
    pub fn new() -> Self {
        Self::with_session(None)
    }

    /// Fresh state with a restored session (from the session store at start)
    #[must_use]
    pub fn with_session(session: Option<Session>) -> Self {
        Self {
            page: Page::Home,
            selected_course_id: None,
            selected_course: None,
            session,
            catalog: None,
            purchased: None,
            login_form: LoginForm::default(),
            registration_form: RegistrationForm::default(),
            contact_form: ContactForm::default(),
            payment_form: PaymentForm::default(),
            flash: None,
            epoch: 0,
        }
    }

    /// True iff the mirrored session carries a non-empty token
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.as_ref().is_some_and(Session::has_token)
    }

    /// Billing identity (name, email) shown on the checkout step
    #[must_use]
    pub fn billing_identity(&self) -> Option<(&str, &str)> {
        self.session
            .as_ref()
            .map(|session| (session.user.name.as_str(), session.user.email.as_str()))
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}
