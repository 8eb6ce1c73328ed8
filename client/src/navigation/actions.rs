//! Navigation actions.
//!
//! All possible inputs to the navigation reducer: user commands (navigation
//! requests, form edits, submissions) and the results of async work (API
//! responses, payment settlement, timers). Result actions carry the epoch
//! current when their effect was issued so stale responses can be discarded.

use crate::navigation::environment::PaymentReceipt;
use crate::navigation::payment::PaymentField;
use crate::navigation::state::Page;
use crate::types::{Course, CourseId, CoursesPage, Role, Session};

/// Editable fields of the login form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginField {
    /// Email field
    Email,
    /// Password field
    Password,
}

/// Editable text fields of the registration form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationField {
    /// Full-name field
    Name,
    /// Email field
    Email,
    /// Password field
    Password,
}

/// Editable fields of the contact form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactField {
    /// Name field
    Name,
    /// Email field
    Email,
    /// Subject field
    Subject,
    /// Message field
    Message,
}

/// Navigation action
///
/// Commands express user intent; result actions report what async work
/// produced. The reducer is the only consumer.
#[derive(Clone, Debug)]
pub enum NavigationAction {
    // ========== Navigation commands ==========
    /// Direct navigation request (auth-guarded pages are enforced here)
    SetPage(Page),
    /// Open a course's detail page and fetch its record
    ViewCourse {
        /// Course to show
        id: CourseId,
    },
    /// Open the catalog (authenticated)
    ViewAllCourses,
    /// Carry the resolved course snapshot into checkout
    StartCheckout,
    /// Move from the order summary to card entry
    ProceedToPayment,
    /// Jump from registration to the sign-in form
    NavigateToLogin,
    /// End the session and return home
    Logout,
    /// Dismiss the current page-level message
    DismissFlash,

    // ========== Form commands ==========
    /// Login form edit
    LoginFieldChanged {
        /// Edited field
        field: LoginField,
        /// New value
        value: String,
    },
    /// Submit the login form
    SubmitLogin,
    /// Registration form text edit
    RegistrationFieldChanged {
        /// Edited field
        field: RegistrationField,
        /// New value
        value: String,
    },
    /// Registration role selection
    RegistrationRoleSelected {
        /// Chosen role
        role: Role,
    },
    /// Submit the registration form
    SubmitRegistration,
    /// Contact form edit
    ContactFieldChanged {
        /// Edited field
        field: ContactField,
        /// New value
        value: String,
    },
    /// Submit the contact form (handled locally)
    SubmitContact,
    /// Payment form edit (formatting rules apply)
    PaymentFieldChanged {
        /// Edited field
        field: PaymentField,
        /// New value
        value: String,
    },
    /// Submit the payment form
    SubmitPayment,

    // ========== Async results ==========
    /// Course detail fetch succeeded
    CourseResolved {
        /// Epoch when the fetch was issued
        epoch: u64,
        /// The resolved course
        course: Box<Course>,
    },
    /// Course detail fetch failed
    CourseLookupFailed {
        /// Epoch when the fetch was issued
        epoch: u64,
        /// User-facing message
        message: String,
    },
    /// Catalog fetch succeeded
    CoursesLoaded {
        /// Epoch when the fetch was issued
        epoch: u64,
        /// Catalog page
        page: CoursesPage,
    },
    /// Catalog fetch failed
    CoursesLoadFailed {
        /// Epoch when the fetch was issued
        epoch: u64,
        /// User-facing message
        message: String,
    },
    /// Purchased-courses fetch succeeded
    PurchasedLoaded {
        /// Epoch when the fetch was issued
        epoch: u64,
        /// Purchased-courses page
        page: CoursesPage,
    },
    /// Purchased-courses fetch failed
    PurchasedLoadFailed {
        /// Epoch when the fetch was issued
        epoch: u64,
        /// User-facing message
        message: String,
    },
    /// Login succeeded
    LoginSucceeded {
        /// Epoch when the request was issued
        epoch: u64,
        /// The new session
        session: Box<Session>,
    },
    /// Login failed
    LoginFailed {
        /// Epoch when the request was issued
        epoch: u64,
        /// User-facing message
        message: String,
    },
    /// Registration succeeded
    RegistrationSucceeded {
        /// Epoch when the request was issued
        epoch: u64,
    },
    /// Registration failed
    RegistrationFailed {
        /// Epoch when the request was issued
        epoch: u64,
        /// User-facing message
        message: String,
    },
    /// The processor settled the charge
    PaymentSettled {
        /// Epoch when the charge was issued
        epoch: u64,
        /// Processor receipt
        receipt: PaymentReceipt,
    },
    /// The processor rejected the charge
    PaymentFailed {
        /// Epoch when the charge was issued
        epoch: u64,
        /// User-facing message
        message: String,
    },
    /// The success-screen timer elapsed; return home
    PaymentRedirectElapsed {
        /// Epoch when the timer was started
        epoch: u64,
    },
}
