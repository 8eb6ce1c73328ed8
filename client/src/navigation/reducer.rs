//! Navigation reducer.
//!
//! The finite-state page router of the storefront: validates commands,
//! applies transitions, and describes async work (API fetches, payment
//! charges, the success-screen timer) as effects. Async results are applied
//! only when their epoch still matches the state's, so responses for
//! abandoned pages or selections are discarded.

use crate::api::{CourseQuery, LoginRequest, RegisterRequest};
use crate::navigation::actions::{ContactField, LoginField, NavigationAction, RegistrationField};
use crate::navigation::environment::NavigationEnvironment;
use crate::navigation::payment::PaymentPhase;
use crate::navigation::state::{ContactForm, Flash, LoginForm, NavigationState, Page, RegistrationForm};
use crate::types::{CourseId, Session};
use crate::validate;
use skillsphere_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::sync::Arc;

/// Page size requested for catalog and purchased-course listings
pub const DEFAULT_PAGE_SIZE: u32 = 12;

type Effects = SmallVec<[Effect<NavigationAction>; 4]>;

/// Reducer for the storefront navigation state machine
#[derive(Clone, Copy, Debug, Default)]
pub struct NavigationReducer;

impl NavigationReducer {
    /// Creates a new `NavigationReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn no_effects() -> Effects {
        SmallVec::new()
    }

    /// True (and logged) when an async result no longer matches the state
    fn is_stale(state: &NavigationState, epoch: u64, what: &str) -> bool {
        if epoch == state.epoch {
            false
        } else {
            tracing::debug!(
                result_epoch = epoch,
                current_epoch = state.epoch,
                what,
                "Discarding stale async result"
            );
            true
        }
    }

    /// Direct navigation with guard enforcement
    fn goto(state: &mut NavigationState, env: &NavigationEnvironment, page: Page) -> Effects {
        state.flash = None;

        if page.requires_auth() && !state.is_authenticated() {
            tracing::debug!(?page, "Blocked navigation to auth-guarded page");
            state.flash = Some(Flash::Error("Please sign in to view this page.".to_string()));
            return Self::no_effects();
        }

        match page {
            Page::CourseDetail if state.selected_course_id.is_none() => {
                state.flash = Some(Flash::Error("No course selected.".to_string()));
                return Self::no_effects();
            },
            Page::Checkout | Page::Payment if state.selected_course.is_none() => {
                state.flash = Some(Flash::Error("Course not found.".to_string()));
                return Self::no_effects();
            },
            Page::Payment if !state.is_authenticated() => {
                state.flash = Some(Flash::Error(
                    "Please sign in to complete your purchase.".to_string(),
                ));
                return Self::no_effects();
            },
            _ => {},
        }

        state.page = page;
        state.epoch += 1;

        match page {
            Page::Courses => {
                let query = CourseQuery::new().page(1).limit(DEFAULT_PAGE_SIZE);
                smallvec![Self::fetch_catalog(env, query, state.epoch)]
            },
            Page::MyCourses => {
                smallvec![Self::fetch_purchased(env, 1, DEFAULT_PAGE_SIZE, state.epoch)]
            },
            Page::Checkout if !state.is_authenticated() => {
                // Order summary renders the sign-in error view; payment stays locked
                state.flash = Some(Flash::Error(
                    "Please sign in to complete your purchase.".to_string(),
                ));
                Self::no_effects()
            },
            _ => Self::no_effects(),
        }
    }

    fn fetch_course_detail(
        env: &NavigationEnvironment,
        id: CourseId,
        epoch: u64,
    ) -> Effect<NavigationAction> {
        let api = Arc::clone(&env.api);
        Effect::future(async move {
            match api.course_detail(id).await {
                Ok(course) => Some(NavigationAction::CourseResolved {
                    epoch,
                    course: Box::new(course),
                }),
                Err(error) => Some(NavigationAction::CourseLookupFailed {
                    epoch,
                    message: error.to_string(),
                }),
            }
        })
    }

    fn fetch_catalog(
        env: &NavigationEnvironment,
        query: CourseQuery,
        epoch: u64,
    ) -> Effect<NavigationAction> {
        let api = Arc::clone(&env.api);
        Effect::future(async move {
            match api.courses(query).await {
                Ok(page) => Some(NavigationAction::CoursesLoaded { epoch, page }),
                Err(error) => Some(NavigationAction::CoursesLoadFailed {
                    epoch,
                    message: error.to_string(),
                }),
            }
        })
    }

    fn fetch_purchased(
        env: &NavigationEnvironment,
        page: u32,
        limit: u32,
        epoch: u64,
    ) -> Effect<NavigationAction> {
        let api = Arc::clone(&env.api);
        Effect::future(async move {
            match api.purchased_courses(page, limit).await {
                Ok(page) => Some(NavigationAction::PurchasedLoaded { epoch, page }),
                Err(error) => Some(NavigationAction::PurchasedLoadFailed {
                    epoch,
                    message: error.to_string(),
                }),
            }
        })
    }

    fn view_course(
        state: &mut NavigationState,
        env: &NavigationEnvironment,
        id: CourseId,
    ) -> Effects {
        state.flash = None;
        state.page = Page::CourseDetail;
        state.selected_course_id = Some(id.clone());
        state.selected_course = None;
        state.epoch += 1;
        smallvec![Self::fetch_course_detail(env, id, state.epoch)]
    }

    fn start_checkout(state: &mut NavigationState) -> Effects {
        if state.page != Page::CourseDetail {
            tracing::debug!(page = ?state.page, "Ignoring checkout request outside course detail");
            return Self::no_effects();
        }

        // Guard: the snapshot must have resolved; a failed or pending lookup
        // blocks the transition entirely.
        if state.selected_course.is_none() {
            state.flash = Some(Flash::Error("Course not found.".to_string()));
            return Self::no_effects();
        }

        state.flash = None;
        state.page = Page::Checkout;
        state.epoch += 1;

        if !state.is_authenticated() {
            state.flash = Some(Flash::Error(
                "Please sign in to complete your purchase.".to_string(),
            ));
        }
        Self::no_effects()
    }

    fn proceed_to_payment(state: &mut NavigationState) -> Effects {
        if state.page != Page::Checkout {
            tracing::debug!(page = ?state.page, "Ignoring payment request outside checkout");
            return Self::no_effects();
        }

        if !state.is_authenticated() {
            state.flash = Some(Flash::Error(
                "Please sign in to complete your purchase.".to_string(),
            ));
            return Self::no_effects();
        }

        if state.selected_course.is_none() {
            state.flash = Some(Flash::Error("Course not found.".to_string()));
            return Self::no_effects();
        }

        state.flash = None;
        state.page = Page::Payment;
        state.epoch += 1;
        state.payment_form.reset();
        Self::no_effects()
    }

    fn logout(state: &mut NavigationState, env: &NavigationEnvironment) -> Effects {
        tracing::info!("Logging out");
        env.sessions.clear();

        state.session = None;
        state.catalog = None;
        state.purchased = None;
        state.selected_course_id = None;
        state.selected_course = None;
        state.payment_form.reset();
        state.flash = None;
        state.page = Page::Home;
        state.epoch += 1;

        // Best-effort server-side logout; the outcome does not affect state
        let api = Arc::clone(&env.api);
        smallvec![Effect::future(async move {
            if let Err(error) = api.logout().await {
                tracing::debug!(%error, "Server-side logout failed");
            }
            None
        })]
    }

    fn submit_login(state: &mut NavigationState, env: &NavigationEnvironment) -> Effects {
        if state.login_form.submitting {
            return Self::no_effects();
        }

        if let Err(errors) = validate::validate_login(&state.login_form.email, &state.login_form.password) {
            state.login_form.errors = errors;
            return Self::no_effects();
        }

        state.login_form.errors = validate::FieldErrors::new();
        state.login_form.submitting = true;

        let request = LoginRequest {
            email: state.login_form.email.trim().to_string(),
            password: state.login_form.password.clone(),
        };
        let api = Arc::clone(&env.api);
        let epoch = state.epoch;
        smallvec![Effect::future(async move {
            match api.login(request).await {
                Ok(data) => Some(NavigationAction::LoginSucceeded {
                    epoch,
                    session: Box::new(Session::from(data)),
                }),
                Err(error) => Some(NavigationAction::LoginFailed {
                    epoch,
                    message: error.to_string(),
                }),
            }
        })]
    }

    fn apply_login(state: &mut NavigationState, env: &NavigationEnvironment, session: Session) -> Effects {
        tracing::info!(email = %session.user.email, "Login succeeded");
        env.sessions.save(session.clone());

        state.session = Some(session);
        state.login_form = LoginForm::default();
        state.flash = None;
        state.page = Page::Home;
        state.epoch += 1;
        Self::no_effects()
    }

    fn submit_registration(state: &mut NavigationState, env: &NavigationEnvironment) -> Effects {
        if state.registration_form.submitting {
            return Self::no_effects();
        }

        let form = &state.registration_form;
        if let Err(errors) =
            validate::validate_registration(&form.name, &form.email, &form.password, form.role)
        {
            state.registration_form.errors = errors;
            return Self::no_effects();
        }

        let Some(role) = state.registration_form.role else {
            return Self::no_effects();
        };

        state.registration_form.errors = validate::FieldErrors::new();
        state.registration_form.submitting = true;

        let request = RegisterRequest {
            name: state.registration_form.name.trim().to_string(),
            email: state.registration_form.email.trim().to_string(),
            password: state.registration_form.password.clone(),
            role: role.api_value().to_string(),
        };
        let api = Arc::clone(&env.api);
        let epoch = state.epoch;
        smallvec![Effect::future(async move {
            match api.register(request).await {
                Ok(()) => Some(NavigationAction::RegistrationSucceeded { epoch }),
                Err(error) => Some(NavigationAction::RegistrationFailed {
                    epoch,
                    message: error.to_string(),
                }),
            }
        })]
    }

    fn submit_contact(state: &mut NavigationState) -> Effects {
        let form = &state.contact_form;
        if let Err(errors) =
            validate::validate_contact(&form.name, &form.email, &form.subject, &form.message)
        {
            state.contact_form.errors = errors;
            return Self::no_effects();
        }

        // Handled locally; the contact form never reaches the API
        tracing::info!(subject = %state.contact_form.subject, "Contact form submitted");
        state.contact_form = ContactForm::default();
        state.flash = Some(Flash::Info("Message sent successfully!".to_string()));
        Self::no_effects()
    }

    fn submit_payment(state: &mut NavigationState, env: &NavigationEnvironment) -> Effects {
        if state.page != Page::Payment || state.payment_form.phase != PaymentPhase::Editing {
            return Self::no_effects();
        }

        if state.payment_form.has_missing_fields() {
            state.payment_form.error = Some("Please fill in all fields".to_string());
            return Self::no_effects();
        }

        let Some(course) = &state.selected_course else {
            state.flash = Some(Flash::Error("Course not found.".to_string()));
            return Self::no_effects();
        };

        state.payment_form.error = None;
        state.payment_form.phase = PaymentPhase::Processing;

        let amount = course.price;
        let card = state.payment_form.card();
        let payments = Arc::clone(&env.payments);
        let epoch = state.epoch;
        smallvec![Effect::future(async move {
            match payments.charge(amount, card).await {
                Ok(receipt) => Some(NavigationAction::PaymentSettled { epoch, receipt }),
                Err(error) => Some(NavigationAction::PaymentFailed {
                    epoch,
                    message: error.to_string(),
                }),
            }
        })]
    }

    fn complete_payment(state: &mut NavigationState) -> Effects {
        let PaymentPhase::Succeeded { receipt } = &state.payment_form.phase else {
            return Self::no_effects();
        };
        let amount = receipt.amount;

        state.payment_form.reset();
        state.selected_course_id = None;
        state.selected_course = None;
        state.page = Page::Home;
        state.epoch += 1;
        state.flash = Some(Flash::Info(format!(
            "Your payment of ${amount:.2} has been processed successfully."
        )));
        Self::no_effects()
    }
}

impl Reducer for NavigationReducer {
    type State = NavigationState;
    type Action = NavigationAction;
    type Environment = NavigationEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action keeps transitions exhaustive and auditable
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Navigation commands ==========
            NavigationAction::SetPage(page) => Self::goto(state, env, page),
            NavigationAction::ViewCourse { id } => Self::view_course(state, env, id),
            NavigationAction::ViewAllCourses => Self::goto(state, env, Page::Courses),
            NavigationAction::StartCheckout => Self::start_checkout(state),
            NavigationAction::ProceedToPayment => Self::proceed_to_payment(state),
            NavigationAction::NavigateToLogin => {
                state.flash = None;
                state.page = Page::Login;
                state.epoch += 1;
                Self::no_effects()
            },
            NavigationAction::Logout => Self::logout(state, env),
            NavigationAction::DismissFlash => {
                state.flash = None;
                Self::no_effects()
            },

            // ========== Form commands ==========
            NavigationAction::LoginFieldChanged { field, value } => {
                match field {
                    LoginField::Email => {
                        state.login_form.email = value;
                        state.login_form.errors.clear_field("email");
                    },
                    LoginField::Password => {
                        state.login_form.password = value;
                        state.login_form.errors.clear_field("password");
                    },
                }
                Self::no_effects()
            },
            NavigationAction::SubmitLogin => Self::submit_login(state, env),
            NavigationAction::RegistrationFieldChanged { field, value } => {
                match field {
                    RegistrationField::Name => {
                        state.registration_form.name = value;
                        state.registration_form.errors.clear_field("name");
                    },
                    RegistrationField::Email => {
                        state.registration_form.email = value;
                        state.registration_form.errors.clear_field("email");
                    },
                    RegistrationField::Password => {
                        state.registration_form.password = value;
                        state.registration_form.errors.clear_field("password");
                    },
                }
                Self::no_effects()
            },
            NavigationAction::RegistrationRoleSelected { role } => {
                state.registration_form.role = Some(role);
                state.registration_form.errors.clear_field("role");
                Self::no_effects()
            },
            NavigationAction::SubmitRegistration => Self::submit_registration(state, env),
            NavigationAction::ContactFieldChanged { field, value } => {
                match field {
                    ContactField::Name => {
                        state.contact_form.name = value;
                        state.contact_form.errors.clear_field("name");
                    },
                    ContactField::Email => {
                        state.contact_form.email = value;
                        state.contact_form.errors.clear_field("email");
                    },
                    ContactField::Subject => {
                        state.contact_form.subject = value;
                        state.contact_form.errors.clear_field("subject");
                    },
                    ContactField::Message => {
                        state.contact_form.message = value;
                        state.contact_form.errors.clear_field("message");
                    },
                }
                Self::no_effects()
            },
            NavigationAction::SubmitContact => Self::submit_contact(state),
            NavigationAction::PaymentFieldChanged { field, value } => {
                if state.payment_form.phase == PaymentPhase::Editing {
                    state.payment_form.set_field(field, &value);
                }
                Self::no_effects()
            },
            NavigationAction::SubmitPayment => Self::submit_payment(state, env),

            // ========== Async results ==========
            NavigationAction::CourseResolved { epoch, course } => {
                if Self::is_stale(state, epoch, "course detail") {
                    return Self::no_effects();
                }
                // Also keyed to the selection: a response for another course
                // must not overwrite the current snapshot.
                if state.selected_course_id.as_ref() != Some(&course.id) {
                    tracing::debug!(course = %course.id, "Discarding course detail for abandoned selection");
                    return Self::no_effects();
                }
                state.selected_course = Some(*course);
                Self::no_effects()
            },
            NavigationAction::CourseLookupFailed { epoch, message } => {
                if Self::is_stale(state, epoch, "course detail") {
                    return Self::no_effects();
                }
                state.flash = Some(Flash::Error(message));
                Self::no_effects()
            },
            NavigationAction::CoursesLoaded { epoch, page } => {
                if Self::is_stale(state, epoch, "catalog") {
                    return Self::no_effects();
                }
                state.catalog = Some(page);
                Self::no_effects()
            },
            NavigationAction::CoursesLoadFailed { epoch, message } => {
                if Self::is_stale(state, epoch, "catalog") {
                    return Self::no_effects();
                }
                state.flash = Some(Flash::Error(message));
                Self::no_effects()
            },
            NavigationAction::PurchasedLoaded { epoch, page } => {
                if Self::is_stale(state, epoch, "purchased courses") {
                    return Self::no_effects();
                }
                state.purchased = Some(page);
                Self::no_effects()
            },
            NavigationAction::PurchasedLoadFailed { epoch, message } => {
                if Self::is_stale(state, epoch, "purchased courses") {
                    return Self::no_effects();
                }
                state.flash = Some(Flash::Error(message));
                Self::no_effects()
            },
            NavigationAction::LoginSucceeded { epoch, session } => {
                if Self::is_stale(state, epoch, "login") {
                    // An abandoned login must not authenticate the user
                    return Self::no_effects();
                }
                Self::apply_login(state, env, *session)
            },
            NavigationAction::LoginFailed { epoch, message } => {
                if Self::is_stale(state, epoch, "login") {
                    return Self::no_effects();
                }
                state.login_form.submitting = false;
                state.flash = Some(Flash::Error(message));
                Self::no_effects()
            },
            NavigationAction::RegistrationSucceeded { epoch } => {
                if Self::is_stale(state, epoch, "registration") {
                    return Self::no_effects();
                }
                state.registration_form = RegistrationForm::default();
                state.flash = Some(Flash::Info(
                    "Account created! You can now sign in.".to_string(),
                ));
                Self::no_effects()
            },
            NavigationAction::RegistrationFailed { epoch, message } => {
                if Self::is_stale(state, epoch, "registration") {
                    return Self::no_effects();
                }
                state.registration_form.submitting = false;
                state.flash = Some(Flash::Error(message));
                Self::no_effects()
            },
            NavigationAction::PaymentSettled { epoch, receipt } => {
                if Self::is_stale(state, epoch, "payment") {
                    return Self::no_effects();
                }
                state.payment_form.phase = PaymentPhase::Succeeded { receipt };
                smallvec![Effect::Delay {
                    duration: env.redirect_delay,
                    action: Box::new(NavigationAction::PaymentRedirectElapsed { epoch }),
                }]
            },
            NavigationAction::PaymentFailed { epoch, message } => {
                if Self::is_stale(state, epoch, "payment") {
                    return Self::no_effects();
                }
                state.payment_form.phase = PaymentPhase::Editing;
                state.payment_form.error = Some(message);
                Self::no_effects()
            },
            NavigationAction::PaymentRedirectElapsed { epoch } => {
                if Self::is_stale(state, epoch, "payment redirect") {
                    return Self::no_effects();
                }
                Self::complete_payment(state)
            },
        }
    }
}
