//! Navigation controller.
//!
//! The storefront's finite-state page router plus the checkout/payment
//! sub-flow, expressed as a reducer over [`state::NavigationState`]. User
//! commands and async results both arrive as [`actions::NavigationAction`];
//! side effects (API fetches, payment charges, timers) are `Effect` values
//! executed by the Store runtime.

pub mod actions;
pub mod environment;
pub mod payment;
pub mod reducer;
pub mod state;

pub use actions::{ContactField, LoginField, NavigationAction, RegistrationField};
pub use environment::{
    NavigationEnvironment, PaymentError, PaymentProcessor, PaymentReceipt,
    SimulatedPaymentProcessor,
};
pub use payment::{PaymentField, PaymentForm, PaymentPhase};
pub use reducer::{DEFAULT_PAGE_SIZE, NavigationReducer};
pub use state::{Flash, NavigationState, Page};
