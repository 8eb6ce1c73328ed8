//! Navigation environment: injected dependencies for the reducer.
//!
//! The reducer only describes work; everything that touches the outside
//! world (the marketplace API, the session file, the payment processor)
//! enters through this environment.

use crate::api::{BoxFuture, StorefrontApi};
use crate::navigation::payment::CardDetails;
use crate::session::SessionStore;
use serde::{Deserialize, Serialize};
use skillsphere_core::environment::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors a payment processor can report
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    /// Card declined
    #[error("Card declined: {reason}")]
    Declined {
        /// Decline reason
        reason: String,
    },
    /// Processor timeout
    #[error("Payment processor timeout")]
    Timeout,
    /// Other error
    #[error("Payment error: {message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Receipt for a settled charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Processor transaction identifier
    pub transaction_id: String,
    /// Amount charged, in dollars
    pub amount: f64,
    /// When the charge settled
    pub processed_at: chrono::DateTime<chrono::Utc>,
}

/// Payment processor abstraction
///
/// Stand-in for an external provider (Stripe, `PayPal`, Apple Pay). The
/// storefront ships with [`SimulatedPaymentProcessor`]; a production
/// integration implements this trait against the real provider.
pub trait PaymentProcessor: Send + Sync {
    /// Process a charge
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentError`] if the charge fails.
    fn charge(&self, amount: f64, card: CardDetails) -> BoxFuture<Result<PaymentReceipt, PaymentError>>;
}

/// Simulated payment processor (always approves)
///
/// Resolves successfully after a configured delay, standing in for the
/// pending state of a real provider.
#[derive(Clone)]
pub struct SimulatedPaymentProcessor {
    processing_delay: Duration,
    clock: Arc<dyn Clock>,
}

impl SimulatedPaymentProcessor {
    /// Create a processor with the given pending duration
    #[must_use]
    pub fn new(processing_delay: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            processing_delay,
            clock,
        }
    }

    /// Create an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(processing_delay: Duration, clock: Arc<dyn Clock>) -> Arc<dyn PaymentProcessor> {
        Arc::new(Self::new(processing_delay, clock))
    }
}

impl PaymentProcessor for SimulatedPaymentProcessor {
    fn charge(&self, amount: f64, card: CardDetails) -> BoxFuture<Result<PaymentReceipt, PaymentError>> {
        let delay = self.processing_delay;
        let clock = Arc::clone(&self.clock);
        Box::pin(async move {
            tokio::time::sleep(delay).await;

            let transaction_id = format!("sim_txn_{}", uuid::Uuid::new_v4());
            tracing::info!(
                amount,
                holder = %card.holder,
                %transaction_id,
                "Simulated payment processed successfully"
            );

            Ok(PaymentReceipt {
                transaction_id,
                amount,
                processed_at: clock.now(),
            })
        })
    }
}

/// Environment dependencies for the navigation reducer
#[derive(Clone)]
pub struct NavigationEnvironment {
    /// Marketplace API gateway
    pub api: Arc<dyn StorefrontApi>,
    /// Persistent session store
    pub sessions: Arc<SessionStore>,
    /// Payment processor
    pub payments: Arc<dyn PaymentProcessor>,
    /// How long the payment success screen is shown before returning home
    pub redirect_delay: Duration,
}

impl NavigationEnvironment {
    /// Creates a new `NavigationEnvironment`
    #[must_use]
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        sessions: Arc<SessionStore>,
        payments: Arc<dyn PaymentProcessor>,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            api,
            sessions,
            payments,
            redirect_delay,
        }
    }
}
