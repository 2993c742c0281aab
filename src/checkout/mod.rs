//! Checkout
//!
//! One-shot batch submission: the current cart plus a contact/travel form
//! become one order-intent row per line, fanned out concurrently against
//! the remote store. All-or-nothing from the client's view: every insert
//! must succeed before the cart is cleared; any failure leaves the cart
//! intact for retry.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use futures::future;
use jiff::civil::Date;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    cart::store::CartStore,
    notifications::NotificationSink,
    orders::{GatewayError, OrderIntent, OrderRecord, OrdersGateway},
    products::DEFAULT_CURRENCY,
};

pub mod message;

/// A required form field, named in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Customer name.
    Name,
    /// Customer email.
    Email,
    /// Customer phone.
    Phone,
    /// Requested travel date.
    TravelDate,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::TravelDate => "travel date",
        };

        f.write_str(label)
    }
}

/// Errors surfaced by a checkout attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart held no lines; nothing was submitted.
    #[error("the cart is empty")]
    EmptyCart,

    /// A required form field was missing; nothing was submitted.
    #[error("missing required field: {0}")]
    MissingField(FormField),

    /// Another submission for this flow is still in flight.
    #[error("a checkout submission is already in flight")]
    SubmissionInFlight,

    /// At least one fan-out insert failed; the cart was left intact.
    #[error("checkout submission failed")]
    SubmissionFailed(#[source] GatewayError),

    /// The chat contact did not form a valid deep-link URL.
    #[error("invalid chat contact: {0}")]
    InvalidContact(String),
}

/// The visitor-supplied contact and travel details shared by every line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutForm {
    /// Customer name.
    pub name: String,

    /// Customer email.
    pub email: String,

    /// Customer phone.
    pub phone: String,

    /// Requested travel date.
    pub travel_date: Option<Date>,

    /// Number of guests; 1 when unset.
    pub guests: Option<u32>,

    /// Free-text notes appended to every intent.
    pub notes: Option<String>,
}

impl CheckoutForm {
    /// Check the required fields, returning the travel date on success.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingField`] naming the first missing
    /// field category.
    pub fn validate(&self) -> Result<Date, CheckoutError> {
        if self.name.trim().is_empty() {
            return Err(CheckoutError::MissingField(FormField::Name));
        }

        if self.email.trim().is_empty() {
            return Err(CheckoutError::MissingField(FormField::Email));
        }

        if self.phone.trim().is_empty() {
            return Err(CheckoutError::MissingField(FormField::Phone));
        }

        self.travel_date
            .ok_or(CheckoutError::MissingField(FormField::TravelDate))
    }
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    /// Generated tracking reference for the confirmation view.
    pub reference: Uuid,

    /// The rows the remote store acknowledged, in no guaranteed order.
    pub orders: Vec<OrderRecord>,

    /// Grand total of the submitted cart in minor units.
    pub total: u64,

    /// Currency code of the submitted cart.
    pub currency: String,
}

/// Releases the in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CheckoutError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| CheckoutError::SubmissionInFlight)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The checkout submission flow.
///
/// Holds the remote collaborators and the in-flight guard; the cart store
/// is borrowed per submission so tests can build isolated instances.
pub struct CheckoutFlow {
    gateway: Arc<dyn OrdersGateway>,
    sink: Arc<dyn NotificationSink>,
    in_flight: AtomicBool,
}

impl fmt::Debug for CheckoutFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl CheckoutFlow {
    /// Create a flow over the given collaborators.
    #[must_use]
    pub fn new(gateway: Arc<dyn OrdersGateway>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            gateway,
            sink,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Submit the current cart.
    ///
    /// Validates locally, fans out one insert per line (all issued
    /// concurrently, all awaited), and only on full success clears the
    /// store, dispatches best-effort notifications and returns a
    /// [`Confirmation`]. On any failure the cart is unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] for an empty cart, a missing form field,
    /// an overlapping submission, or a failed fan-out. In the last case the
    /// first underlying gateway error is attached; rows that were already
    /// accepted remotely are not reconciled.
    pub async fn submit(
        &self,
        store: &mut CartStore,
        form: &CheckoutForm,
    ) -> Result<Confirmation, CheckoutError> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        if store.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let travel_date = form.validate()?;

        let intents: Vec<OrderIntent> = store
            .cart()
            .lines()
            .iter()
            .map(|line| OrderIntent::for_line(line, form, travel_date))
            .collect();

        info!(lines = intents.len(), "submitting checkout fan-out");

        // join_all rather than try_join_all: every insert is awaited even
        // after one has already failed.
        let results =
            future::join_all(intents.iter().map(|intent| self.gateway.insert(intent))).await;

        let mut orders = Vec::with_capacity(results.len());
        let mut first_error = None;

        for result in results {
            match result {
                Ok(record) => orders.push(record),
                Err(error) => {
                    error!(%error, "order-intent insert failed");
                    first_error.get_or_insert(error);
                }
            }
        }

        if let Some(error) = first_error {
            return Err(CheckoutError::SubmissionFailed(error));
        }

        let total = store.cart().subtotal();
        let currency = store
            .cart()
            .currency_code()
            .unwrap_or(DEFAULT_CURRENCY)
            .to_owned();

        store.clear();

        let confirmation = Confirmation {
            reference: Uuid::now_v7(),
            orders,
            total,
            currency,
        };

        info!(reference = %confirmation.reference, total, "checkout confirmed");

        if let Err(error) = self.sink.order_confirmed(&confirmation, form).await {
            warn!(%error, "notification dispatch failed");
        }

        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn form() -> CheckoutForm {
        CheckoutForm {
            name: "Asha Mrema".to_owned(),
            email: "asha@example.com".to_owned(),
            phone: "+255 700 000 001".to_owned(),
            travel_date: Some(date(2026, 9, 14)),
            guests: Some(2),
            notes: None,
        }
    }

    #[test]
    fn validate_accepts_complete_form() {
        let travel_date = form().validate().expect("form should validate");

        assert_eq!(travel_date, date(2026, 9, 14));
    }

    #[test]
    fn validate_names_the_missing_field() {
        let mut missing_name = form();
        missing_name.name = "   ".to_owned();

        let mut missing_email = form();
        missing_email.email = String::new();

        let mut missing_phone = form();
        missing_phone.phone = String::new();

        let mut missing_date = form();
        missing_date.travel_date = None;

        assert!(matches!(
            missing_name.validate(),
            Err(CheckoutError::MissingField(FormField::Name))
        ));
        assert!(matches!(
            missing_email.validate(),
            Err(CheckoutError::MissingField(FormField::Email))
        ));
        assert!(matches!(
            missing_phone.validate(),
            Err(CheckoutError::MissingField(FormField::Phone))
        ));
        assert!(matches!(
            missing_date.validate(),
            Err(CheckoutError::MissingField(FormField::TravelDate))
        ));
    }

    #[test]
    fn form_field_labels_read_naturally() {
        assert_eq!(FormField::TravelDate.to_string(), "travel date");
        assert_eq!(
            CheckoutError::MissingField(FormField::Email).to_string(),
            "missing required field: email"
        );
    }

    #[test]
    fn in_flight_guard_releases_on_drop() {
        let flag = AtomicBool::new(false);

        {
            let _guard = InFlightGuard::acquire(&flag).expect("flag should be free");

            assert!(matches!(
                InFlightGuard::acquire(&flag),
                Err(CheckoutError::SubmissionInFlight)
            ));
        }

        assert!(
            InFlightGuard::acquire(&flag).is_ok(),
            "flag should be released after drop"
        );
    }
}
