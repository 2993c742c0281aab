//! Orders gateway.
//!
//! The remote data store seen through the only contract this core relies
//! on: one row insert per order intent. No multi-row transaction is assumed.

use async_trait::async_trait;
use jiff::civil::Date;
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{cart::CartLine, checkout::CheckoutForm, config::RemoteConfig};

/// Initial status carried by every order intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentStatus {
    /// Awaiting back-office confirmation.
    Pending,
}

/// One fan-out unit: a cart line combined with the shared contact/travel
/// form at submission time. Transient; not retained after the submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderIntent {
    /// Customer name.
    pub customer_name: String,

    /// Customer email.
    pub customer_email: String,

    /// Customer phone.
    pub customer_phone: String,

    /// Requested travel date.
    pub travel_date: Date,

    /// Number of guests.
    pub guests: u32,

    /// Free text embedding the product title and quantity; the remote
    /// schema has no line-item table.
    pub notes: String,

    /// Line total in minor units.
    pub total_amount: u64,

    /// ISO currency code of the line.
    pub currency: String,

    /// Always [`IntentStatus::Pending`] at creation.
    pub status: IntentStatus,
}

impl OrderIntent {
    /// Build the intent for one cart line.
    #[must_use]
    pub fn for_line(line: &CartLine, form: &CheckoutForm, travel_date: Date) -> Self {
        let mut notes = format!(
            "{} ({}) x {}",
            line.title,
            line.kind.label(),
            line.quantity
        );

        if let Some(extra) = form.notes.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            notes.push_str(" | ");
            notes.push_str(extra);
        }

        Self {
            customer_name: form.name.trim().to_owned(),
            customer_email: form.email.trim().to_owned(),
            customer_phone: form.phone.trim().to_owned(),
            travel_date,
            guests: form.guests.unwrap_or(1),
            notes,
            total_amount: line.line_total(),
            currency: line.currency.clone(),
            status: IntentStatus::Pending,
        }
    }
}

/// The row the remote store hands back for an inserted intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Row identifier assigned by the remote store.
    pub id: Uuid,

    /// Status echoed back by the remote store.
    pub status: IntentStatus,
}

/// Errors that can occur when talking to the remote data store.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote store returned a non-2xx response or unexpected body.
    #[error("unexpected response from remote store: {0}")]
    UnexpectedResponse(String),
}

/// Row-insert contract of the remote data store.
#[automock]
#[async_trait]
pub trait OrdersGateway: Send + Sync {
    /// Insert one order-intent row.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport failure or a rejected insert.
    async fn insert(&self, intent: &OrderIntent) -> Result<OrderRecord, GatewayError>;
}

/// HTTP gateway posting one JSON row per intent to a hosted REST endpoint.
#[derive(Debug, Clone)]
pub struct RestOrdersGateway {
    config: RemoteConfig,
    http: Client,
}

impl RestOrdersGateway {
    /// Create a gateway from the given configuration.
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl OrdersGateway for RestOrdersGateway {
    async fn insert(&self, intent: &OrderIntent) -> Result<OrderRecord, GatewayError> {
        let url = format!(
            "{}/rest/v1/{}",
            self.config.remote_url, self.config.orders_table
        );

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.config.remote_api_key)
            .bearer_auth(&self.config.remote_api_key)
            .header("Prefer", "return=representation")
            .json(intent)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(GatewayError::UnexpectedResponse(format!(
                "insert failed with status {status}: {text}"
            )));
        }

        // Row inserts come back as a one-element array.
        let rows: Vec<OrderRecord> = response.json().await?;

        rows.into_iter().next().ok_or_else(|| {
            GatewayError::UnexpectedResponse("insert returned no rows".to_owned())
        })
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use crate::{
        cart::Cart,
        products::{ProductDescriptor, ProductKind},
    };

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

    fn line() -> CartLine {
        let mut cart = Cart::new();
        let product =
            ProductDescriptor::new("safari-1", ProductKind::Tour, "Serengeti 3-Day", 900);
        cart.add(&product, jiff::Timestamp::now());
        cart.add(&product, jiff::Timestamp::now());

        cart.lines().first().cloned().expect("cart has one line")
    }

    #[test]
    fn intent_embeds_title_and_quantity_in_notes() {
        let intent = OrderIntent::for_line(&line(), &form(), date(2026, 9, 14));

        assert_eq!(intent.notes, "Serengeti 3-Day (tour) x 2");
        assert_eq!(intent.total_amount, 1800);
        assert_eq!(intent.currency, "USD");
        assert_eq!(intent.status, IntentStatus::Pending);
        assert_eq!(intent.guests, 2);
    }

    #[test]
    fn intent_appends_visitor_notes() {
        let mut form = form();
        form.notes = Some("  vegetarian meals  ".to_owned());

        let intent = OrderIntent::for_line(&line(), &form, date(2026, 9, 14));

        assert_eq!(intent.notes, "Serengeti 3-Day (tour) x 2 | vegetarian meals");
    }

    #[test]
    fn guests_default_to_one() {
        let mut form = form();
        form.guests = None;

        let intent = OrderIntent::for_line(&line(), &form, date(2026, 9, 14));

        assert_eq!(intent.guests, 1);
    }

    #[test]
    fn intent_serializes_pending_status_lowercase() {
        let intent = OrderIntent::for_line(&line(), &form(), date(2026, 9, 14));

        let value = serde_json::to_value(&intent).expect("intent should serialize");

        assert_eq!(value.get("status"), Some(&serde_json::json!("pending")));
        assert_eq!(
            value.get("travel_date"),
            Some(&serde_json::json!("2026-09-14"))
        );
    }
}
