//! Outbound notifications.
//!
//! Fire-and-forget email/SMS triggers dispatched after a successful
//! checkout. Sink failures are logged by the caller and never affect the
//! checkout's own outcome.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use thiserror::Error;

use crate::checkout::{CheckoutForm, Confirmation};

/// Errors that can occur when dispatching a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The notification function returned a non-2xx response.
    #[error("unexpected response from notification function: {0}")]
    UnexpectedResponse(String),
}

/// Best-effort outbound notification channel.
#[automock]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Announce a confirmed checkout.
    ///
    /// # Errors
    ///
    /// Returns a [`NotificationError`] on dispatch failure; callers log and
    /// move on.
    async fn order_confirmed(
        &self,
        confirmation: &Confirmation,
        form: &CheckoutForm,
    ) -> Result<(), NotificationError>;
}

/// Sink that posts to a serverless notification function.
#[derive(Debug, Clone)]
pub struct RestNotificationSink {
    url: String,
    http: Client,
}

impl RestNotificationSink {
    /// Create a sink posting to the given function URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl NotificationSink for RestNotificationSink {
    async fn order_confirmed(
        &self,
        confirmation: &Confirmation,
        form: &CheckoutForm,
    ) -> Result<(), NotificationError> {
        let body = serde_json::json!({
            "reference": confirmation.reference,
            "total_amount": confirmation.total,
            "currency": confirmation.currency,
            "order_count": confirmation.orders.len(),
            "email": form.email,
            "phone": form.phone,
        });

        let response = self.http.post(&self.url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(NotificationError::UnexpectedResponse(format!(
                "dispatch failed with status {status}: {text}"
            )));
        }

        Ok(())
    }
}

/// Sink for contexts without a notification function configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl NotificationSink for NoopSink {
    async fn order_confirmed(
        &self,
        _confirmation: &Confirmation,
        _form: &CheckoutForm,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}
