//! Message export.
//!
//! The alternate checkout path: the whole cart plus the form fields become
//! one human-readable text block, handed to a chat contact through a
//! `wa.me` deep link. No network path, no success callback; handing off to
//! the external channel is unconditionally successful.

use reqwest::Url;
use rusty_money::{Money, iso};

use crate::{
    cart::Cart,
    checkout::{CheckoutError, CheckoutForm},
};

/// Format a minor-unit amount with its currency symbol, falling back to a
/// plain `"<amount> <code>"` rendering for unknown codes.
#[must_use]
pub fn format_amount(minor: u64, code: &str) -> String {
    let Some(currency) = iso::find(code) else {
        return format!("{minor} {code}");
    };

    match i64::try_from(minor) {
        Ok(minor) => Money::from_minor(minor, currency).to_string(),
        Err(_) => format!("{minor} {code}"),
    }
}

/// Render the cart and form into an itemized booking-request message.
///
/// Only form fields that were actually filled in appear; the cart alone is
/// enough.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] when there is nothing to export.
pub fn render_order_message(cart: &Cart, form: &CheckoutForm) -> Result<String, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut message = String::from("New booking request\n\n");

    for (index, line) in cart.lines().iter().enumerate() {
        let position = index.saturating_add(1);

        message.push_str(&format!(
            "{position}. {} ({}) x {} - {}\n",
            line.title,
            line.kind.label(),
            line.quantity,
            format_amount(line.line_total(), &line.currency),
        ));
    }

    let subtotal = format_amount(
        cart.subtotal(),
        cart.currency_code().unwrap_or(crate::products::DEFAULT_CURRENCY),
    );
    let item_count = cart.item_count();

    message.push_str(&format!("\nSubtotal: {subtotal} ({item_count} items)\n"));

    let mut push_field = |label: &str, value: &str| {
        let value = value.trim();
        if !value.is_empty() {
            message.push_str(&format!("{label}: {value}\n"));
        }
    };

    push_field("Name", &form.name);
    push_field("Email", &form.email);
    push_field("Phone", &form.phone);

    if let Some(travel_date) = form.travel_date {
        push_field("Travel date", &travel_date.to_string());
    }

    if let Some(guests) = form.guests {
        push_field("Guests", &guests.to_string());
    }

    if let Some(notes) = form.notes.as_deref() {
        push_field("Notes", notes);
    }

    Ok(message)
}

/// Build the chat deep-link URL carrying a pre-filled message.
///
/// # Errors
///
/// Returns [`CheckoutError::InvalidContact`] when the contact does not form
/// a valid URL.
pub fn chat_deep_link(contact: &str, message: &str) -> Result<Url, CheckoutError> {
    Url::parse_with_params(&format!("https://wa.me/{contact}"), [("text", message)])
        .map_err(|error| CheckoutError::InvalidContact(error.to_string()))
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, civil::date};
    use testresult::TestResult;

    use crate::products::{ProductDescriptor, ProductKind};

    use super::*;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        let tour = ProductDescriptor::new("safari-1", ProductKind::Tour, "Serengeti 3-Day", 90000);
        let transfer =
            ProductDescriptor::new("transfer-9", ProductKind::Transfer, "Airport pickup", 6000);

        cart.add(&tour, Timestamp::now());
        cart.add(&tour, Timestamp::now());
        cart.add(&transfer, Timestamp::now());

        cart
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            name: "Asha Mrema".to_owned(),
            email: "asha@example.com".to_owned(),
            phone: "+255 700 000 001".to_owned(),
            travel_date: Some(date(2026, 9, 14)),
            guests: Some(2),
            notes: Some("vegetarian meals".to_owned()),
        }
    }

    #[test]
    fn format_amount_uses_currency_symbol() {
        assert_eq!(format_amount(186_000, "USD"), "$1,860.00");
        assert_eq!(format_amount(300, "GBP"), "£3.00");
    }

    #[test]
    fn format_amount_falls_back_for_unknown_codes() {
        assert_eq!(format_amount(500, "???"), "500 ???");
    }

    #[test]
    fn message_itemizes_lines_and_subtotal() -> TestResult {
        let message = render_order_message(&cart(), &form())?;

        assert!(message.contains("1. Serengeti 3-Day (tour) x 2 - $1,800.00"));
        assert!(message.contains("2. Airport pickup (transfer) x 1 - $60.00"));
        assert!(message.contains("Subtotal: $1,860.00 (3 items)"));
        assert!(message.contains("Name: Asha Mrema"));
        assert!(message.contains("Travel date: 2026-09-14"));
        assert!(message.contains("Guests: 2"));
        assert!(message.contains("Notes: vegetarian meals"));

        Ok(())
    }

    #[test]
    fn message_skips_blank_form_fields() -> TestResult {
        let message = render_order_message(&cart(), &CheckoutForm::default())?;

        assert!(!message.contains("Name:"));
        assert!(!message.contains("Email:"));
        assert!(message.contains("Subtotal:"));

        Ok(())
    }

    #[test]
    fn empty_cart_cannot_be_exported() {
        let result = render_order_message(&Cart::new(), &form());

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn deep_link_encodes_the_message() -> TestResult {
        let url = chat_deep_link("255700000001", "Subtotal: $1,860.00 (3 items)")?;

        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/255700000001");

        let text: Option<String> = url
            .query_pairs()
            .find(|(key, _)| key == "text")
            .map(|(_, value)| value.into_owned());

        assert_eq!(text.as_deref(), Some("Subtotal: $1,860.00 (3 items)"));

        Ok(())
    }
}
