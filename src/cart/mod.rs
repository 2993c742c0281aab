//! Cart
//!
//! The ordered collection of booking selections a visitor intends to book.
//! Pure collection semantics live here; persistence and event publication
//! live in [`store`].

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::products::{ProductDescriptor, ProductKind};

pub mod store;

/// One tour/activity/transfer selection held in the cart.
///
/// Display fields are snapshotted at add-time and never refreshed, so later
/// edits to the product do not retroactively change items already added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart-local line identifier, stable for the life of the line.
    pub id: Uuid,

    /// Identifier of the underlying product; unique across the cart.
    pub product_id: String,

    /// Product kind, resolved at add-time.
    pub kind: ProductKind,

    /// Display title snapshot.
    pub title: String,

    /// Optional image URL snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Optional duration label snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_label: Option<String>,

    /// Unit price in minor units.
    pub unit_price: u64,

    /// ISO currency code snapshot.
    pub currency: String,

    /// Always at least 1; a line that would drop to 0 is removed instead.
    pub quantity: u32,

    /// When the line was first added. Ordering and debugging only.
    pub added_at: Timestamp,
}

impl CartLine {
    /// Total for this line in minor units.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

/// Outcome of [`Cart::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was created with quantity 1.
    Added {
        /// Id of the new line.
        line_id: Uuid,
    },
    /// An existing line for the same product had its quantity incremented.
    Incremented {
        /// Id of the existing line.
        line_id: Uuid,
        /// Quantity after the increment.
        quantity: u32,
    },
}

/// Outcome of [`Cart::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityOutcome {
    /// The line's quantity was replaced.
    Updated(u32),
    /// The requested quantity was 0, so the line was removed.
    Removed,
}

/// Ordered collection of [`CartLine`] values.
///
/// Lines keep insertion order, `product_id` is unique across lines, and
/// every quantity is at least 1. Derived values are recomputed from the
/// lines on each read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines (not total quantity).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether some line references the given product.
    #[must_use]
    pub fn is_in_cart(&self, product_id: &str) -> bool {
        self.lines.iter().any(|line| line.product_id == product_id)
    }

    /// Find a line by its id.
    #[must_use]
    pub fn find_line(&self, line_id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == line_id)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    /// Sum of line totals in minor units.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.lines
            .iter()
            .fold(0, |total, line| total.saturating_add(line.line_total()))
    }

    /// Currency code shared by the cart's lines, when any exist.
    ///
    /// Lines snapshot their own currency; the first line's code stands for
    /// the cart in aggregate output.
    #[must_use]
    pub fn currency_code(&self) -> Option<&str> {
        self.lines.first().map(|line| line.currency.as_str())
    }

    /// Add a product, merging by `product_id`.
    ///
    /// Re-adding a product already in the cart increments that line's
    /// quantity by 1 and leaves its snapshotted display fields untouched.
    /// Otherwise a new quantity-1 line is appended.
    pub fn add(&mut self, product: &ProductDescriptor, added_at: Timestamp) -> AddOutcome {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            line.quantity = line.quantity.saturating_add(1);

            return AddOutcome::Incremented {
                line_id: line.id,
                quantity: line.quantity,
            };
        }

        let line = CartLine {
            id: Uuid::new_v4(),
            product_id: product.id.clone(),
            kind: product.kind,
            title: product.title.clone(),
            image_url: product.image_url.clone(),
            duration_label: product.duration_label.clone(),
            unit_price: product.unit_price,
            currency: product.currency_code().to_owned(),
            quantity: 1,
            added_at,
        };

        let line_id = line.id;
        self.lines.push(line);

        AddOutcome::Added { line_id }
    }

    /// Remove a line by id, returning it when present.
    pub fn remove(&mut self, line_id: Uuid) -> Option<CartLine> {
        let index = self.lines.iter().position(|line| line.id == line_id)?;

        Some(self.lines.remove(index))
    }

    /// Replace a line's quantity.
    ///
    /// A quantity of 0 removes the line rather than clamping it. Returns
    /// `None` when no line has the given id.
    pub fn set_quantity(&mut self, line_id: Uuid, quantity: u32) -> Option<QuantityOutcome> {
        if quantity == 0 {
            return self.remove(line_id).map(|_| QuantityOutcome::Removed);
        }

        let line = self.lines.iter_mut().find(|line| line.id == line_id)?;
        line.quantity = quantity;

        Some(QuantityOutcome::Updated(quantity))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
