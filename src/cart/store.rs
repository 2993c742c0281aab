//! Cart store.
//!
//! Owns the canonical in-memory [`Cart`], keeps it synchronized with a
//! durable local slot, and publishes every mutation as a [`CartEvent`] so
//! the rendering layer is never guessing about staleness.
//!
//! Loading is fail-open: an absent, empty or corrupt slot yields an empty
//! cart and never an error. Writes go through on every mutation; a write
//! failure is logged and the in-memory mutation stands.

use jiff::Timestamp;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    cart::{AddOutcome, Cart, QuantityOutcome},
    persistence::{CART_SLOT_KEY, CartSlot},
    products::ProductDescriptor,
};

/// A user-visible cart mutation, published for notification rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A new line was created.
    Added {
        /// Id of the new line.
        line_id: Uuid,
        /// Product the line references.
        product_id: String,
    },
    /// Re-adding an existing product bumped its line's quantity.
    QuantityIncreased {
        /// Id of the existing line.
        line_id: Uuid,
        /// Quantity after the increment.
        quantity: u32,
    },
    /// An explicit quantity change went through.
    QuantityUpdated {
        /// Id of the changed line.
        line_id: Uuid,
        /// The new quantity.
        quantity: u32,
    },
    /// A line left the cart.
    Removed {
        /// Id of the removed line.
        line_id: Uuid,
    },
    /// The whole cart was emptied.
    Cleared,
}

/// The canonical cart plus its write-through persistence slot.
///
/// Single-owner by construction: mutations take `&mut self`, which is the
/// compile-time rendering of "one add at a time". Callers that need shared
/// access wrap the store in their own lock.
#[derive(Debug)]
pub struct CartStore {
    cart: Cart,
    slot: Box<dyn CartSlot>,
}

impl CartStore {
    /// Load the cart from the given slot, falling back to an empty cart on
    /// any read or parse failure.
    #[must_use]
    pub fn new(slot: Box<dyn CartSlot>) -> Self {
        let cart = match slot.read() {
            Ok(Some(payload)) => serde_json::from_str(&payload).unwrap_or_else(|error| {
                warn!(key = CART_SLOT_KEY, %error, "persisted cart did not parse, starting empty");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(error) => {
                warn!(key = CART_SLOT_KEY, %error, "cart slot read failed, starting empty");
                Cart::new()
            }
        };

        Self { cart, slot }
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// An owned copy of the current cart for the rendering layer.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }

    /// Add a product, merging by product id.
    pub fn add(&mut self, product: &ProductDescriptor) -> CartEvent {
        let outcome = self.cart.add(product, Timestamp::now());
        self.persist();

        match outcome {
            AddOutcome::Added { line_id } => {
                info!(product_id = %product.id, %line_id, "added to cart");

                CartEvent::Added {
                    line_id,
                    product_id: product.id.clone(),
                }
            }
            AddOutcome::Incremented { line_id, quantity } => {
                info!(product_id = %product.id, %line_id, quantity, "cart quantity increased");

                CartEvent::QuantityIncreased { line_id, quantity }
            }
        }
    }

    /// Remove a line by id. `None` when no line had that id.
    pub fn remove(&mut self, line_id: Uuid) -> Option<CartEvent> {
        let removed = self.cart.remove(line_id)?;
        self.persist();

        info!(%line_id, product_id = %removed.product_id, "removed from cart");

        Some(CartEvent::Removed { line_id })
    }

    /// Replace a line's quantity; 0 removes the line. `None` when no line
    /// had that id.
    pub fn set_quantity(&mut self, line_id: Uuid, quantity: u32) -> Option<CartEvent> {
        let outcome = self.cart.set_quantity(line_id, quantity)?;
        self.persist();

        match outcome {
            QuantityOutcome::Updated(quantity) => {
                info!(%line_id, quantity, "cart quantity updated");

                Some(CartEvent::QuantityUpdated { line_id, quantity })
            }
            QuantityOutcome::Removed => {
                info!(%line_id, "removed from cart via zero quantity");

                Some(CartEvent::Removed { line_id })
            }
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> CartEvent {
        self.cart.clear();
        self.persist();

        info!("cart cleared");

        CartEvent::Cleared
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.cart) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(key = CART_SLOT_KEY, %error, "cart did not serialize, skipping persist");
                return;
            }
        };

        if let Err(error) = self.slot.write(&payload) {
            warn!(key = CART_SLOT_KEY, %error, "cart slot write failed, keeping in-memory cart");
        }
    }
}
