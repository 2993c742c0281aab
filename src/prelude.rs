//! Kilima prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        AddOutcome, Cart, CartLine, QuantityOutcome,
        store::{CartEvent, CartStore},
    },
    checkout::{
        CheckoutError, CheckoutFlow, CheckoutForm, Confirmation, FormField,
        message::{chat_deep_link, render_order_message},
    },
    config::{Config, NotifyConfig, RemoteConfig},
    notifications::{NoopSink, NotificationError, NotificationSink, RestNotificationSink},
    orders::{GatewayError, IntentStatus, OrderIntent, OrderRecord, OrdersGateway, RestOrdersGateway},
    persistence::{CART_SLOT_KEY, CartSlot, CartSlotError, FileSlot, MemorySlot},
    products::{DEFAULT_CURRENCY, ProductDescriptor, ProductKind},
};
