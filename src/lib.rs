//! Kilima
//!
//! Kilima is the booking cart and order-intent aggregation core of a
//! tour-operator booking system: a persisted cart of tour, activity and
//! transfer selections, plus a one-shot checkout flow that fans the cart
//! out into order-intent rows against a hosted data store, with an
//! alternate chat-message export path.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod notifications;
pub mod orders;
pub mod persistence;
pub mod prelude;
pub mod products;
