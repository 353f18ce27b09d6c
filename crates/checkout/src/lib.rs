//! Checkout workflow for the storefront backend.
//!
//! Converts a submitted cart into a committed order in one round trip:
//! validate the items, fetch the referenced products, verify stock, price
//! the cart, decrement stock per item, and persist the order. The stock
//! writes are revision-checked, so concurrent checkouts cannot oversell a
//! product; a lost race fails the attempt instead of retrying.

pub mod cart;
pub mod error;
pub mod phase;
pub mod pricing;
pub mod service;
pub mod stock;

pub use error::{CheckoutError, Result};
pub use phase::CheckoutPhase;
pub use service::{CheckoutReceipt, CheckoutService};
