//! Shared identifier types used across the storefront backend crates.

pub mod types;

pub use types::{OrderId, ProductId, UserId};
