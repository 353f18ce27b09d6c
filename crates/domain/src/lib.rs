//! Domain layer for the storefront backend.
//!
//! This crate provides the persisted entities and typed stores over the
//! generic document store:
//! - Products (the catalog, including live stock)
//! - Users and their login sessions
//! - Orders committed by checkout

pub mod error;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use doc_store::{Revision, Stored};
pub use error::DomainError;
pub use order::{CartItem, NewOrder, Order, OrderStatus, OrderStore};
pub use product::{CatalogStore, NewProduct, Product};
pub use session::{Session, SessionStore};
pub use user::{NewUser, User, UserStore};
