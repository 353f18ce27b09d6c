//! Orders: cart items, the `Order` document, and typed access to it.

use chrono::{DateTime, Utc};
use common::{OrderId, ProductId, UserId};
use doc_store::{Collection, DocumentStore, DocumentStoreExt, PutOptions, Stored};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single line of a checkout cart.
///
/// Cart items are transient: they exist for the duration of one checkout
/// request and are embedded as item snapshots inside the committed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl CartItem {
    /// Creates a cart item.
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// The status of an order. Checkout creates orders as `Pending`; the rest
/// of the lifecycle is driven outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A committed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Total charged, computed from the catalog prices observed at checkout.
    pub total: f64,
    pub status: OrderStatus,
    /// Item snapshots, in the order they were submitted.
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
}

/// Payload for persisting a new order. The store assigns the identifier
/// and creation timestamp; the status starts as `Pending`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total: f64,
    pub items: Vec<CartItem>,
}

/// Typed access to order documents.
#[derive(Clone)]
pub struct OrderStore<D: DocumentStore> {
    store: D,
}

impl<D: DocumentStore> OrderStore<D> {
    /// Creates a new order store over the given document store.
    pub fn new(store: D) -> Self {
        Self { store }
    }

    /// Persists a new order and returns its identifier.
    #[tracing::instrument(skip(self, new), fields(user_id = %new.user_id))]
    pub async fn create_order(&self, new: NewOrder) -> Result<OrderId> {
        let order = Order {
            id: OrderId::new(),
            user_id: new.user_id,
            total: new.total,
            status: OrderStatus::Pending,
            items: new.items,
            created_at: Utc::now(),
        };

        self.store
            .put_typed(
                Collection::Orders,
                &order.id.to_string(),
                &order,
                PutOptions::expect_new(),
            )
            .await?;

        Ok(order.id)
    }

    /// Loads an order by identifier.
    pub async fn order_by_id(&self, id: OrderId) -> Result<Option<Stored<Order>>> {
        Ok(self
            .store
            .get_typed(Collection::Orders, &id.to_string())
            .await?)
    }
}
