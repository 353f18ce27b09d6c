//! Checkout error types.

use common::ProductId;
use domain::DomainError;
use thiserror::Error;

/// Errors that can occur during checkout.
///
/// The first four variants mean the submitted cart itself is the problem
/// and resubmitting it unchanged will fail again. The remaining variants
/// come from the persistence side of the workflow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no items.
    #[error("cart is empty")]
    EmptyCart,

    /// An item asked for a zero or negative quantity.
    #[error("invalid quantity {quantity} for product ID {product_id}")]
    InvalidQuantity {
        product_id: ProductId,
        quantity: i64,
    },

    /// An item references a product the catalog does not have.
    #[error("product {0} is not available in the store, please refresh your cart")]
    ProductNotFound(ProductId),

    /// The requested quantity exceeds the available stock.
    #[error("product {name} is not available in the quantity requested")]
    InsufficientStock {
        product_id: ProductId,
        name: String,
        requested: i64,
        available: i64,
    },

    /// Another checkout updated the product's stock record first.
    #[error("stock for product {0} changed during checkout, please retry")]
    StockConflict(ProductId),

    /// Persisting a stock decrement failed.
    #[error("failed to update product stock for {product_id}: {source}")]
    StockUpdateFailed {
        product_id: ProductId,
        source: DomainError,
    },

    /// Persisting the order failed after stock was decremented.
    #[error("failed to create order: {source}")]
    OrderPersistFailed { source: DomainError },

    /// Fetching catalog records failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] DomainError),
}

impl CheckoutError {
    /// Returns true if the error is fixable by the client changing the
    /// cart, as opposed to a persistence failure or a lost write race.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CheckoutError::EmptyCart
                | CheckoutError::InvalidQuantity { .. }
                | CheckoutError::ProductNotFound(_)
                | CheckoutError::InsufficientStock { .. }
        )
    }
}

/// Result type alias for checkout operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;
