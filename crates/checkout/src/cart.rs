//! Cart validation, the entry gate of the checkout workflow.

use common::ProductId;
use domain::CartItem;

use crate::error::{CheckoutError, Result};

/// Validates raw cart items and derives the product identifiers to fetch.
///
/// An empty cart is rejected first; after that, the first item with a zero
/// or negative quantity fails the whole cart. Returns the distinct product
/// identifiers in order of first occurrence. Duplicate occurrences stay in
/// the item list itself and are processed independently downstream.
pub fn validate_items(items: &[CartItem]) -> Result<Vec<ProductId>> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut ids: Vec<ProductId> = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
            });
        }
        if !ids.contains(&item.product_id) {
            ids.push(item.product_id.clone());
        }
    }
    Ok(ids)
}
