//! Stock availability check against fetched catalog records.

use std::collections::HashMap;

use common::ProductId;
use domain::{CartItem, Product, Stored};

use crate::error::{CheckoutError, Result};

/// Cross-references requested quantities against the fetched products.
///
/// Items are checked in submission order and the first failure wins:
/// either the product has no catalog record, or the requested quantity
/// exceeds what is in stock. Performs no mutation; the commit step
/// re-checks quantities before each decrement.
pub fn check_stock(
    items: &[CartItem],
    products: &HashMap<ProductId, Stored<Product>>,
) -> Result<()> {
    for item in items {
        let Some(stored) = products.get(&item.product_id) else {
            return Err(CheckoutError::ProductNotFound(item.product_id.clone()));
        };

        if stored.doc.quantity < item.quantity {
            return Err(CheckoutError::InsufficientStock {
                product_id: item.product_id.clone(),
                name: stored.doc.name.clone(),
                requested: item.quantity,
                available: stored.doc.quantity,
            });
        }
    }
    Ok(())
}
