//! Order total computation.

use std::collections::HashMap;

use common::ProductId;
use domain::{CartItem, Product, Stored};

/// Computes the order total: the sum over the cart of requested quantity
/// times the unit price observed in the fetched products.
///
/// Every occurrence of a product contributes, so duplicate cart lines are
/// summed. Items with no fetched product contribute nothing; the stock
/// check rejects such carts before pricing runs.
pub fn total_price(items: &[CartItem], products: &HashMap<ProductId, Stored<Product>>) -> f64 {
    let mut total = 0.0;
    for item in items {
        if let Some(stored) = products.get(&item.product_id) {
            total += stored.doc.price * item.quantity as f64;
        }
    }
    total
}
