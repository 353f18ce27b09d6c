//! Checkout orchestration: one round trip from a submitted cart to a
//! committed order.

use std::collections::HashMap;

use common::{OrderId, ProductId, UserId};
use doc_store::{DocStoreError, DocumentStore, Stored};
use domain::{CartItem, CatalogStore, DomainError, NewOrder, OrderStore, Product};

use crate::error::{CheckoutError, Result};
use crate::phase::CheckoutPhase;
use crate::{cart, pricing, stock};

/// Outcome of a successful checkout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub total: f64,
}

/// Drives the checkout workflow over the catalog and order stores.
///
/// One call is one attempt: validate → fetch → check → price → commit, and
/// the first failure ends the request. Stock decrements are revision-checked
/// writes, so of two checkouts racing for the last units exactly one commits;
/// the loser fails without retrying and the client may resubmit the cart.
pub struct CheckoutService<D: DocumentStore> {
    catalog: CatalogStore<D>,
    orders: OrderStore<D>,
}

impl<D: DocumentStore + Clone> CheckoutService<D> {
    /// Creates a new checkout service over the given document store.
    pub fn new(store: D) -> Self {
        Self {
            catalog: CatalogStore::new(store.clone()),
            orders: OrderStore::new(store),
        }
    }

    /// Runs a checkout for the given user and cart items.
    ///
    /// On success every cart line has been decremented from stock and the
    /// order document is durable; the receipt carries the new order
    /// identifier and the total priced from the catalog records this
    /// request observed.
    #[tracing::instrument(skip(self, items), fields(user_id = %user_id, item_count = items.len()))]
    pub async fn checkout(&self, user_id: UserId, items: Vec<CartItem>) -> Result<CheckoutReceipt> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let checkout_start = std::time::Instant::now();
        let mut phase = CheckoutPhase::Received;

        // 1. Validate the cart
        let ids = match cart::validate_items(&items) {
            Ok(ids) => ids,
            Err(e) => return Err(fail(phase, e)),
        };
        phase = CheckoutPhase::Validated;
        tracing::debug!(phase = %phase, distinct_products = ids.len(), "cart validated");

        // 2. Fetch the referenced catalog records
        let mut products = match self.catalog.products_by_ids(&ids).await {
            Ok(products) => products,
            Err(e) => return Err(fail(phase, CheckoutError::Catalog(e))),
        };
        phase = CheckoutPhase::StockFetched;
        tracing::debug!(phase = %phase, fetched = products.len(), "catalog records fetched");

        // 3. Check requested quantities against stock
        if let Err(e) = stock::check_stock(&items, &products) {
            return Err(fail(phase, e));
        }
        phase = CheckoutPhase::StockChecked;
        tracing::debug!(phase = %phase, "stock verified");

        // 4. Price the cart
        let total = pricing::total_price(&items, &products);
        phase = CheckoutPhase::Priced;
        tracing::debug!(phase = %phase, total, "order total computed");

        // 5. Decrement stock per item, then persist the order
        let order_id = match self.commit(user_id, &items, &mut products, total).await {
            Ok(order_id) => order_id,
            Err(e) => return Err(fail(phase, e)),
        };
        phase = CheckoutPhase::Committed;

        let duration = checkout_start.elapsed().as_secs_f64();
        metrics::histogram!("checkout_duration_seconds").record(duration);
        metrics::counter!("checkout_commits_total").increment(1);
        tracing::info!(phase = %phase, %order_id, total, duration, "checkout committed");

        Ok(CheckoutReceipt { order_id, total })
    }

    /// Applies the checkout's writes: one revision-checked stock decrement
    /// per cart line in submission order, then the order document.
    ///
    /// Decrements persisted before a failure stay in place. Duplicate lines
    /// see the quantity and revision left by the earlier occurrence, so a
    /// cart can exhaust a product mid-commit.
    async fn commit(
        &self,
        user_id: UserId,
        items: &[CartItem],
        products: &mut HashMap<ProductId, Stored<Product>>,
        total: f64,
    ) -> Result<OrderId> {
        for item in items {
            let Some(stored) = products.get_mut(&item.product_id) else {
                return Err(CheckoutError::ProductNotFound(item.product_id.clone()));
            };

            // Re-check against what this request has already claimed
            if stored.doc.quantity < item.quantity {
                return Err(CheckoutError::InsufficientStock {
                    product_id: item.product_id.clone(),
                    name: stored.doc.name.clone(),
                    requested: item.quantity,
                    available: stored.doc.quantity,
                });
            }

            stored.doc.quantity -= item.quantity;
            let new_rev = match self.catalog.put_product(&stored.doc, stored.rev).await {
                Ok(rev) => rev,
                Err(DomainError::Store(DocStoreError::RevisionConflict { .. })) => {
                    return Err(CheckoutError::StockConflict(item.product_id.clone()));
                }
                Err(source) => {
                    tracing::error!(
                        %user_id,
                        product_id = %item.product_id,
                        error = %source,
                        "stock write failed mid-checkout, earlier decrements stay in place"
                    );
                    return Err(CheckoutError::StockUpdateFailed {
                        product_id: item.product_id.clone(),
                        source,
                    });
                }
            };
            stored.rev = new_rev;
        }

        match self
            .orders
            .create_order(NewOrder {
                user_id,
                total,
                items: items.to_vec(),
            })
            .await
        {
            Ok(order_id) => Ok(order_id),
            Err(source) => {
                tracing::error!(
                    %user_id,
                    total,
                    error = %source,
                    "order write failed after stock decrements, decrements stay in place"
                );
                Err(CheckoutError::OrderPersistFailed { source })
            }
        }
    }
}

fn fail(phase: CheckoutPhase, error: CheckoutError) -> CheckoutError {
    metrics::counter!("checkout_failures_total").increment(1);
    tracing::warn!(phase = %phase, error = %error, "checkout failed");
    error
}
