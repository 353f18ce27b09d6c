//! Checkout endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use checkout::CheckoutReceipt;
use doc_store::DocumentStore;
use domain::CartItem;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::auth::RequireAuth;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItemRequest>,
}

#[derive(Deserialize)]
pub struct CheckoutItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub order_id: String,
    pub total_price: f64,
}

impl From<CheckoutReceipt> for CheckoutResponse {
    fn from(receipt: CheckoutReceipt) -> Self {
        Self {
            order_id: receipt.order_id.to_string(),
            total_price: receipt.total,
        }
    }
}

/// POST /api/v1/cart/checkout — purchase the submitted cart.
#[tracing::instrument(skip(state, req), fields(user_id = %user_id, item_count = req.items.len()))]
pub async fn checkout<D: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<D>>>,
    RequireAuth(user_id): RequireAuth,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let items: Vec<CartItem> = req
        .items
        .into_iter()
        .map(|item| CartItem::new(item.product_id, item.quantity))
        .collect();

    let receipt = state.checkout.checkout(user_id, items).await?;
    Ok(Json(receipt.into()))
}
