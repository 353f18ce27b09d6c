//! Order lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use common::OrderId;
use doc_store::DocumentStore;
use domain::Order;
use serde::Serialize;

use crate::AppState;
use crate::auth::RequireAuth;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub total: f64,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: i64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let items = order
            .items
            .iter()
            .map(|item| OrderItemResponse {
                product_id: item.product_id.to_string(),
                quantity: item.quantity,
            })
            .collect();

        Self {
            id: order.id.to_string(),
            user_id: order.user_id.to_string(),
            total: order.total,
            status: order.status.to_string(),
            items,
            created_at: order.created_at,
        }
    }
}

/// GET /api/v1/orders/{id} — fetch one of the caller's orders.
#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn get<D: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<D>>>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;

    // Callers can only see their own orders; anything else reads as absent.
    match state.orders.order_by_id(order_id).await? {
        Some(stored) if stored.doc.user_id == user_id => Ok(Json(stored.doc.into())),
        _ => Err(ApiError::NotFound(format!("Order {id} not found"))),
    }
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
