//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::ProductId;
use doc_store::DocumentStore;
use domain::{NewProduct, Product};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::auth::RequireAuth;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct ProductPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub price: f64,
    pub quantity: i64,
}

impl From<ProductPayload> for NewProduct {
    fn from(payload: ProductPayload) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            image: payload.image,
            price: payload.price,
            quantity: payload.quantity,
        }
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name,
            description: product.description,
            image: product.image,
            price: product.price,
            quantity: product.quantity,
            created_at: product.created_at,
        }
    }
}

// -- Handlers --

/// GET /api/v1/products — list the whole catalog.
#[tracing::instrument(skip(state))]
pub async fn list<D: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<D>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.catalog.list_products().await?;
    let responses: Vec<ProductResponse> =
        products.into_iter().map(|p| p.doc.into()).collect();
    Ok(Json(responses))
}

/// GET /api/v1/products/{id} — fetch a single product.
#[tracing::instrument(skip(state))]
pub async fn get<D: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<D>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .catalog
        .product_by_id(&ProductId::new(id.as_str()))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;

    Ok(Json(product.doc.into()))
}

/// POST /api/v1/products — add a product to the catalog.
#[tracing::instrument(skip(state, payload), fields(user_id = %user_id, name = %payload.name))]
pub async fn create<D: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<D>>>,
    RequireAuth(user_id): RequireAuth,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = state.catalog.create_product(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(product.doc.into())))
}

/// PUT /api/v1/products/{id} — replace a product's fields.
#[tracing::instrument(skip(state, payload), fields(user_id = %user_id))]
pub async fn update<D: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<D>>>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product_id = ProductId::new(id.as_str());
    let current = state
        .catalog
        .product_by_id(&product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;

    let updated = state.catalog.update_product(&current, payload.into()).await?;
    Ok(Json(updated.doc.into()))
}
