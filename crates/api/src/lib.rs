//! HTTP API server with observability for the storefront backend.
//!
//! Provides REST endpoints for accounts, sessions, the product catalog,
//! and checkout, with structured logging (tracing) and Prometheus metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use checkout::CheckoutService;
use doc_store::DocumentStore;
use domain::{CatalogStore, OrderStore, SessionStore, UserStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState<D: DocumentStore> {
    pub users: UserStore<D>,
    pub sessions: SessionStore<D>,
    pub catalog: CatalogStore<D>,
    pub orders: OrderStore<D>,
    pub checkout: CheckoutService<D>,
    pub config: Config,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<D: DocumentStore + Clone + 'static>(
    state: Arc<AppState<D>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    let api = Router::new()
        .route("/register", post(routes::users::register::<D>))
        .route("/login", post(routes::users::login::<D>))
        .route("/logout", post(routes::users::logout::<D>))
        .route("/users/{id}", get(routes::users::get::<D>))
        .route(
            "/products",
            get(routes::products::list::<D>).post(routes::products::create::<D>),
        )
        .route(
            "/products/{id}",
            get(routes::products::get::<D>).put(routes::products::update::<D>),
        )
        .route("/cart/checkout", post(routes::cart::checkout::<D>))
        .route("/orders/{id}", get(routes::orders::get::<D>));

    Router::new()
        .route("/health", get(routes::health::check))
        .nest("/api/v1", api)
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over the given document store.
pub fn create_default_state<D: DocumentStore + Clone + 'static>(
    store: D,
    config: Config,
) -> Arc<AppState<D>> {
    Arc::new(AppState {
        users: UserStore::new(store.clone()),
        sessions: SessionStore::new(store.clone()),
        catalog: CatalogStore::new(store.clone()),
        orders: OrderStore::new(store.clone()),
        checkout: CheckoutService::new(store),
        config,
    })
}
