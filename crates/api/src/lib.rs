//! Hypermedia-linked CRUD API for employees and orders.
//!
//! Every response wraps entities in HAL envelopes carrying `self` and
//! collection links, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod controller;
pub mod error;
pub mod hypermedia;
pub mod routes;
pub mod seed;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use domain::{Employee, Order};
use entity_store::{EntityStore, InMemoryEntityStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use controller::ResourceController;
use hypermedia::ResourceAssembler;

/// Shared application state: one store and one controller per resource.
#[derive(Clone)]
pub struct AppState {
    pub employee_store: Arc<dyn EntityStore<Employee>>,
    pub order_store: Arc<dyn EntityStore<Order>>,
    pub employees: Arc<ResourceController<Employee>>,
    pub orders: Arc<ResourceController<Order>>,
    pub base_url: String,
}

/// Creates the application state over the given stores.
pub fn create_state(
    employee_store: Arc<dyn EntityStore<Employee>>,
    order_store: Arc<dyn EntityStore<Order>>,
    base_url: &str,
) -> AppState {
    AppState {
        employees: Arc::new(ResourceController::new(
            employee_store.clone(),
            ResourceAssembler::new(base_url),
        )),
        orders: Arc::new(ResourceController::new(
            order_store.clone(),
            ResourceAssembler::new(base_url),
        )),
        employee_store,
        order_store,
        base_url: base_url.to_string(),
    }
}

/// Creates application state backed by empty in-memory stores.
pub fn create_in_memory_state(base_url: &str) -> AppState {
    create_state(
        Arc::new(InMemoryEntityStore::<Employee>::new()),
        Arc::new(InMemoryEntityStore::<Order>::new()),
        base_url,
    )
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: AppState, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let index_router = Router::new()
        .route("/", get(routes::index::get))
        .with_state(routes::index::root_links(&state.base_url));

    let health_router = Router::new()
        .route("/health", get(routes::health::check))
        .with_state(state.clone());

    Router::new()
        .merge(health_router)
        .merge(index_router)
        .merge(routes::resources::resource_router(state.employees))
        .merge(routes::resources::resource_router(state.orders))
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers([axum::http::header::LOCATION]),
        )
        .layer(TraceLayer::new_for_http())
}
