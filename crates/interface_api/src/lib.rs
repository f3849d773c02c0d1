//! HTTP API Layer
//!
//! This crate provides the REST API of the payment service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for bills, login and health
//! - **Middleware**: Bearer token authentication, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Problem documents for every failure
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(bill_store, user_port, config);
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_billing::{BillService, BillStore};
use domain_identity::UserPort;

use crate::auth::TokenService;
use crate::config::ApiConfig;
use crate::handlers::{auth as login, bills, health};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub bills: Arc<BillService>,
    pub users: Arc<dyn UserPort>,
    pub tokens: TokenService,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Wires the services over the given adapters
    pub fn new(
        bill_store: Arc<dyn BillStore>,
        users: Arc<dyn UserPort>,
        config: ApiConfig,
    ) -> Self {
        let tokens = TokenService::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
            config.jwt_expiration_secs,
        );
        Self {
            bills: Arc::new(BillService::new(bill_store)),
            users,
            tokens,
            config: Arc::new(config),
        }
    }
}

/// Creates the main API router
///
/// `/auth/login` and `/health*` are public; every `/bills` route requires a
/// bearer token.
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/auth/login", post(login::login));

    let bill_routes = Router::new()
        .route("/bills", post(bills::create_bill).get(bills::list_bills))
        .route("/bills/filter", get(bills::filter_bills))
        .route("/bills/import", post(bills::import_bills))
        .route(
            "/bills/:id",
            get(bills::get_bill)
                .put(bills::update_bill)
                .delete(bills::delete_bill),
        )
        .route("/bills/:id/pay", put(bills::pay_bill))
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(bill_routes)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
