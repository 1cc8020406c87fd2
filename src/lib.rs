// src/lib.rs

use axum::{
    http::{header, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use models::signup::ErrorResponse;
use services::{notifier::Notifier, signup::SignupService};

#[derive(Clone)]
pub struct AppState {
    pub signup: SignupService,
    pub notifier: Notifier,
}

pub mod config;

pub mod services {
    pub mod form;
    pub mod kv_store;
    pub mod notifier;
    pub mod signup;
}

pub mod models {
    pub mod signup;
}

pub mod handlers {
    pub mod signup;
}

/// Build the application router. Shared between `main` and the integration
/// tests so both exercise the same CORS and method-fallback behavior.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route(
            "/signup",
            post(handlers::signup::signup).options(handlers::signup::preflight),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The signup contract attaches all three CORS headers to every
        // response, error responses included, not just preflights.
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        ))
}

async fn health() -> &'static str {
    "Signup backend is running"
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Method not allowed".to_string(),
        }),
    )
}
