//! Summary Gateway
//!
//! A stateless HTTP relay that takes plain report text (usually OCR output
//! from the browser), asks an upstream language model for a patient-friendly
//! bullet-point summary, and returns it as `{ "content": ... }`.
//!
//! # Modules
//!
//! - `config`: Environment-driven configuration
//! - `upstream`: Provider trait and the Groq/Ollama request shapes
//! - `gateway`: Outbound call and reply normalization
//! - `routes`: HTTP handlers

pub mod config;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod state;
pub mod upstream;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::CorsConfig;
use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(routes::health::banner))
        .nest("/health", routes::health::router())
        .nest("/api/summarize", routes::summarize::router());

    if state.config().enable_generate_passthrough {
        router = router.nest("/api/generate", routes::generate::router());
    }

    router
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config().cors))
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = match config.allowed_origin.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            tracing::warn!("Ignoring invalid ALLOWED_ORIGIN ({}), allowing any origin", e);
            AllowOrigin::from(Any)
        }
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
