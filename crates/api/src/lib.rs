pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Upper bound for a single audio upload.
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.app.cors_origins);

    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login));

    let doctor_routes = Router::new()
        .route("/", get(routes::doctor::list))
        .route("/{doctor_id}", get(routes::doctor::get));

    let speech_routes = Router::new()
        .route("/transcribe", post(routes::speech::transcribe))
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/doctor", doctor_routes)
        .nest("/speech", speech_routes)
        .route("/translate", post(routes::translate::translate))
        .route("/prescription", post(routes::prescription::generate))
        .route("/prescreening", post(routes::prescreening::next_turn))
        .route("/analysis", post(routes::analysis::analyze));

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Any origin when none are configured, otherwise exactly the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
