use clinivox_api::{build_router, state::AppState};
use clinivox_config::Settings;
use clinivox_db::{connect, indexes::ensure_indexes};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "clinivox_api=debug,clinivox_services=debug,clinivox_db=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load()?;
    info!("Starting Clinivox API on {}:{}", settings.app.host, settings.app.port);
    if settings.google.api_key.as_deref().is_none_or(str::is_empty) {
        warn!("Google API key not set: transcription and translation disabled");
    }
    if settings.claude.api_key.as_deref().is_none_or(str::is_empty) {
        warn!("Claude API key not set: prescription, pre-screening and analysis disabled");
    }

    let db = connect(&settings).await?;
    ensure_indexes(&db).await?;

    let app_state = AppState::new(db, settings.clone())?;
    let app = build_router(app_state);

    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
