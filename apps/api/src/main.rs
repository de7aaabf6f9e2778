use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_cell::AccountService;
use hospital_api::{check_config, create_router};
use shared_config::AppConfig;
use shared_database::{AppState, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hospital management server");

    // Load configuration
    let config = AppConfig::from_env();
    check_config(&config)?;

    let db = Database::connect_and_migrate(&config.database_url)
        .await
        .context("could not open the hospital database")?;

    if let Some(admin) = &config.admin {
        AccountService::new(&db)
            .ensure_admin(admin)
            .await
            .context("could not create the administrator account")?;
    }

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, db));

    let app = create_router(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
            .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
    );

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("could not bind {}", bind_addr))?;
    info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
