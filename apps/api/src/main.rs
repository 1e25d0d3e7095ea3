use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portfolio_api::catalog::content::ArticleContentStore;
use portfolio_api::catalog::Catalog;
use portfolio_api::config::Config;
use portfolio_api::contact::audit::JsonFileLog;
use portfolio_api::contact::service::EmailService;
use portfolio_api::email_client::connectivity::HostProbe;
use portfolio_api::email_client::EmailJsClient;
use portfolio_api::routes::build_router;
use portfolio_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "portfolio_api={level},tower_http={level}",
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Portfolio API v{}", env!("CARGO_PKG_VERSION"));

    // Static catalogs are read once; a broken catalog is a startup failure
    let catalog = Catalog::load(&config.content_dir)
        .await
        .with_context(|| format!("loading catalog from {}", config.content_dir.display()))?;
    let content = ArticleContentStore::new(config.content_dir.join("articles"));

    // Email transport, audit log and connectivity probe
    let email_config = config.email();
    if !email_config.is_complete() {
        warn!("EmailJS identifiers are empty; contact submissions will fail");
    }
    let transport = EmailJsClient::new(config.emailjs_public_key.clone())
        .context("building EmailJS client")?;
    let log = JsonFileLog::new(&config.submission_log_path);
    info!("Contact submissions logged to {}", log.path().display());
    let email = EmailService::new(
        email_config,
        Arc::new(transport),
        Arc::new(log),
        Arc::new(HostProbe::default()),
    );

    let state = AppState {
        catalog: Arc::new(catalog),
        content,
        email: Arc::new(email),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
