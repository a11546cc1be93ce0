use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{ServerConfig, SiteConfig};
use crate::handlers::{health, robots, sitemap, submit_contact, AppState};
use crate::middleware::{cache_control, normalize_content_type};
use crate::openapi::ApiDoc;
use contactdesk::{ConnectionSupervisor, StoreConnector, StoreDescriptor, SupervisorConfig};
use contactdesk_relay::{RelayConfig, RelayManager};

pub async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let descriptor = StoreDescriptor::from_env();
    let supervisor_config = SupervisorConfig::from_env();

    tracing::info!(
        store = %descriptor.redacted_address(),
        database = %descriptor.database,
        collection = %descriptor.collection,
        max_attempts = supervisor_config.max_attempts,
        retry_delay_ms = supervisor_config.retry_delay.as_millis() as u64,
        "Connecting to document store"
    );

    // Nothing is served until the store is reachable; exhaustion propagates
    // to the binary, which exits.
    let connector = StoreConnector::from_descriptor(descriptor)?;
    let supervisor = Arc::new(ConnectionSupervisor::new(supervisor_config));
    let connected = Arc::clone(&supervisor).spawn(connector).await??;

    let relays = RelayManager::new(RelayConfig::load_or_default(&config.data_dir));
    tracing::info!(
        sheet = relays.sheet_enabled(),
        messenger = relays.messenger_enabled(),
        "Relays configured"
    );

    let state = Arc::new(AppState {
        store: connected.handle,
        supervisor,
        relays,
        site: SiteConfig::from_env(),
    });

    let app = build_router(state, config.max_body_kb);

    tracing::info!("Starting contactdesk on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Full application router: API routes, generated site files, OpenAPI UI,
/// the static site as fallback, and the middleware stack.
pub fn build_router(state: Arc<AppState>, max_body_kb: usize) -> Router {
    let max_age = state.site.cache_max_age;
    let public_dir = state.site.public_dir.clone();

    let routes = Router::new()
        .route("/health", get(health))
        .route("/contact", post(submit_contact))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .with_state(state);

    let swagger = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    let app = Router::new().merge(routes).merge(swagger);

    let app = if public_dir.is_dir() {
        tracing::info!("Static site enabled from {:?}", public_dir);
        app.fallback_service(ServeDir::new(&public_dir))
    } else {
        tracing::warn!(
            "Public directory not found at {:?}, skipping static site",
            public_dir
        );
        app
    };

    app.layer(middleware::from_fn(move |request: Request, next: Next| {
        cache_control(request, next, max_age)
    }))
    .layer(DefaultBodyLimit::max(max_body_kb * 1024))
    .layer(middleware::from_fn(normalize_content_type))
    .layer(CorsLayer::very_permissive().max_age(std::time::Duration::from_secs(86400)))
    .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
