use sea_orm::Database;
use tracing::info;

use portal::config::PortalConfig;
use portal::infra::mailer::HttpMailer;
use portal::router::build_router;
use portal::state::AppState;
use portal_core::config::Config;
use portal_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing("portal");

    let config = PortalConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer = HttpMailer::new(
        config.mail_api_url,
        config.mail_api_key,
        config.mail_sender,
    );

    let state = AppState {
        db,
        mailer,
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        public_base_url: config.public_base_url,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.portal_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("portal service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
    info!("portal service stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
