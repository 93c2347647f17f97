//! Formgate Server entry point.

use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use formgate_server::AppState;
use formgate_server::config::Config;
use formgate_server::rate_limit;

#[tokio::main]
async fn main() {
    let config = Config::parse();
    init_tracing(&config);

    let state = AppState::new(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mail_configured = state.mailer().is_configured(),
        contact_limit = config.contact_limit,
        careers_limit = config.careers_limit,
        "Formgate Server starting",
    );

    let app = formgate_server::router(state.clone());

    let addr = SocketAddr::new(config.host.parse().expect("invalid host"), config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");

    // Reclaims memory from expired per-client counters
    let sweeper = rate_limit::spawn_sweeper(
        state.rate_limiter().clone(),
        Duration::from_secs(config.sweep_interval),
    );

    tracing::info!(%addr, "Formgate Server ready");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("server error");

    sweeper.stop();
    tracing::info!("Formgate Server shut down");
}

fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    match config.log_format.as_str() {
        "json" => builder.json().init(),
        _ => builder.init(),
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install signal handler");
    tracing::info!("Shutdown signal received");
}
