use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use backend::{
    AppState,
    analyzer::GeminiAnalyzer,
    config::Config,
    datastore::RestDatastore,
    middleware::log_errors,
    notifier::Mailer,
    routes,
};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USER_AGENT: &str = "SmartCircularCities/1.0";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    // One client shared by all three outbound integrations.
    let http = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to build HTTP client");

    let state = AppState {
        store: Arc::new(RestDatastore::new(
            http.clone(),
            &config.datastore_url,
            &config.datastore_api_key,
        )),
        analyzer: Arc::new(GeminiAnalyzer::new(
            http.clone(),
            &config.analyzer_api_key,
            &config.analyzer_model,
        )),
        notifier: Arc::new(Mailer::new(
            http,
            &config.mail_api_url,
            &config.mail_api_key,
            &config.mail_sender,
        )),
        config: config.clone(),
    };

    let app = routes::router(state)
        .layer(axum::middleware::from_fn(log_errors))
        // The dashboard frontend is served from a separate origin.
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Failed to start server");
}
