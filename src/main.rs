use nifty_scanner::config::Config;
use nifty_scanner::sources::YahooFinanceClient;
use nifty_scanner::{app, AppState, Scanner};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nifty_scanner=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Starting Nifty Scanner on {}:{}", config.host, config.port);

    let mut client = YahooFinanceClient::new(
        config.scanner.request_timeout(),
        config.scanner.max_upstream_requests,
    )?;
    if let Some(url) = &config.scanner.upstream_url {
        info!("Using upstream {}", url);
        client = client.with_base_url(url.as_str());
    }
    let provider = Arc::new(client);
    let scanner = Arc::new(Scanner::from_config(provider, &config.scanner));
    info!(
        "Universe: {} symbols, cache TTL {}s",
        scanner.universe().len(),
        config.scanner.cache_ttl.as_secs()
    );

    let app = app(AppState::new(scanner));

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Nifty Scanner listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
