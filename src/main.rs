use dotenvy::dotenv;
use std::net::SocketAddr;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use volunteers::config::Config;
use volunteers::{database, web};

#[tokio::main]
async fn main() {
    // Load .env
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load();

    // 2. Connect to the database and bring the schema up to date
    info!(database_url = %config.database_url, "connecting to database");
    let pool = database::connect(&config.database_url)
        .await
        .expect("Cannot connect to database");
    if let Err(e) = database::migrate(&pool).await {
        error!("Migrations failed: {}", e);
        std::process::exit(1);
    }

    // 3. Build the application
    let app = web::router(pool);

    // 4. Start the server (with fallback port)
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Cannot parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback_port = config.port.saturating_add(1);
            warn!(
                "Could not bind {}: {}. Trying fallback {}:{}",
                addr, e, config.host, fallback_port
            );
            let fallback: SocketAddr = format!("{}:{}", config.host, fallback_port)
                .parse()
                .expect("Cannot parse fallback address");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Cannot bind fallback port")
        }
    };

    match listener.local_addr() {
        Ok(bound) => info!("Server listening on http://{}", bound),
        Err(e) => warn!("Could not read bound address: {}", e),
    }

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
