mod cli;

use axum::Router;
use backend::dbs::{self, DatabaseConfig};
use backend::service::CharacterService;
use clap::Parser;
use std::net::SocketAddr;
use tower_http::services::ServeDir;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
    let cli = cli::Cli::parse();

    let db = dbs::connect(&DatabaseConfig::from_url(&cli.database_url)).await?;
    let service = CharacterService::from_config(&cli.service_config(), db)?;

    let router = match &cli.dist_dir {
        Some(dist_dir) => Router::new().fallback_service(ServeDir::new(dist_dir)),
        None => Router::new(),
    };
    let addr = SocketAddr::new(cli.host, cli.port);
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let router = backend::init(router, service);
    axum::serve(listener, router).await?;
    Ok(())
}
