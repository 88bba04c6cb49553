use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{
    config::ServerConfig,
    models::Book,
    repositories::BookRepository,
    routes, seed,
    state::AppState,
};
use auth::{JwtConfig, JwtService, UserRepository};
use common::MemoryStore;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Wookie Books API service");

    let config = ServerConfig::from_env()?;

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    // Initialize repositories
    let user_repository = UserRepository::in_memory();
    let book_store: MemoryStore<Book> = if config.seed_demo_data {
        user_repository.seed(&seed::demo_users()).await?;
        MemoryStore::with_records(seed::demo_books())
    } else {
        MemoryStore::new()
    };
    let book_repository = BookRepository::new(book_store, config.block_list());

    if config.seed_demo_data {
        info!(
            "Loaded demo data: {} users, {} books",
            user_repository.list().await.len(),
            book_repository.list(None).await?.len()
        );
    }

    let app_state = AppState::new(jwt_service, user_repository, book_repository);

    // Start the web server
    let app = routes::create_router(app_state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down API service");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
