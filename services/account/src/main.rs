use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use account::{
    AppState,
    config::{AppConfig, StorageBackend},
    jwt::JwtService,
    repositories::{InMemoryUserRepository, PgUserRepository, UserRepository},
    routes,
    service::UserAccountService,
};
use common::database::{self, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting account service");

    let config = AppConfig::load()?;
    let jwt_service = JwtService::new(&config.jwt)?;

    let repository: Arc<dyn UserRepository> = match config.storage.backend {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = database::init_pool(&db_config).await?;

            // Check database connectivity
            if database::health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            let repository = PgUserRepository::new(pool);
            repository.ensure_schema().await?;
            Arc::new(repository)
        }
        StorageBackend::Memory => {
            info!("Using in-memory user storage; accounts are lost on restart");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let account_service = UserAccountService::new(repository, jwt_service)
        .with_repository_timeout(config.storage.timeout());
    let app_state = AppState::new(Arc::new(account_service));

    info!("Account service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    info!("Account service listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
