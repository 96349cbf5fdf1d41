use std::sync::Arc;

use auth::Authenticator;
use shop_service::config::Config;
use shop_service::domain::product::ports::ProductServicePort;
use shop_service::domain::product::service::ProductService;
use shop_service::domain::user::ports::UserServicePort;
use shop_service::domain::user::service::UserService;
use shop_service::inbound::http::router::create_router;
use shop_service::outbound::repositories::InMemoryProductRepository;
use shop_service::outbound::repositories::InMemoryUserRepository;
use shop_service::outbound::repositories::PostgresProductRepository;
use shop_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shop_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "shop-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let token_ttl = config.auth.token_ttl()?;

    tracing::info!(
        http_port = config.server.http_port,
        database = config.database.is_some(),
        token_ttl_seconds = token_ttl.num_seconds(),
        argon2_memory_kib = config.auth.password.memory_kib,
        argon2_iterations = config.auth.password.iterations,
        "Configuration loaded"
    );

    let password_hasher = config.auth.password.build_hasher()?;
    let authenticator = Arc::new(Authenticator::new(
        &config.auth.secret,
        token_ttl,
        password_hasher,
    )?);

    let (user_service, product_service) =
        match &config.database {
            Some(database) => {
                let pg_pool = PgPoolOptions::new()
                    .max_connections(database.max_connections)
                    .connect(&database.url)
                    .await?;
                tracing::info!(
                    max_connections = database.max_connections,
                    database = "postgresql",
                    "Database connection pool created"
                );

                sqlx::migrate!("./migrations").run(&pg_pool).await?;
                tracing::info!(database = "postgresql", "Database migrations completed");

                let user_service: Arc<dyn UserServicePort> = Arc::new(UserService::new(
                    Arc::new(PostgresUserRepository::new(pg_pool.clone())),
                    Arc::clone(&authenticator),
                ));
                let product_service: Arc<dyn ProductServicePort> = Arc::new(
                    ProductService::new(Arc::new(PostgresProductRepository::new(pg_pool))),
                );
                (user_service, product_service)
            }
            None => {
                tracing::warn!("No database configured, data is kept in memory only");
                let user_service: Arc<dyn UserServicePort> = Arc::new(UserService::new(
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::clone(&authenticator),
                ));
                let product_service: Arc<dyn ProductServicePort> = Arc::new(
                    ProductService::new(Arc::new(InMemoryProductRepository::new())),
                );
                (user_service, product_service)
            }
        };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, product_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
