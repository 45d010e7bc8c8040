use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod cart;
mod error;
mod jwt;
mod middleware;
mod models;
mod password;
mod repositories;
mod routes;
mod seed;
mod state;
mod validation;

use common::database::{DatabaseConfig, init_pool};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    cart::CartService,
    jwt::{JwtConfig, JwtService},
    repositories::{CartRepository, ProductRepository, UserRepository},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting pastry shop API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    // The signing secret is required configuration; startup fails
    // without it.
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(&jwt_config);

    let user_repository = UserRepository::new(pool.clone());
    let product_repository = ProductRepository::new(pool.clone());
    let cart_repository = CartRepository::new(pool.clone());
    let cart_service = CartService::new(product_repository.clone(), cart_repository);

    let app_state = AppState {
        db_pool: pool,
        jwt_service,
        user_repository,
        product_repository,
        cart_service,
    };

    // Permissive CORS for the storefront frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Start the web server
    let app = routes::create_router(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    info!("Pastry shop API listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
