//! Application state shared across handlers

use sqlx::PgPool;

use crate::{
    cart::CartService,
    jwt::JwtService,
    repositories::{ProductRepository, UserRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub product_repository: ProductRepository,
    pub cart_service: CartService,
}
