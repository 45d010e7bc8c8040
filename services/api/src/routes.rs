//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{ApiError, is_unique_violation},
    middleware::{CurrentUser, auth_middleware},
    models::{Cart, LoginRequest, RegisterRequest, TokenResponse, UserResponse},
    password, seed,
    state::AppState,
    validation,
};

/// Request to add a product to the cart
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Quantity query parameter for cart item updates
#[derive(Debug, Deserialize)]
pub struct UpdateQuantity {
    pub quantity: i32,
}

/// Response wrapper for cart mutations
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub message: String,
    pub cart: Cart,
}

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/me", get(me))
        .route("/cart", get(get_cart))
        .route("/cart/add", post(add_to_cart))
        .route("/cart/update/:product_id", put(update_cart_item))
        .route("/cart/remove/:product_id", delete(remove_cart_item))
        .route("/cart/clear", delete(clear_cart))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/products", get(list_products))
        .route("/products/category/:category", get(products_by_category))
        .route("/products/:id", get(get_product))
        .route("/init-data", post(init_data))
        .merge(protected_routes);

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    common::database::health_check(&state.db_pool).await?;

    Ok(Json(json!({
        "status": "ok",
        "service": "pastry-shop-api"
    })))
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_email(&payload.email).map_err(ApiError::Validation)?;
    validation::validate_username(&payload.username).map_err(ApiError::Validation)?;
    validation::validate_password(&payload.password).map_err(ApiError::Validation)?;

    let existing = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up email: {}", e);
            ApiError::Internal
        })?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&payload.password)?;
    let user = state
        .user_repository
        .insert(&payload.email, &payload.username, &password_hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                // lost the race between the lookup and the insert
                ApiError::Conflict("Email already registered".to_string())
            } else {
                error!("Failed to create user: {}", e);
                ApiError::Internal
            }
        })?;

    info!("Registered user {}", user.email);
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Log in with email and password, receiving a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up email: {}", e);
            ApiError::Internal
        })?;

    // Unknown email and wrong password get the same generic rejection.
    let Some(user) = user else {
        return Err(ApiError::Unauthorized);
    };
    if !password::verify_password(&user.password_hash, &payload.password)? {
        return Err(ApiError::Unauthorized);
    }

    let access_token = state.jwt_service.issue(&user.email).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::Internal
    })?;

    info!("Issued token for {}", user.email);
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.jwt_service.token_expiry(),
    }))
}

/// Current authenticated user
pub async fn me(Extension(user): Extension<CurrentUser>) -> impl IntoResponse {
    Json(UserResponse {
        id: user.id,
        email: user.email,
        username: user.username,
    })
}

/// List the whole catalog
pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let products = state.product_repository.all().await.map_err(|e| {
        error!("Failed to list products: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(products))
}

/// List products in a category (exact label match)
pub async fn products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let products = state
        .product_repository
        .by_category(&category)
        .await
        .map_err(|e| {
            error!("Failed to list products by category: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(products))
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .product_repository
        .by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get product: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

/// Fetch the caller's cart, creating an empty one on first access
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let cart = state.cart_service.get_or_create(user.id).await?;
    Ok(Json(cart))
}

/// Add a product to the caller's cart
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cart = state
        .cart_service
        .add(user.id, payload.product_id, payload.quantity)
        .await?;

    Ok(Json(CartResponse {
        message: "Item added to cart".to_string(),
        cart,
    }))
}

/// Set the quantity of a cart line; zero removes it
pub async fn update_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
    Query(query): Query<UpdateQuantity>,
) -> Result<impl IntoResponse, ApiError> {
    let cart = state
        .cart_service
        .update(user.id, product_id, query.quantity)
        .await?;

    Ok(Json(CartResponse {
        message: "Cart updated".to_string(),
        cart,
    }))
}

/// Remove a cart line
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let cart = state.cart_service.remove(user.id, product_id).await?;

    Ok(Json(CartResponse {
        message: "Item removed from cart".to_string(),
        cart,
    }))
}

/// Delete the caller's cart record
pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    state.cart_service.clear(user.id).await?;

    Ok(Json(json!({ "message": "Cart cleared" })))
}

/// Seed the sample catalog; a no-op when products already exist
pub async fn init_data(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let inserted = seed::init_sample_data(&state.product_repository).await?;

    let message = if inserted == 0 {
        "Sample data already exists"
    } else {
        "Sample data initialized successfully"
    };
    Ok(Json(json!({ "message": message })))
}
