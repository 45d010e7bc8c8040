//! Cart operations: lazy creation, line mutations, total upkeep

use tracing::{error, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Cart;
use crate::repositories::{CartRepository, ProductRepository};

/// Cart operations over the product catalog and the cart store. Every
/// mutation recomputes the running total and persists through the
/// version-checked upsert; a stale version surfaces as a conflict and is
/// never retried here.
#[derive(Clone)]
pub struct CartService {
    products: ProductRepository,
    carts: CartRepository,
}

impl CartService {
    /// Create a new cart service
    pub fn new(products: ProductRepository, carts: CartRepository) -> Self {
        Self { products, carts }
    }

    /// Fetch the user's cart, materializing and persisting an empty one
    /// on first access.
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<Cart, ApiError> {
        if let Some(cart) = self.load(user_id).await? {
            return Ok(cart);
        }

        let cart = Cart::new(user_id);
        match self.carts.upsert(&cart).await.map_err(|e| {
            error!("Failed to create cart: {}", e);
            ApiError::Internal
        })? {
            Some(cart) => {
                info!("Created cart for user {}", user_id);
                Ok(cart)
            }
            // another request created it between the lookup and the insert
            None => self.load(user_id).await?.ok_or(ApiError::Internal),
        }
    }

    /// Add `quantity` of a product to the user's cart, creating the cart
    /// if it does not exist yet. A line that is already present is
    /// incremented; a new line snapshots the product's current name,
    /// price and image.
    pub async fn add(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Cart, ApiError> {
        if quantity < 1 {
            return Err(ApiError::Validation(
                "Quantity must be a positive integer".to_string(),
            ));
        }

        let product = self
            .products
            .by_id(product_id)
            .await
            .map_err(|e| {
                error!("Failed to look up product {}: {}", product_id, e);
                ApiError::Internal
            })?
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

        let mut cart = match self.load(user_id).await? {
            Some(cart) => cart,
            None => Cart::new(user_id),
        };

        cart.add_item(&product, quantity);
        self.persist(cart).await
    }

    /// Set a cart line to an absolute quantity; zero or less removes the
    /// line. The cart and the line must already exist.
    pub async fn update(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Cart, ApiError> {
        let mut cart = self
            .load(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Cart not found".to_string()))?;

        if !cart.set_item_quantity(product_id, quantity) {
            return Err(ApiError::NotFound("Item not found in cart".to_string()));
        }

        self.persist(cart).await
    }

    /// Remove a cart line. The cart and the line must already exist.
    pub async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<Cart, ApiError> {
        let mut cart = self
            .load(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Cart not found".to_string()))?;

        if !cart.remove_item(product_id) {
            return Err(ApiError::NotFound("Item not found in cart".to_string()));
        }

        self.persist(cart).await
    }

    /// Delete the user's cart record. Not an error when none exists; the
    /// next access re-materializes an empty cart.
    pub async fn clear(&self, user_id: Uuid) -> Result<(), ApiError> {
        let deleted = self.carts.delete(user_id).await.map_err(|e| {
            error!("Failed to clear cart: {}", e);
            ApiError::Internal
        })?;

        if deleted {
            info!("Cleared cart for user {}", user_id);
        }
        Ok(())
    }

    async fn load(&self, user_id: Uuid) -> Result<Option<Cart>, ApiError> {
        self.carts.find_by_user(user_id).await.map_err(|e| {
            error!("Failed to load cart: {}", e);
            ApiError::Internal
        })
    }

    async fn persist(&self, cart: Cart) -> Result<Cart, ApiError> {
        match self.carts.upsert(&cart).await.map_err(|e| {
            error!("Failed to persist cart: {}", e);
            ApiError::Internal
        })? {
            Some(cart) => Ok(cart),
            None => Err(ApiError::Conflict(
                "Cart was modified concurrently".to_string(),
            )),
        }
    }
}
