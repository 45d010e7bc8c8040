//! API service models

pub mod cart;
pub mod product;
pub mod user;

// Re-export for convenience
pub use cart::{Cart, CartItem};
pub use product::{NewProduct, Product};
pub use user::{LoginRequest, RegisterRequest, TokenResponse, User, UserResponse};
