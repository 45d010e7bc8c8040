//! Repositories for database operations

pub mod cart;
pub mod product;
pub mod user;

// Re-export for convenience
pub use cart::CartRepository;
pub use product::ProductRepository;
pub use user::UserRepository;
