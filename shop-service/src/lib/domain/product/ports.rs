use async_trait::async_trait;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::Product;

/// Port for product domain service operations.
#[async_trait]
pub trait ProductServicePort: Send + Sync + 'static {
    /// Add a product to the catalogue.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_product(&self, command: CreateProductCommand) -> Result<Product, ProductError>;

    /// List the catalogue, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_products(&self) -> Result<Vec<Product>, ProductError>;
}

/// Persistence operations for products.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn create(&self, product: Product) -> Result<Product, ProductError>;

    async fn list_all(&self) -> Result<Vec<Product>, ProductError>;
}
