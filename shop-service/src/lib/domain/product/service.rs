use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::ports::ProductRepository;
use crate::domain::product::ports::ProductServicePort;

/// Domain service implementation for product operations.
pub struct ProductService<PR>
where
    PR: ProductRepository,
{
    repository: Arc<PR>,
}

impl<PR> ProductService<PR>
where
    PR: ProductRepository,
{
    pub fn new(repository: Arc<PR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<PR> ProductServicePort for ProductService<PR>
where
    PR: ProductRepository,
{
    async fn create_product(&self, command: CreateProductCommand) -> Result<Product, ProductError> {
        let product = Product {
            id: ProductId::new(),
            name: command.name,
            description: command.description,
            image: command.image,
            price: command.price,
            quantity: command.quantity,
            created_at: Utc::now(),
        };

        let created = self.repository.create(product).await?;
        tracing::info!(product_id = %created.id, "Product created");

        Ok(created)
    }

    async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        self.repository.list_all().await
    }
}
