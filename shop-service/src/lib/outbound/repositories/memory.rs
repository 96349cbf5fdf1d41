//! Process-local repositories used when no database is configured.
//!
//! Data lives as long as the process. Uniqueness of user emails is enforced
//! under the write lock, mirroring the `users_email_lower_key` index.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Product;
use crate::domain::product::ports::ProductRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.iter().any(|existing| existing.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| &user.email == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users = self.users.read().await.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: Product) -> Result<Product, ProductError> {
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        let mut products = self.products.read().await.clone();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }
}
