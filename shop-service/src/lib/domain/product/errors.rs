use thiserror::Error;

/// Top-level error for all product-related operations
#[derive(Debug, Clone, Error)]
pub enum ProductError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}
