use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::ProductData;
use crate::domain::product::models::CreateProductCommand;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::validation::Constraint;
use crate::validation::ValidationErrors;

pub async fn create_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    body: Result<Json<CreateProductRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<ProductData>, ApiError> {
    let Json(body) = body?;
    let command = body.try_into_command()?;

    tracing::debug!(user_id = %caller.user_id, name = %command.name, "Creating product");

    state
        .product_service
        .create_product(command)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::CREATED, product.into()))
}

/// HTTP request body for creating a product (raw JSON)
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CreateProductRequestBody {
    name: String,
    description: String,
    image: String,
    price: Option<f64>,
    quantity: i32,
}

impl CreateProductRequestBody {
    fn try_into_command(self) -> Result<CreateProductCommand, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.require("name", &self.name);

        match self.price {
            None => errors.add("price", Constraint::Required),
            Some(price) if !price.is_finite() => errors.add("price", Constraint::Finite),
            Some(price) if price < 0.0 => errors.add("price", Constraint::NonNegative),
            Some(_) => {}
        }

        if self.quantity < 0 {
            errors.add("quantity", Constraint::NonNegative);
        }

        errors.into_result(CreateProductCommand {
            name: self.name,
            description: self.description,
            image: self.image,
            price: self.price.unwrap_or_default(),
            quantity: self.quantity,
        })
    }
}
