use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Password;
use crate::inbound::http::router::AppState;
use crate::validation::Constraint;
use crate::validation::ValidationErrors;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = body?;

    let token = state
        .user_service
        .login(body.try_into_command()?)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            token: token.into_inner(),
        },
    ))
}

#[derive(Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

impl LoginRequestBody {
    fn try_into_command(self) -> Result<LoginCommand, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = if errors.require("email", &self.email) {
            EmailAddress::new(self.email)
                .map_err(|_| errors.add("email", Constraint::Email))
                .ok()
        } else {
            None
        };
        errors.require("password", &self.password);

        match email {
            Some(email) if errors.is_empty() => Ok(LoginCommand {
                email,
                password: Password::new(self.password),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}
