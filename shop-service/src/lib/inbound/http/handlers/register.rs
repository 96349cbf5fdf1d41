use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::inbound::http::router::AppState;
use crate::validation::Constraint;
use crate::validation::ValidationErrors;

const PASSWORD_MIN_LENGTH: usize = 3;
const PASSWORD_MAX_LENGTH: usize = 130;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let Json(body) = body?;

    state
        .user_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequestBody {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterUserCommand, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.require("first_name", &self.first_name);
        errors.require("last_name", &self.last_name);

        let email = if errors.require("email", &self.email) {
            EmailAddress::new(self.email)
                .map_err(|_| errors.add("email", Constraint::Email))
                .ok()
        } else {
            None
        };

        if errors.require("password", &self.password) {
            errors.check_length(
                "password",
                &self.password,
                PASSWORD_MIN_LENGTH,
                PASSWORD_MAX_LENGTH,
            );
        }

        match email {
            Some(email) if errors.is_empty() => Ok(RegisterUserCommand {
                first_name: self.first_name,
                last_name: self.last_name,
                email,
                password: Password::new(self.password),
            }),
            _ => Err(errors),
        }
    }
}
