use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Orchestrates registration and login over a repository and the shared
/// authenticator. Hashing and verification are CPU-bound and run on the
/// blocking thread pool.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn run_blocking<T, F>(&self, job: F) -> Result<T, UserError>
    where
        T: Send + 'static,
        F: FnOnce(&Authenticator) -> Result<T, UserError> + Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || job(authenticator.as_ref()))
            .await
            .map_err(|e| UserError::Unknown(format!("authentication task failed: {}", e)))?
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            tracing::info!("Registration rejected: email already registered");
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password = command.password;
        let password_hash = self
            .run_blocking(move |authenticator| {
                authenticator
                    .hash_password(password.expose())
                    .map_err(UserError::from)
            })
            .await?;

        let user = User {
            id: UserId::new(),
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AccessToken, UserError> {
        let user = self.repository.find_by_email(&command.email).await?;
        let password = command.password;

        let result = self
            .run_blocking(move |authenticator| match user {
                Some(user) => authenticator
                    .authenticate(
                        &user.id.to_string(),
                        password.expose(),
                        &user.password_hash,
                    )
                    .map(|result| (user.id, result.access_token))
                    .map_err(UserError::from),
                None => Err(authenticator
                    .reject_unknown_account(password.expose())
                    .into()),
            })
            .await;

        match result {
            Ok((user_id, token)) => {
                tracing::info!(user_id = %user_id, "User logged in");
                Ok(AccessToken::new(token))
            }
            Err(UserError::InvalidCredentials) => {
                tracing::info!("Login rejected: invalid credentials");
                Err(UserError::InvalidCredentials)
            }
            Err(e) => Err(e),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }
}
