use chrono::Duration;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::secret::SigningSecret;

/// Plaintext used to build the synthetic hash checked for unknown users.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Authentication coordinator combining password verification and JWT generation.
///
/// Holds the only copy of the signing secret's keys. Built once at startup
/// and shared read-only between requests.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
    decoy_hash: String,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// Computes a synthetic password hash with the given hasher so that
    /// logins for unknown accounts cost the same as logins with a wrong
    /// password.
    ///
    /// # Arguments
    /// * `secret` - Secret key for JWT signing
    /// * `token_ttl` - Lifetime of issued access tokens
    /// * `password_hasher` - Hasher configured with the desired cost
    ///
    /// # Returns
    /// Configured Authenticator instance
    ///
    /// # Errors
    /// * `PasswordError` - The synthetic hash could not be computed
    pub fn new(
        secret: &SigningSecret,
        token_ttl: Duration,
        password_hasher: PasswordHasher,
    ) -> Result<Self, AuthenticationError> {
        let decoy_hash = password_hasher.hash(DECOY_PASSWORD)?;

        Ok(Self {
            password_hasher,
            jwt_handler: JwtHandler::new(secret),
            token_ttl,
            decoy_hash,
        })
    }

    /// Lifetime of the tokens this authenticator issues.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Hashed password string
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and generate JWT token.
    ///
    /// # Arguments
    /// * `subject` - User identifier to place in the token
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        subject: &str,
        password: &str,
        stored_hash: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.issue(subject, self.token_ttl)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Reject a login attempt for an account that does not exist.
    ///
    /// Runs a full verification against the synthetic hash before returning,
    /// so the response time does not reveal whether the identifier is
    /// registered.
    ///
    /// # Arguments
    /// * `password` - Plaintext password supplied by the caller
    ///
    /// # Returns
    /// Always `InvalidCredentials`
    pub fn reject_unknown_account(&self, password: &str) -> AuthenticationError {
        let _ = self.password_hasher.verify(password, &self.decoy_hash);
        AuthenticationError::InvalidCredentials
    }

    /// Validate a JWT token and return the user identifier it was issued for.
    ///
    /// # Arguments
    /// * `token` - JWT token string
    ///
    /// # Returns
    /// Subject of the token
    ///
    /// # Errors
    /// * `JwtError` - Token is malformed, tampered with, or expired
    pub fn validate_token(&self, token: &str) -> Result<String, JwtError> {
        self.jwt_handler.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator(secret: &str) -> Authenticator {
        Authenticator::new(
            &SigningSecret::from(secret),
            Duration::hours(1),
            PasswordHasher::with_params(1024, 1, 1).unwrap(),
        )
        .expect("Failed to build authenticator")
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator("test_secret_key_at_least_32_bytes!");

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate("user123", password, &hash)
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());

        let subject = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(subject, "user123");
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator("test_secret_key_at_least_32_bytes!");

        let hash = authenticator.hash_password("my_password").unwrap();

        let result = authenticator.authenticate("user123", "wrong_password", &hash);
        assert_eq!(result, Err(AuthenticationError::InvalidCredentials));
    }

    #[test]
    fn test_authenticate_malformed_hash() {
        let authenticator = authenticator("test_secret_key_at_least_32_bytes!");

        let result = authenticator.authenticate("user123", "my_password", "plaintext");
        assert!(matches!(
            result,
            Err(AuthenticationError::PasswordError(
                PasswordError::MalformedHash(_)
            ))
        ));
    }

    #[test]
    fn test_authenticate_with_empty_secret() {
        let authenticator = authenticator("");
        let hash = authenticator.hash_password("my_password").unwrap();

        let result = authenticator.authenticate("user123", "my_password", &hash);
        assert!(matches!(
            result,
            Err(AuthenticationError::JwtError(JwtError::SigningFailed(_)))
        ));
    }

    #[test]
    fn test_reject_unknown_account() {
        let authenticator = authenticator("test_secret_key_at_least_32_bytes!");

        assert_eq!(
            authenticator.reject_unknown_account(DECOY_PASSWORD),
            AuthenticationError::InvalidCredentials
        );
    }

    #[test]
    fn test_rotated_secret_invalidates_tokens() {
        let before = authenticator("secret1_at_least_32_bytes_long_key!");
        let after = authenticator("secret2_at_least_32_bytes_long_key!");

        let hash = before.hash_password("my_password").unwrap();
        let token = before
            .authenticate("user123", "my_password", &hash)
            .unwrap()
            .access_token;

        assert_eq!(
            after.validate_token(&token),
            Err(JwtError::SignatureMismatch)
        );
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = authenticator("test_secret_key_at_least_32_bytes!");

        let result = authenticator.validate_token("invalid.token.here");
        assert!(matches!(result, Err(JwtError::MalformedToken(_))));
    }
}
