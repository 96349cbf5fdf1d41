//! Authentication utilities library
//!
//! Provides the authentication core used by the shop service:
//! - Password hashing (Argon2id)
//! - JWT access token issuance and verification (HS256)
//! - Authentication coordination
//!
//! The service defines its own ports and adapts these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_params(1024, 1, 1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{JwtHandler, SigningSecret};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(&SigningSecret::from("secret_key_at_least_32_bytes_long!"));
//! let token = handler.issue("user123", Duration::hours(1)).unwrap();
//! assert_eq!(handler.verify(&token).unwrap(), "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, PasswordHasher, SigningSecret};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(
//!     &SigningSecret::from("secret_key_at_least_32_bytes_long!"),
//!     Duration::hours(24),
//!     PasswordHasher::with_params(1024, 1, 1).unwrap(),
//! )
//! .unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("user123", "password123", &hash).unwrap();
//!
//! // Validate token
//! let subject = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(subject, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod secret;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use secret::SigningSecret;
