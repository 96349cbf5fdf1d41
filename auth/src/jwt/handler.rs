use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::claims::Claims;
use super::errors::JwtError;
use crate::secret::SigningSecret;

/// JWT token handler for issuing and verifying access tokens.
///
/// Uses HS256 (HMAC with SHA-256). The signature is compared in constant
/// time by `jsonwebtoken`. Expiration is checked strictly against the wall
/// clock with no leeway.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    has_secret: bool,
}

impl JwtHandler {
    /// Create a new JWT handler bound to a signing secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Returns
    /// JwtHandler instance configured with HS256 algorithm
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Changing the secret invalidates every token signed with the old one
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
            has_secret: !secret.is_empty(),
        }
    }

    /// Issue an access token for a subject.
    ///
    /// # Arguments
    /// * `subject` - User identifier placed in the `sub` claim
    /// * `ttl` - Lifetime of the token, must be positive
    ///
    /// # Returns
    /// Compact JWT string carrying `sub`, `exp` and `iat`
    ///
    /// # Errors
    /// * `SigningFailed` - Empty secret, non-positive TTL, or signing failure
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, JwtError> {
        if ttl <= Duration::zero() {
            return Err(JwtError::SigningFailed(
                "token lifetime must be positive".to_string(),
            ));
        }

        let claims = Claims::for_subject(subject, Utc::now(), ttl).ok_or_else(|| {
            JwtError::SigningFailed("token expiration is out of range".to_string())
        })?;

        self.encode(&claims)
    }

    /// Verify an access token and return its subject.
    ///
    /// # Arguments
    /// * `token` - JWT token string
    ///
    /// # Returns
    /// The `sub` claim of a token with a valid signature that has not expired
    ///
    /// # Errors
    /// * `MalformedToken` - Token cannot be parsed or lacks `sub`/`exp`
    /// * `SignatureMismatch` - Token was tampered with or signed with another secret
    /// * `TokenExpired` - Signature is valid but `exp` is in the past
    pub fn verify(&self, token: &str) -> Result<String, JwtError> {
        let claims: Claims = self.decode(token)?;

        claims
            .sub
            .ok_or_else(|| JwtError::MalformedToken("missing subject".to_string()))
    }

    /// Encode arbitrary claims into a JWT token.
    ///
    /// # Arguments
    /// * `claims` - Claims to encode (must implement Serialize)
    ///
    /// # Returns
    /// JWT token string
    ///
    /// # Errors
    /// * `SigningFailed` - Secret is empty or token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        if !self.has_secret {
            return Err(JwtError::SigningFailed("signing secret is empty".to_string()));
        }

        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// The signature is checked before any claim, so an expired token signed
    /// with another secret reports `SignatureMismatch`.
    ///
    /// # Arguments
    /// * `token` - JWT token string to decode
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `MalformedToken` - Token structure, encoding or required claims are invalid
    /// * `SignatureMismatch` - Token signature is invalid
    /// * `TokenExpired` - Token has expired
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        if !self.has_secret {
            return Err(JwtError::SignatureMismatch);
        }

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(classify)
    }
}

fn classify(error: JsonWebTokenError) -> JwtError {
    match error.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => JwtError::SignatureMismatch,
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::MalformedToken(error.to_string()),
    }
}
