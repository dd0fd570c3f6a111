use crate::{clock::Clock, config::JwtSettings, error::AppError};
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifetime used when the caller does not ask for one.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;
/// Lifetime of the token handed out by registration and login.
pub const SESSION_TOKEN_TTL_MINUTES: i64 = 30;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's UUID in hyphenated form.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch). Always greater than `iat`.
    pub exp: i64,
}

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Signs and verifies bearer tokens.
///
/// `verify` collapses every failure (bad signature, wrong algorithm, expired,
/// missing or empty subject, garbage input) into `None`.
pub trait TokenCodec: Send + Sync {
    /// Signs a token for `subject`, valid for `ttl` or
    /// [`DEFAULT_TOKEN_TTL_MINUTES`] when `ttl` is `None`.
    fn sign(&self, subject: &str, ttl: Option<Duration>) -> Result<IssuedToken, AppError>;

    fn verify(&self, token: &str) -> Option<Claims>;
}

/// HMAC-signed JWTs under one process-wide secret and algorithm.
pub struct JwtCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtCodec {
    pub fn new(settings: &JwtSettings, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(settings.algorithm);
        // Expiry is checked against the injected clock in `verify`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            algorithm: settings.algorithm,
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            clock,
        }
    }
}

impl TokenCodec for JwtCodec {
    fn sign(&self, subject: &str, ttl: Option<Duration>) -> Result<IssuedToken, AppError> {
        if subject.trim().is_empty() {
            return Err(AppError::InternalServerError(
                "Refusing to sign a token without a subject".into(),
            ));
        }
        let ttl = ttl.unwrap_or_else(|| Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES));
        if ttl <= Duration::zero() {
            return Err(AppError::InternalServerError(format!(
                "Token lifetime must be positive (got {}ms)",
                ttl.num_milliseconds()
            )));
        }

        // Claims carry whole seconds; round the expiry up so a token never
        // lapses before `now + ttl`.
        let now = self.clock.now();
        let expires_at_ms = now.timestamp_millis().saturating_add(ttl.num_milliseconds());
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at_ms.saturating_add(999).div_euclid(1000),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))?;

        Ok(IssuedToken { token, claims })
    }

    fn verify(&self, token: &str) -> Option<Claims> {
        let claims = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!("Rejected bearer token: {}", e);
                return None;
            }
        };

        if claims.sub.trim().is_empty() {
            debug!("Rejected bearer token: empty subject");
            return None;
        }
        if claims.exp <= claims.iat {
            debug!("Rejected bearer token: expiry not after issue time");
            return None;
        }
        let now_ms = self.clock.now().timestamp_millis();
        if now_ms >= claims.exp.saturating_mul(1000) {
            debug!("Rejected bearer token: expired");
            return None;
        }

        Some(claims)
    }
}
