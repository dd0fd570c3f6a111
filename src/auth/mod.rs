pub mod authenticator;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod resolver;
pub mod token;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Re-export necessary items
pub use authenticator::authenticate;
pub use extractors::{extract_bearer, AuthenticatedUser};
pub use middleware::AuthMiddleware;
pub use password::{ensure_password_length, PasswordHasher, MAX_PASSWORD_BYTES};
pub use resolver::resolve_identity;
pub use token::{
    Claims, IssuedToken, JwtCodec, TokenCodec, DEFAULT_TOKEN_TTL_MINUTES,
    SESSION_TOKEN_TTL_MINUTES,
};

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut error = ValidationError::new("length");
        error.message = Some(format!("must not exceed {} bytes", MAX_PASSWORD_BYTES).into());
        return Err(error);
    }
    Ok(())
}

/// Represents the payload for a user login request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// User's password. At most 72 bytes.
    #[validate(length(min = 1), custom = "validate_password_bytes")]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address for the new account.
    /// Must be a valid email format and at most 255 characters.
    #[validate(email, length(max = 255))]
    pub email: String,
    /// Password for the new account. At most 72 bytes.
    #[validate(length(min = 1), custom = "validate_password_bytes")]
    pub password: String,
}

/// The `user` half of an authentication response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// The `session` half of an authentication response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// The bearer token to send as `Authorization: Bearer <token>`.
    pub access_token: String,
    /// Token expiry, seconds since epoch.
    pub expires_at: i64,
}

/// Response structure after successful authentication (login or registration).
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    pub session: AuthSession,
}
