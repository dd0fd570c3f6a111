use uuid::Uuid;

use crate::auth::extractors::extract_bearer;
use crate::auth::token::TokenCodec;
use crate::error::AppError;
use crate::models::User;
use crate::store::UserStore;

/// Turns a raw `Authorization` header value into the stored user it names.
///
/// Header, signature, expiry, subject format and account existence are checked
/// in that order; any failure is `AppError::Unauthenticated`. Exactly one
/// storage lookup happens per call and nothing is cached. Storage errors
/// propagate unchanged.
pub async fn resolve_identity(
    header_value: Option<&str>,
    tokens: &dyn TokenCodec,
    users: &dyn UserStore,
) -> Result<User, AppError> {
    let token = extract_bearer(header_value)?;
    let claims = tokens.verify(token).ok_or(AppError::Unauthenticated)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthenticated)?;

    users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::Unauthenticated)
}
