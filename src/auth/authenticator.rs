use actix_web::web;

use crate::auth::password::{ensure_password_length, PasswordHasher};
use crate::error::AppError;
use crate::models::User;
use crate::store::UserStore;

/// Checks an email/password pair for the login flow.
///
/// Returns `Ok(None)` for an unknown email and for a wrong password alike;
/// both paths run exactly one bcrypt verification. Oversized passwords are
/// rejected before any lookup or hashing.
pub async fn authenticate(
    users: &dyn UserStore,
    passwords: &PasswordHasher,
    email: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    ensure_password_length(password)?;

    let user = users.find_by_email(email).await?;

    let hasher = passwords.clone();
    let password = password.to_owned();
    let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
    let matched = web::block(move || match stored_hash {
        Some(hash) => hasher.verify(&password, &hash),
        None => hasher.verify_decoy(&password),
    })
    .await?;

    Ok(user.filter(|_| matched))
}
