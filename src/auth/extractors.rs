use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

const BEARER_PREFIX: &str = "Bearer ";

/// Pulls the raw token out of an `Authorization` header value.
///
/// The scheme is matched case-sensitively with exactly one space. A missing
/// header, any other scheme, or an empty remainder are all `Unauthenticated`.
pub fn extract_bearer(header_value: Option<&str>) -> Result<&str, AppError> {
    let token = header_value
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .ok_or(AppError::Unauthenticated)?;

    if token.is_empty() {
        return Err(AppError::Unauthenticated);
    }
    Ok(token)
}

/// The identity resolved by `AuthMiddleware` for the current request.
///
/// Only valid on routes behind the middleware; anywhere else extraction
/// fails with `AppError::Unauthenticated`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>().cloned() {
            Some(user) => ready(Ok(AuthenticatedUser(user))),
            None => ready(Err(AppError::Unauthenticated.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_extract_bearer() {
        assert!(extract_bearer(None).is_err());
        assert!(extract_bearer(Some("")).is_err());
        assert!(extract_bearer(Some("Bearer ")).is_err());
        assert!(extract_bearer(Some("Bearer    ")).is_err());
        assert!(extract_bearer(Some("Token abc")).is_err());
        assert!(extract_bearer(Some("bearer abc")).is_err());
        assert!(extract_bearer(Some("BEARER abc")).is_err());
        assert!(extract_bearer(Some("Bearerabc")).is_err());
        assert!(extract_bearer(Some("Basic dXNlcjpwYXNz")).is_err());

        assert_eq!(extract_bearer(Some("Bearer abc")).unwrap(), "abc");
        assert_eq!(extract_bearer(Some("Bearer  abc ")).unwrap(), "abc");
    }

    #[test]
    fn test_extract_bearer_failures_are_unauthenticated() {
        for value in [None, Some("Token abc"), Some("Bearer ")] {
            assert!(matches!(
                extract_bearer(value),
                Err(AppError::Unauthenticated)
            ));
        }
    }

    #[actix_rt::test]
    async fn test_authenticated_user_extractor_success() {
        let user = User {
            id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            password_hash: "hash".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let req = actix_web::test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(user.clone());

        let mut payload = Payload::None;
        let extracted = AuthenticatedUser::from_request(&req, &mut payload).await;
        assert_eq!(extracted.unwrap().0.id, user.id);
    }

    #[actix_rt::test]
    async fn test_authenticated_user_extractor_failure() {
        let req = actix_web::test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let result = AuthenticatedUser::from_request(&req, &mut payload).await;

        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
