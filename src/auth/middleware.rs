use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::auth::resolver::resolve_identity;
use crate::error::AppError;
use crate::state::AppState;

/// Routes under the guarded scope that are reachable without a token.
const PUBLIC_PATHS: [&str; 3] = [
    "/api/auth/login",
    "/api/auth/register",
    "/api/auth/logout",
];

/// Runs identity resolution before every guarded route and stores the
/// resolved `User` in the request extensions for `AuthenticatedUser`.
///
/// A failed resolution is answered here with the error response; the
/// wrapped service is never called.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if PUBLIC_PATHS.contains(&req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let state = match req.app_data::<web::Data<AppState>>().cloned() {
                Some(state) => state,
                None => {
                    let err = AppError::InternalServerError("AppState is not registered".into());
                    return Ok(req.error_response(err).map_into_right_body());
                }
            };
            let authorization = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            match resolve_identity(
                authorization.as_deref(),
                state.tokens.as_ref(),
                state.users.as_ref(),
            )
            .await
            {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{get, http::StatusCode, test, App, HttpResponse, Responder};
    use std::sync::Arc;

    use crate::auth::AuthenticatedUser;
    use crate::config::{Config, JwtSettings};
    use crate::store::{InMemoryTaskStore, InMemoryUserStore, UserStore};

    #[get("/api/whoami")]
    async fn whoami(user: AuthenticatedUser) -> impl Responder {
        HttpResponse::Ok().body(user.0.email)
    }

    #[get("/api/auth/logout")]
    async fn open() -> impl Responder {
        HttpResponse::Ok().finish()
    }

    fn state(users: Arc<InMemoryUserStore>) -> web::Data<AppState> {
        let config = Config {
            database_url: String::new(),
            database_max_connections: 1,
            server_port: 0,
            server_host: "127.0.0.1".into(),
            jwt: JwtSettings {
                secret: "middleware-test-secret".into(),
                algorithm: jsonwebtoken::Algorithm::HS256,
            },
            bcrypt_cost: 4,
        };
        web::Data::new(AppState::new(&config, users, Arc::new(InMemoryTaskStore::new())).unwrap())
    }

    #[actix_rt::test]
    async fn test_guard_inserts_identity() {
        let users = Arc::new(InMemoryUserStore::new());
        let user = users.create("guarded@x.com", "hash").await.unwrap();
        let state = state(users);
        let token = state.tokens.sign(&user.id.to_string(), None).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(AuthMiddleware)
                .service(whoami),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token.token)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "guarded@x.com");
    }

    #[actix_rt::test]
    async fn test_guard_short_circuits_without_token() {
        let state = state(Arc::new(InMemoryUserStore::new()));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .wrap(AuthMiddleware)
                .service(whoami)
                .service(open),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/api/auth/logout").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_rt::test]
    async fn test_missing_state_is_a_server_error() {
        let app = test::init_service(App::new().wrap(AuthMiddleware).service(whoami)).await;

        let req = test::TestRequest::get()
            .uri("/api/whoami")
            .insert_header((header::AUTHORIZATION, "Bearer abc"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
