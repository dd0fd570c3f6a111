use crate::{
    auth::{
        authenticate, AuthResponse, AuthSession, AuthUser,
        AuthenticatedUser, LoginRequest, RegisterRequest, SESSION_TOKEN_TTL_MINUTES,
    },
    error::AppError,
    models::{User, UserProfile},
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::Duration;
use log::info;
use serde_json::json;
use validator::Validate;

fn session_for(state: &AppState, user: &User) -> Result<AuthResponse, AppError> {
    let issued = state.tokens.sign(
        &user.id.to_string(),
        Some(Duration::minutes(SESSION_TOKEN_TTL_MINUTES)),
    )?;

    Ok(AuthResponse {
        user: AuthUser {
            id: user.id,
            email: user.email.clone(),
        },
        session: AuthSession {
            access_token: issued.token,
            expires_at: issued.claims.exp,
        },
    })
}

/// Register a new user
///
/// Creates a new account and returns a 30-minute bearer token for it.
/// The password is validated before it is hashed; an oversized one never
/// reaches bcrypt.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest { email, password } = register_data.into_inner();

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let hasher = state.passwords.clone();
    let password_hash = web::block(move || hasher.hash(&password)).await??;

    let user = state.users.create(&email, &password_hash).await?;
    info!("Registered user {}", user.id);

    Ok(HttpResponse::Created().json(session_for(&state, &user)?))
}

/// Login user
///
/// Authenticates a user and returns a 30-minute bearer token.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = authenticate(
        state.users.as_ref(),
        &state.passwords,
        &login_data.email,
        &login_data.password,
    )
    .await?
    .ok_or(AppError::InvalidCredentials)?;

    Ok(HttpResponse::Ok().json(session_for(&state, &user)?))
}

/// Logout user
///
/// Tokens are stateless; the client discards its copy.
#[post("/logout")]
pub async fn logout() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "Logged out successfully" }))
}

/// Current user's profile.
#[get("/me")]
pub async fn me(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(UserProfile::from(&user.0))
}

/// Current user's id.
#[get("/user-id")]
pub async fn user_id(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(json!({ "user_id": user.0.id.to_string() }))
}
