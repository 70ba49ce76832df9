//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use gazette_core::domain::User;
use gazette_core::ports::{BaseRepository, PasswordService, TokenService, UserRepository};
use gazette_core::validate::RegistrationInput;
use gazette_shared::dto::{AuthResponse, LoginRequest};

use crate::handlers::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegistrationInput>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();
    input.validate().map_err(AppError::Validation)?;

    if state
        .users
        .find_by_username(&input.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("username already registered".to_string()));
    }

    let password_hash = password_service
        .hash(&input.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = User::new(input.username, input.email, password_hash);
    let saved = state.users.insert(user).await?;

    let token = token_service
        .generate_token(saved.id, &saved.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized);
    }

    let token = token_service
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}
