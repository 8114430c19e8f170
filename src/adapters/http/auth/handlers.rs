//! HTTP handlers for identity endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::adapters::http::extract::{parse_id, JsonBody};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{LoginCommand, RegisterUserCommand, UpdateProfileCommand};
use crate::application::AppError;
use crate::domain::foundation::UserId;

use super::dto::{
    LoginRequest, MeResponse, PublicProfileResponse, RegisterRequest, TokenResponse,
    UpdateProfileRequest,
};

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let result = state
        .register_handler()
        .handle(RegisterUserCommand {
            username: req.username,
            email: req.email,
            password: req.password,
            referral_code: req.referral_code,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token: result.token.token,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let result = state
        .login_handler()
        .handle(LoginCommand {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(TokenResponse {
        token: result.token.token,
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<MeResponse>, AppError> {
    let user = state.get_profile_handler().handle(user.id).await?;
    Ok(Json(MeResponse::from(&user)))
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<Json<MeResponse>, AppError> {
    let user = state
        .update_profile_handler()
        .handle(UpdateProfileCommand {
            user_id: user.id,
            update: req.into(),
        })
        .await?;
    Ok(Json(MeResponse::from(&user)))
}

/// GET /api/auth/users/:userId/profile
pub async fn public_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PublicProfileResponse>, AppError> {
    let user_id: UserId = parse_id(&user_id)?;
    let user = state.get_profile_handler().handle(user_id).await?;
    Ok(Json(PublicProfileResponse::from(&user)))
}
