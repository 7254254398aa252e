// src/handlers/auth.rs

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::player::{NewPlayer, SignInRequest, SignUpRequest},
    store::PlayerStore,
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new player with a zero score.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created, or 409 Conflict when the pseudo is taken.
pub async fn sign_up(
    State(players): State<Arc<dyn PlayerStore>>,
    Json(payload): Json<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let password_hash = hash_password(&payload.password)?;

    let player = players
        .create_player(NewPlayer {
            pseudo: payload.pseudo,
            password_hash,
        })
        .await?;

    tracing::info!("Player {} signed up as '{}'", player.id, player.pseudo);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Player registered successfully" })),
    ))
}

/// Authenticates a player and returns a JWT token.
pub async fn sign_in(
    State(players): State<Arc<dyn PlayerStore>>,
    State(config): State<Config>,
    Json(payload): Json<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let player = players
        .find_by_pseudo(&payload.pseudo)
        .await?
        .ok_or(AppError::AuthError("Invalid pseudo or password".to_string()))?;

    if !verify_password(&payload.password, &player.password)? {
        return Err(AppError::AuthError("Invalid pseudo or password".to_string()));
    }

    let token = sign_jwt(player.id, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer"
    })))
}
