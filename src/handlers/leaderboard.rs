// src/handlers/leaderboard.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    config::Config,
    error::AppError,
    models::player::{PlayerId, RankedEntry, UserInfoResponse},
    services::ranking::{neighborhood, rank_players, top_summary},
    store::PlayerStore,
    utils::jwt::Claims,
};

/// Ranks a fresh snapshot and cuts the window around one player.
pub(crate) async fn ranking_window(
    players: &dyn PlayerStore,
    player_id: PlayerId,
) -> Result<Vec<RankedEntry>, AppError> {
    let ranked = rank_players(players.fetch_all_scores().await?);
    Ok(neighborhood(&ranked, player_id)?)
}

/// Best players, one per rank, for the home page.
pub async fn top_players(
    State(players): State<Arc<dyn PlayerStore>>,
    State(config): State<Config>,
) -> Result<impl IntoResponse, AppError> {
    let ranked = rank_players(players.fetch_all_scores().await?);

    Ok(Json(top_summary(&ranked, config.top_players)))
}

/// Current player's profile with the players ranked just above and below.
pub async fn get_me(
    State(players): State<Arc<dyn PlayerStore>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let player_id = claims.player_id()?;

    let player = players
        .find_by_id(player_id)
        .await?
        .ok_or(AppError::NotFound("Player not found".to_string()))?;

    let ranking = ranking_window(players.as_ref(), player_id).await?;

    Ok(Json(UserInfoResponse {
        user_info: player,
        ranking,
    }))
}
