// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use rand::{SeedableRng, rngs::StdRng};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::leaderboard::ranking_window,
    models::question::{FinishQuizRequest, QuizResultResponse},
    services::quiz::QuestionGenerator,
    store::{CatalogSampler, PlayerStore},
    utils::jwt::Claims,
};

/// Generates one multiple-choice question from the music catalog.
///
/// Each request seeds its own generator from OS entropy, so concurrent
/// requests never share a random stream.
pub async fn generate_question(
    State(generator): State<Arc<QuestionGenerator>>,
    State(catalog): State<Arc<dyn CatalogSampler>>,
) -> Result<impl IntoResponse, AppError> {
    let mut rng = StdRng::from_os_rng();

    let question = generator.generate(catalog.as_ref(), &mut rng).await?;

    Ok(Json(question))
}

/// Records the score of a finished quiz.
///
/// * Adds the score to the player's total and bumps the games counter.
/// * Keeps the five latest scores in the player's history.
/// * Returns the new total and the ranking window around the player.
pub async fn finish_quiz(
    State(players): State<Arc<dyn PlayerStore>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<FinishQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let player_id = claims.player_id()?;

    let player = players.record_result(player_id, req.score).await?;
    tracing::info!(
        "Player {} finished a quiz with {} points (total {})",
        player.id,
        req.score,
        player.score_total
    );

    let user_ranking = ranking_window(players.as_ref(), player_id).await?;

    Ok(Json(QuizResultResponse {
        score_total: player.score_total,
        user_ranking,
    }))
}

/// Current total and ranking window, shown at the end of a quiz.
pub async fn get_result(
    State(players): State<Arc<dyn PlayerStore>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let player_id = claims.player_id()?;

    let player = players
        .find_by_id(player_id)
        .await?
        .ok_or(AppError::NotFound("Player not found".to_string()))?;

    let user_ranking = ranking_window(players.as_ref(), player_id).await?;

    Ok(Json(QuizResultResponse {
        score_total: player.score_total,
        user_ranking,
    }))
}
