// src/models/player.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Opaque player identity.
pub type PlayerId = i64;

static PSEUDO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("pseudo pattern is valid"));

/// Represents the 'players' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,

    /// Unique display name.
    pub pseudo: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub score_total: i64,

    pub games_played: i64,

    /// The five most recent quiz scores, oldest first.
    pub score_history: Vec<i64>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Player {
    pub fn score_record(&self) -> ScoreRecord {
        ScoreRecord {
            player_id: self.id,
            pseudo: self.pseudo.clone(),
            score_total: self.score_total,
        }
    }
}

/// One row of the leaderboard snapshot.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub player_id: PlayerId,
    pub pseudo: String,
    pub score_total: i64,
}

/// A score record with its dense rank (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    #[serde(flatten)]
    pub record: ScoreRecord,
    pub rank: u32,
}

/// Insert payload handed to the store once the password is hashed.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub pseudo: String,
    pub password_hash: String,
}

/// DTO for signing up.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(
        length(
            min = 3,
            max = 50,
            message = "Pseudo length must be between 3 and 50 characters."
        ),
        regex(
            path = *PSEUDO_PATTERN,
            message = "Pseudo may only contain letters, digits, '_' and '-'."
        )
    )]
    pub pseudo: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for signing in.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1, max = 50))]
    pub pseudo: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Profile of the current player together with the ranking window around them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub user_info: Player,
    pub ranking: Vec<RankedEntry>,
}
