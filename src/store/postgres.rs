// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, types::Json};

use super::{CatalogSampler, PlayerStore, SCORE_HISTORY_LEN, ScoreStore, StoreError};
use crate::models::{
    catalog::{CatalogArtist, CatalogTrack, CountryTrackList},
    player::{NewPlayer, Player, PlayerId, ScoreRecord},
};

const PLAYER_COLUMNS: &str =
    "id, pseudo, password, score_total, games_played, score_history, created_at";

/// Postgres-backed store for players and the catalog tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Helper struct for decoding a row of 'country_tracks'.
#[derive(FromRow)]
struct CountryTracksRow {
    country: String,
    tracks: Json<Vec<CatalogTrack>>,
}

#[async_trait]
impl ScoreStore for PgStore {
    async fn fetch_all_scores(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        let records = sqlx::query_as::<_, ScoreRecord>(
            "SELECT id AS player_id, pseudo, score_total FROM players",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch leaderboard snapshot: {:?}", e);
            StoreError::from(e)
        })?;

        Ok(records)
    }
}

#[async_trait]
impl PlayerStore for PgStore {
    async fn create_player(&self, player: NewPlayer) -> Result<Player, StoreError> {
        let query = format!(
            "INSERT INTO players (pseudo, password) VALUES ($1, $2) RETURNING {PLAYER_COLUMNS}"
        );

        sqlx::query_as::<_, Player>(&query)
            .bind(&player.pseudo)
            .bind(&player.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                    return StoreError::Conflict(player.pseudo.clone());
                }
                tracing::error!("Failed to insert player: {:?}", e);
                StoreError::from(e)
            })
    }

    async fn find_by_pseudo(&self, pseudo: &str) -> Result<Option<Player>, StoreError> {
        let query = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE pseudo = $1");

        let player = sqlx::query_as::<_, Player>(&query)
            .bind(pseudo)
            .fetch_optional(&self.pool)
            .await?;

        Ok(player)
    }

    async fn find_by_id(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        let query = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1");

        let player = sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(player)
    }

    async fn record_result(&self, id: PlayerId, score: i64) -> Result<Player, StoreError> {
        // Slicing the appended array from (old length - keep + 2) keeps the newest entries.
        let query = format!(
            r#"
            UPDATE players SET
                score_total = score_total + $2,
                games_played = games_played + 1,
                score_history = (array_append(score_history, $2::BIGINT))
                    [GREATEST(cardinality(score_history) - $3 + 2, 1):]
            WHERE id = $1
            RETURNING {PLAYER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .bind(score)
            .bind(SCORE_HISTORY_LEN as i32)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to record quiz result: {:?}", e);
                StoreError::from(e)
            })?
            .ok_or(StoreError::PlayerNotFound(id))
    }
}

#[async_trait]
impl CatalogSampler for PgStore {
    async fn sample_artists(
        &self,
        count: usize,
        genre: Option<&str>,
    ) -> Result<Vec<CatalogArtist>, StoreError> {
        let artists = sqlx::query_as::<_, CatalogArtist>(
            r#"
            SELECT id, name, popularity, genres
            FROM artists
            WHERE $1::TEXT IS NULL OR $1 = ANY(genres)
            ORDER BY RANDOM()
            LIMIT $2
            "#,
        )
        .bind(genre)
        .bind(count as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to sample artists: {:?}", e);
            StoreError::from(e)
        })?;

        Ok(artists)
    }

    async fn sample_country_track_lists(
        &self,
        count: usize,
    ) -> Result<Vec<CountryTrackList>, StoreError> {
        let rows = sqlx::query_as::<_, CountryTracksRow>(
            "SELECT country, tracks FROM country_tracks ORDER BY RANDOM() LIMIT $1",
        )
        .bind(count as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to sample country charts: {:?}", e);
            StoreError::from(e)
        })?;

        Ok(rows
            .into_iter()
            .map(|row| CountryTrackList::new(row.country, row.tracks.0))
            .collect())
    }
}
