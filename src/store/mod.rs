// src/store/mod.rs

//! Read/write access to players and the music catalog.
//!
//! The ranking engine and the question generator only ever see these traits,
//! so they run unchanged against Postgres or the in-memory store.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    catalog::{CatalogArtist, CountryTrackList},
    player::{NewPlayer, Player, PlayerId, ScoreRecord},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("pseudo '{0}' is already taken")]
    Conflict(String),

    #[error("player {0} does not exist")]
    PlayerNotFound(PlayerId),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Supplies the leaderboard snapshot.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Every current score record, in no particular order.
    async fn fetch_all_scores(&self) -> Result<Vec<ScoreRecord>, StoreError>;
}

/// Player accounts. The score workflow lives here, the ranking engine never writes.
#[async_trait]
pub trait PlayerStore: ScoreStore {
    async fn create_player(&self, player: NewPlayer) -> Result<Player, StoreError>;

    async fn find_by_pseudo(&self, pseudo: &str) -> Result<Option<Player>, StoreError>;

    async fn find_by_id(&self, id: PlayerId) -> Result<Option<Player>, StoreError>;

    /// Adds `score` to the player's total, bumps the games counter and
    /// keeps the last five scores in the history.
    async fn record_result(&self, id: PlayerId, score: i64) -> Result<Player, StoreError>;
}

/// Random samples of the catalog.
#[async_trait]
pub trait CatalogSampler: Send + Sync {
    /// Up to `count` artists sampled uniformly, optionally restricted to one genre tag.
    async fn sample_artists(
        &self,
        count: usize,
        genre: Option<&str>,
    ) -> Result<Vec<CatalogArtist>, StoreError>;

    /// Up to `count` country charts sampled uniformly,
    /// each sorted by descending track popularity.
    async fn sample_country_track_lists(
        &self,
        count: usize,
    ) -> Result<Vec<CountryTrackList>, StoreError>;
}

/// Number of scores kept in a player's history.
pub const SCORE_HISTORY_LEN: usize = 5;
