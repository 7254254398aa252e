// src/store/memory.rs

use async_trait::async_trait;
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tokio::sync::{Mutex, RwLock};

use super::{CatalogSampler, PlayerStore, SCORE_HISTORY_LEN, ScoreStore, StoreError};
use crate::models::{
    catalog::{CatalogArtist, CountryTrackList},
    player::{NewPlayer, Player, PlayerId, ScoreRecord},
};

/// In-process store used for local runs without a database and by the tests.
pub struct MemoryStore {
    players: RwLock<Vec<Player>>,
    artists: RwLock<Vec<CatalogArtist>>,
    charts: RwLock<Vec<CountryTrackList>>,
    rng: Mutex<StdRng>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose sampling is reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            players: RwLock::new(Vec::new()),
            artists: RwLock::new(Vec::new()),
            charts: RwLock::new(Vec::new()),
            rng: Mutex::new(rng),
        }
    }

    pub async fn insert_artists(&self, artists: impl IntoIterator<Item = CatalogArtist>) {
        self.artists.write().await.extend(artists);
    }

    /// Adds a chart; its tracks are re-sorted by popularity.
    pub async fn insert_chart(&self, chart: CountryTrackList) {
        let chart = CountryTrackList::new(chart.country, chart.tracks);
        self.charts.write().await.push(chart);
    }
}

#[async_trait]
impl ScoreStore for MemoryStore {
    async fn fetch_all_scores(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        let players = self.players.read().await;
        Ok(players.iter().map(Player::score_record).collect())
    }
}

#[async_trait]
impl PlayerStore for MemoryStore {
    async fn create_player(&self, player: NewPlayer) -> Result<Player, StoreError> {
        let mut players = self.players.write().await;
        if players.iter().any(|p| p.pseudo == player.pseudo) {
            return Err(StoreError::Conflict(player.pseudo));
        }

        let id = players.last().map_or(1, |p| p.id + 1);
        let created = Player {
            id,
            pseudo: player.pseudo,
            password: player.password_hash,
            score_total: 0,
            games_played: 0,
            score_history: Vec::new(),
            created_at: Some(chrono::Utc::now()),
        };
        players.push(created.clone());
        Ok(created)
    }

    async fn find_by_pseudo(&self, pseudo: &str) -> Result<Option<Player>, StoreError> {
        let players = self.players.read().await;
        Ok(players.iter().find(|p| p.pseudo == pseudo).cloned())
    }

    async fn find_by_id(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        let players = self.players.read().await;
        Ok(players.iter().find(|p| p.id == id).cloned())
    }

    async fn record_result(&self, id: PlayerId, score: i64) -> Result<Player, StoreError> {
        let mut players = self.players.write().await;
        let player = players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::PlayerNotFound(id))?;

        player.score_total += score;
        player.games_played += 1;
        player.score_history.push(score);
        let overflow = player.score_history.len().saturating_sub(SCORE_HISTORY_LEN);
        player.score_history.drain(..overflow);

        Ok(player.clone())
    }
}

#[async_trait]
impl CatalogSampler for MemoryStore {
    async fn sample_artists(
        &self,
        count: usize,
        genre: Option<&str>,
    ) -> Result<Vec<CatalogArtist>, StoreError> {
        let artists = self.artists.read().await;
        let matching: Vec<&CatalogArtist> = artists
            .iter()
            .filter(|a| genre.is_none_or(|g| a.genres.iter().any(|t| t == g)))
            .collect();

        let mut rng = self.rng.lock().await;
        Ok(matching
            .choose_multiple(&mut *rng, count)
            .map(|a| (*a).clone())
            .collect())
    }

    async fn sample_country_track_lists(
        &self,
        count: usize,
    ) -> Result<Vec<CountryTrackList>, StoreError> {
        let charts = self.charts.read().await;
        let mut rng = self.rng.lock().await;
        Ok(charts.choose_multiple(&mut *rng, count).cloned().collect())
    }
}
