use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    services::quiz::{QuestionGenerator, QuizError},
    store::{CatalogSampler, PlayerStore},
};

#[derive(Clone)]
pub struct AppState {
    pub players: Arc<dyn PlayerStore>,
    pub catalog: Arc<dyn CatalogSampler>,
    pub generator: Arc<QuestionGenerator>,
    pub config: Config,
}

impl AppState {
    /// Wires the stores together with a generator built from the configured genres.
    pub fn new(
        players: Arc<dyn PlayerStore>,
        catalog: Arc<dyn CatalogSampler>,
        config: Config,
    ) -> Result<Self, QuizError> {
        let generator = QuestionGenerator::new(config.quiz_genres.iter().cloned())?;

        Ok(Self {
            players,
            catalog,
            generator: Arc::new(generator),
            config,
        })
    }
}

impl FromRef<AppState> for Arc<dyn PlayerStore> {
    fn from_ref(state: &AppState) -> Self {
        state.players.clone()
    }
}

impl FromRef<AppState> for Arc<dyn CatalogSampler> {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

impl FromRef<AppState> for Arc<QuestionGenerator> {
    fn from_ref(state: &AppState) -> Self {
        state.generator.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
