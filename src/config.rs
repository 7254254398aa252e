// src/config.rs

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use thiserror::Error;

use crate::services::{quiz::DEFAULT_GENRES, ranking::DEFAULT_TOP_PLAYERS};

/// Default token lifetime: 24 hours.
pub const DEFAULT_JWT_EXPIRATION: u64 = 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Without one the server keeps everything in memory.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    /// Distinct ranks listed by the top players endpoint.
    pub top_players: usize,
    /// Genre catalog for genre questions.
    pub quiz_genres: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration = parse_var("JWT_EXPIRATION", DEFAULT_JWT_EXPIRATION)?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let port = parse_var("PORT", 8080)?;

        let top_players = parse_var("TOP_PLAYERS", DEFAULT_TOP_PLAYERS)?;

        let quiz_genres = match env::var("QUIZ_GENRES") {
            Ok(raw) => parse_genres(&raw),
            Err(_) => DEFAULT_GENRES.iter().map(|g| g.to_string()).collect(),
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            top_players,
            quiz_genres,
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

/// Splits a comma-separated genre list, ignoring blanks.
fn parse_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}
