// src/models/catalog.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'artists' table, filled by the catalog ingestion job.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CatalogArtist {
    pub id: String,
    pub name: String,

    /// Spotify popularity, 0 to 100.
    pub popularity: i32,

    /// Genre tags, possibly empty.
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    pub popularity: i32,
    pub artists: Vec<String>,
    pub country: String,
}

/// A country's chart. Tracks are ordered by descending popularity,
/// so `tracks[0]` is the country's most popular track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryTrackList {
    pub country: String,
    pub tracks: Vec<CatalogTrack>,
}

impl CountryTrackList {
    /// Builds a list and restores the popularity ordering.
    /// The sort is stable, equal popularities keep their chart order.
    pub fn new(country: impl Into<String>, mut tracks: Vec<CatalogTrack>) -> Self {
        tracks.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        Self {
            country: country.into(),
            tracks,
        }
    }
}
