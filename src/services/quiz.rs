// src/services/quiz.rs

//! Multiple-choice question generation from catalog samples.
//!
//! Each request picks one of three strategies at random and retries with a fresh
//! pick when the attempt fails, up to [`MAX_ATTEMPTS`] times.

use rand::{
    Rng,
    seq::{IndexedRandom, SliceRandom},
};
use thiserror::Error;

use crate::{
    models::{catalog::CatalogArtist, question::Question},
    store::{CatalogSampler, StoreError},
};

/// Attempts per request before giving up.
pub const MAX_ATTEMPTS: usize = 3;

const CHOICE_COUNT: usize = 4;
const ARTIST_SAMPLE_SIZE: usize = 4;
const MAIN_GENRE_SAMPLE_SIZE: usize = 3;
const SECONDARY_GENRE_SAMPLE_SIZE: usize = 1;
const COUNTRY_SAMPLE_SIZE: usize = 4;

/// Genres offered by default, matching the tags of the ingested catalog.
pub const DEFAULT_GENRES: [&str; 11] = [
    "j-pop",
    "rock",
    "jazz",
    "blues",
    "classical",
    "rap",
    "r&b",
    "pop",
    "hip hop",
    "french hip hop",
    "k-pop",
];

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("not enough catalog data: {0}")]
    InsufficientData(&'static str),

    #[error("catalog fetch failed: {0}")]
    Fetch(#[from] StoreError),

    #[error("no valid question after {attempts} attempts")]
    GenerationFailed { attempts: usize },

    #[error("the genre catalog needs at least two distinct genres")]
    InvalidGenreCatalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Which of four artists is the most popular.
    TopArtist,
    /// Which genre dominates a group of four artists.
    GenreMajority,
    /// Country of a charting track, or top track of a country.
    RegionalTrend,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::TopArtist,
        Strategy::GenreMajority,
        Strategy::RegionalTrend,
    ];

    fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Builds quiz questions. Holds only configuration, so one instance is shared by all requests.
#[derive(Debug, Clone)]
pub struct QuestionGenerator {
    genres: Vec<String>,
}

impl QuestionGenerator {
    /// Creates a generator over a genre catalog.
    /// Duplicate genres are dropped; fewer than two distinct genres is an error.
    pub fn new<I, S>(genres: I) -> Result<Self, QuizError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for genre in genres {
            let genre = genre.into();
            if !unique.contains(&genre) {
                unique.push(genre);
            }
        }

        if unique.len() < 2 {
            return Err(QuizError::InvalidGenreCatalog);
        }

        Ok(Self { genres: unique })
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Generates one question, retrying with a new random strategy on failure.
    ///
    /// An attempt counts only if the strategy succeeds and produced at least one choice.
    pub async fn generate<R>(
        &self,
        catalog: &dyn CatalogSampler,
        rng: &mut R,
    ) -> Result<Question, QuizError>
    where
        R: Rng + Send,
    {
        for attempt in 1..=MAX_ATTEMPTS {
            let strategy = Strategy::pick(rng);

            match self.generate_with(strategy, catalog, rng).await {
                Ok(question) if !question.choices.is_empty() => return Ok(question),
                Ok(_) => {
                    tracing::debug!(attempt, ?strategy, "Generated question has no choices");
                }
                Err(e) => {
                    tracing::debug!(attempt, ?strategy, error = %e, "Question attempt failed");
                }
            }
        }

        tracing::warn!("Unable to generate a question after {} attempts", MAX_ATTEMPTS);
        Err(QuizError::GenerationFailed {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Runs a single strategy once, without retrying.
    pub async fn generate_with<R>(
        &self,
        strategy: Strategy,
        catalog: &dyn CatalogSampler,
        rng: &mut R,
    ) -> Result<Question, QuizError>
    where
        R: Rng + Send,
    {
        match strategy {
            Strategy::TopArtist => top_artist_question(catalog, rng).await,
            Strategy::GenreMajority => self.genre_majority_question(catalog, rng).await,
            Strategy::RegionalTrend => regional_trend_question(catalog, rng).await,
        }
    }

    async fn genre_majority_question<R>(
        &self,
        catalog: &dyn CatalogSampler,
        rng: &mut R,
    ) -> Result<Question, QuizError>
    where
        R: Rng + Send,
    {
        let mut pool = self.genres.clone();
        pool.shuffle(rng);
        let main_genre = pool[0].clone();
        let secondary_genre = pool[1].clone();

        let mut artists = catalog
            .sample_artists(MAIN_GENRE_SAMPLE_SIZE, Some(main_genre.as_str()))
            .await?;
        artists.extend(
            catalog
                .sample_artists(SECONDARY_GENRE_SAMPLE_SIZE, Some(secondary_genre.as_str()))
                .await?,
        );

        if artists.is_empty() {
            return Err(QuizError::InsufficientData("no artists for the chosen genres"));
        }

        let names: Vec<&str> = artists.iter().map(|a| a.name.as_str()).collect();
        let mut question = Question::new(
            format!(
                "Which music genre is most represented among these artists: {}?",
                names.join(", ")
            ),
            main_genre.clone(),
        );
        question.push_choice(main_genre.as_str());
        question.push_choice(secondary_genre.as_str());

        pool.shuffle(rng);
        for genre in pool
            .iter()
            .filter(|g| **g != main_genre && **g != secondary_genre)
        {
            if question.choices.len() >= CHOICE_COUNT {
                break;
            }
            question.push_choice(genre.as_str());
        }

        question.choices.shuffle(rng);
        Ok(question)
    }
}

/// The most popular artist of a sample; on equal popularity the earliest one wins.
pub fn most_popular(artists: &[CatalogArtist]) -> Option<&CatalogArtist> {
    artists.iter().fold(None, |best, artist| match best {
        Some(best) if artist.popularity <= best.popularity => Some(best),
        _ => Some(artist),
    })
}

async fn top_artist_question<R>(
    catalog: &dyn CatalogSampler,
    rng: &mut R,
) -> Result<Question, QuizError>
where
    R: Rng + Send,
{
    let artists = catalog.sample_artists(ARTIST_SAMPLE_SIZE, None).await?;
    let winner = most_popular(&artists).ok_or(QuizError::InsufficientData("no artists"))?;

    let mut question = Question::new(
        "Which artist is the most streamed?".to_string(),
        winner.name.clone(),
    );
    for artist in &artists {
        question.push_choice(artist.name.as_str());
    }

    question.choices.shuffle(rng);
    Ok(question)
}

async fn regional_trend_question<R>(
    catalog: &dyn CatalogSampler,
    rng: &mut R,
) -> Result<Question, QuizError>
where
    R: Rng + Send,
{
    let charts = catalog.sample_country_track_lists(COUNTRY_SAMPLE_SIZE).await?;
    if charts.len() < COUNTRY_SAMPLE_SIZE {
        return Err(QuizError::InsufficientData("fewer than four country charts"));
    }

    let chart = &charts[0];
    let Some(top_track) = chart.tracks.first() else {
        return Err(QuizError::InsufficientData("empty country chart"));
    };

    let mut question = if rng.random_bool(0.5) {
        let track = chart
            .tracks
            .choose(rng)
            .ok_or(QuizError::InsufficientData("empty country chart"))?;

        let mut question = Question::new(
            format!("In which country is the track '{}' the most popular?", track.name),
            chart.country.clone(),
        );
        for other in &charts[1..] {
            question.push_choice(other.country.as_str());
        }
        question.push_choice(chart.country.as_str());
        question
    } else {
        let mut question = Question::new(
            format!("What is the most popular track in {}?", chart.country),
            top_track.name.clone(),
        );
        for track in chart.tracks[1..]
            .iter()
            .filter(|t| t.name != top_track.name)
        {
            if question.choices.len() >= CHOICE_COUNT - 1 {
                break;
            }
            question.push_choice(track.name.as_str());
        }
        question.push_choice(top_track.name.as_str());
        question
    };

    question.choices.shuffle(rng);
    Ok(question)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::models::catalog::{CatalogTrack, CountryTrackList};

    /// Deterministic catalog: returns matching items in insertion order.
    #[derive(Default)]
    struct FakeCatalog {
        artists: Vec<CatalogArtist>,
        charts: Vec<CountryTrackList>,
        failing: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogSampler for FakeCatalog {
        async fn sample_artists(
            &self,
            count: usize,
            genre: Option<&str>,
        ) -> Result<Vec<CatalogArtist>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(self
                .artists
                .iter()
                .filter(|a| genre.is_none_or(|g| a.genres.iter().any(|t| t == g)))
                .take(count)
                .cloned()
                .collect())
        }

        async fn sample_country_track_lists(
            &self,
            count: usize,
        ) -> Result<Vec<CountryTrackList>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(self.charts.iter().take(count).cloned().collect())
        }
    }

    fn artist(name: &str, popularity: i32, genres: &[&str]) -> CatalogArtist {
        CatalogArtist {
            id: format!("id-{name}"),
            name: name.to_string(),
            popularity,
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn chart(country: &str, tracks: &[(&str, i32)]) -> CountryTrackList {
        CountryTrackList::new(
            country,
            tracks
                .iter()
                .map(|(name, popularity)| CatalogTrack {
                    id: format!("{country}-{name}"),
                    name: name.to_string(),
                    popularity: *popularity,
                    artists: vec!["Someone".to_string()],
                    country: country.to_string(),
                })
                .collect(),
        )
    }

    fn full_catalog() -> FakeCatalog {
        let mut artists = Vec::new();
        for genre in DEFAULT_GENRES {
            for i in 0..3 {
                artists.push(artist(&format!("{genre} artist {i}"), 40 + i, &[genre]));
            }
        }

        FakeCatalog {
            artists,
            charts: vec![
                chart("France", &[("F2", 70), ("F1", 90), ("F3", 60), ("F4", 50), ("F5", 40)]),
                chart("USA", &[("U1", 95), ("U2", 80)]),
                chart("Spain", &[("S1", 88)]),
                chart("Germany", &[("G1", 77), ("G2", 66)]),
            ],
            ..Default::default()
        }
    }

    fn generator() -> QuestionGenerator {
        QuestionGenerator::new(DEFAULT_GENRES).unwrap()
    }

    fn assert_valid(question: &Question) {
        assert!(
            (2..=CHOICE_COUNT).contains(&question.choices.len()),
            "unexpected choice count in {question:?}"
        );
        let mut unique = question.choices.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), question.choices.len(), "duplicate choices in {question:?}");
        assert_eq!(
            question.choices.iter().filter(|c| **c == question.answer).count(),
            1,
            "answer must appear exactly once in {question:?}"
        );
    }

    #[test]
    fn most_popular_prefers_first_of_tied_maxima() {
        let artists = vec![
            artist("A", 50, &[]),
            artist("B", 80, &[]),
            artist("C", 80, &[]),
            artist("D", 30, &[]),
        ];
        assert_eq!(most_popular(&artists).map(|a| a.name.as_str()), Some("B"));
        assert!(most_popular(&[]).is_none());
    }

    #[test]
    fn generator_requires_two_distinct_genres() {
        assert!(matches!(
            QuestionGenerator::new(["rock", "rock"]),
            Err(QuizError::InvalidGenreCatalog)
        ));
        assert!(matches!(
            QuestionGenerator::new(Vec::<String>::new()),
            Err(QuizError::InvalidGenreCatalog)
        ));

        let generator = QuestionGenerator::new(["rock", "jazz", "rock"]).unwrap();
        assert_eq!(generator.genres(), ["rock", "jazz"]);
    }

    #[tokio::test]
    async fn top_artist_answer_is_first_tied_maximum() {
        let catalog = FakeCatalog {
            artists: vec![
                artist("A", 50, &[]),
                artist("B", 80, &[]),
                artist("C", 80, &[]),
                artist("D", 30, &[]),
            ],
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(7);

        let question = generator()
            .generate_with(Strategy::TopArtist, &catalog, &mut rng)
            .await
            .unwrap();

        assert_eq!(question.answer, "B");
        let mut choices = question.choices.clone();
        choices.sort();
        assert_eq!(choices, ["A", "B", "C", "D"]);
        assert_valid(&question);
    }

    #[tokio::test]
    async fn top_artist_without_artists_is_insufficient() {
        let catalog = FakeCatalog::default();
        let mut rng = StdRng::seed_from_u64(1);

        let result = generator()
            .generate_with(Strategy::TopArtist, &catalog, &mut rng)
            .await;

        assert!(matches!(result, Err(QuizError::InsufficientData(_))));
    }

    #[tokio::test]
    async fn genre_majority_answers_the_main_genre() {
        let catalog = full_catalog();
        let generator = generator();

        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let question = generator
                .generate_with(Strategy::GenreMajority, &catalog, &mut rng)
                .await
                .unwrap();

            assert_valid(&question);
            assert_eq!(question.choices.len(), CHOICE_COUNT);
            assert!(question.choices.iter().all(|c| DEFAULT_GENRES.contains(&c.as_str())));
            // three artists of the main genre are named in the prompt
            assert!(question.question.contains(&format!("{} artist 2", question.answer)));
        }
    }

    #[tokio::test]
    async fn genre_majority_without_artists_is_insufficient() {
        let catalog = FakeCatalog::default();
        let mut rng = StdRng::seed_from_u64(3);

        let result = generator()
            .generate_with(Strategy::GenreMajority, &catalog, &mut rng)
            .await;

        assert!(matches!(result, Err(QuizError::InsufficientData(_))));
    }

    #[tokio::test]
    async fn regional_trend_covers_both_forms() {
        let catalog = full_catalog();
        let generator = generator();
        let mut country_questions = 0;
        let mut track_questions = 0;

        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let question = generator
                .generate_with(Strategy::RegionalTrend, &catalog, &mut rng)
                .await
                .unwrap();
            assert_valid(&question);

            if question.question.starts_with("In which country") {
                country_questions += 1;
                assert_eq!(question.answer, "France");
                let mut choices = question.choices.clone();
                choices.sort();
                assert_eq!(choices, ["France", "Germany", "Spain", "USA"]);
            } else {
                track_questions += 1;
                assert_eq!(question.answer, "F1");
                let mut choices = question.choices.clone();
                choices.sort();
                assert_eq!(choices, ["F1", "F2", "F3", "F4"]);
            }
        }

        assert!(country_questions > 0);
        assert!(track_questions > 0);
    }

    #[tokio::test]
    async fn regional_trend_accepts_single_track_chart() {
        let mut catalog = full_catalog();
        catalog.charts.rotate_left(2); // Spain first, one track
        let generator = generator();

        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let question = generator
                .generate_with(Strategy::RegionalTrend, &catalog, &mut rng)
                .await
                .unwrap();

            if question.question.starts_with("What is the most popular track") {
                assert_eq!(question.choices, ["S1"]);
                assert_eq!(question.answer, "S1");
            } else {
                assert_eq!(question.answer, "Spain");
                assert_eq!(question.choices.len(), 4);
            }
        }
    }

    #[tokio::test]
    async fn regional_trend_needs_four_countries() {
        let mut catalog = full_catalog();
        catalog.charts.truncate(3);
        let mut rng = StdRng::seed_from_u64(5);

        let result = generator()
            .generate_with(Strategy::RegionalTrend, &catalog, &mut rng)
            .await;

        assert!(matches!(result, Err(QuizError::InsufficientData(_))));
    }

    #[tokio::test]
    async fn generated_questions_are_valid() {
        let catalog = full_catalog();
        let generator = generator();

        for seed in 0..48 {
            let mut rng = StdRng::seed_from_u64(seed);
            let question = generator.generate(&catalog, &mut rng).await.unwrap();
            assert_valid(&question);
        }
    }

    #[tokio::test]
    async fn same_seed_gives_same_question() {
        let catalog = full_catalog();
        let generator = generator();

        let first = generator
            .generate(&catalog, &mut StdRng::seed_from_u64(42))
            .await
            .unwrap();
        let second = generator
            .generate(&catalog, &mut StdRng::seed_from_u64(42))
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn gives_up_after_three_failed_attempts() {
        let catalog = FakeCatalog {
            failing: true,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(11);

        let result = generator().generate(&catalog, &mut rng).await;

        assert!(matches!(
            result,
            Err(QuizError::GenerationFailed { attempts: MAX_ATTEMPTS })
        ));
        // every failing attempt stops at its first fetch
        assert_eq!(catalog.calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn empty_catalog_exhausts_retries() {
        let catalog = FakeCatalog::default();
        let mut rng = StdRng::seed_from_u64(99);

        let result = generator().generate(&catalog, &mut rng).await;

        assert!(matches!(result, Err(QuizError::GenerationFailed { .. })));
    }
}
