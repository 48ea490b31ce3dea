//! In-memory catalog used by the orchestration tests.

use async_trait::async_trait;
use film_diary_models::{
    CastMember, Crew, CrewMember, DetailRecord, DiaryActions, DiaryEntry, Month, MonthBucket, MovieDetail, OneOrMany,
    Popularity, UserProfile, WatchDate,
};
use film_diary_sources::{CatalogClient, CatalogError};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct MockCatalog {
    pub months: HashMap<Month, MonthBucket>,
    pub failing_months: HashSet<Month>,
    pub details: HashMap<String, MovieDetail>,
    pub popularity: HashMap<String, u64>,
    pub profile: Option<UserProfile>,
    pub month_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    /// Month and detail fetches currently running, and the most seen at once
    pub in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, id: &str, entry: DiaryEntry) -> Self {
        let month = entry.date.month().unwrap_or(Month::January);
        self.months.entry(month).or_default().push(id.to_string(), entry);
        self
    }

    pub fn with_movie(mut self, slug: &str, detail: MovieDetail, members: u64) -> Self {
        self.details.insert(slug.to_string(), detail);
        self.popularity.insert(slug.to_string(), members);
        self
    }

    pub fn with_failing_month(mut self, month: Month) -> Self {
        self.failing_months.insert(month);
        self
    }

    pub fn month_calls(&self) -> usize {
        self.month_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Hold a slot across one scheduler yield so overlapping calls are counted
    async fn occupy_slot(&self) {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogClient for MockCatalog {
    fn source_name(&self) -> &str {
        "mock"
    }

    async fn fetch_diary_month(&self, user: &str, year: i32, month: Month) -> Result<MonthBucket, CatalogError> {
        self.month_calls.fetch_add(1, Ordering::SeqCst);
        self.occupy_slot().await;
        if self.failing_months.contains(&month) {
            return Err(CatalogError::Status {
                url: format!("/users/{}/diary/{}/{}", user, year, month.number()),
                code: 500,
                body: "boom".to_string(),
            });
        }
        Ok(self.months.get(&month).cloned().unwrap_or_default())
    }

    async fn fetch_movie_detail(&self, slug: &str) -> Result<MovieDetail, CatalogError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.occupy_slot().await;
        self.details
            .get(slug)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(slug.to_string()))
    }

    async fn fetch_popularity(&self, slug: &str) -> Result<Popularity, CatalogError> {
        self.popularity
            .get(slug)
            .map(|members| Popularity { members: *members })
            .ok_or_else(|| CatalogError::NotFound(slug.to_string()))
    }

    async fn fetch_user_profile(&self, user: &str) -> Result<UserProfile, CatalogError> {
        self.profile.clone().ok_or_else(|| CatalogError::NotFound(user.to_string()))
    }
}

pub fn diary_entry(slug: &str, month: u32, day: u32, rating: Option<u8>) -> DiaryEntry {
    DiaryEntry {
        slug: slug.to_string(),
        name: slug.to_uppercase(),
        date: WatchDate::new(2025, month, day),
        actions: DiaryActions {
            rating,
            ..DiaryActions::default()
        },
    }
}

pub fn movie_detail(runtime: Option<u32>, genres: &[&str], cast: &[(&str, &str)], directors: &[&str]) -> MovieDetail {
    MovieDetail {
        release_year: Some(2025),
        runtime_minutes: runtime,
        average_rating: Some(3.5),
        genres: genres.iter().map(|g| DetailRecord::Genre(g.to_string())).collect(),
        cast: cast
            .iter()
            .map(|(slug, role)| CastMember {
                slug: Some(slug.to_string()),
                name: Some(slug.to_uppercase()),
                role: Some(role.to_string()),
            })
            .collect(),
        crew: Crew {
            director: OneOrMany::Many(
                directors
                    .iter()
                    .map(|slug| CrewMember {
                        slug: Some(slug.to_string()),
                        name: Some(slug.to_uppercase()),
                    })
                    .collect(),
            ),
        },
        details: vec![
            DetailRecord::Country("USA".to_string()),
            DetailRecord::Language("English".to_string()),
        ],
    }
}
