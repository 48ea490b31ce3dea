use crate::error::CatalogError;
use async_trait::async_trait;
use film_diary_models::{Month, MonthBucket, MovieDetail, Popularity, UserProfile};

/// The remote film catalog.
///
/// Every call is one request/response unit with no retry; timeouts are the
/// implementation's business.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    fn source_name(&self) -> &str;

    /// One month of a user's diary
    async fn fetch_diary_month(&self, user: &str, year: i32, month: Month) -> Result<MonthBucket, CatalogError>;

    async fn fetch_movie_detail(&self, slug: &str) -> Result<MovieDetail, CatalogError>;

    /// Member (watcher) count for a movie
    async fn fetch_popularity(&self, slug: &str) -> Result<Popularity, CatalogError>;

    async fn fetch_user_profile(&self, user: &str) -> Result<UserProfile, CatalogError>;
}
