use crate::error::CatalogError;
use crate::gateway::api;
use crate::traits::CatalogClient;
use async_trait::async_trait;
use film_diary_config::CatalogConfig;
use film_diary_models::{Month, MonthBucket, MovieDetail, Popularity, UserProfile};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Catalog client speaking JSON to a catalog gateway over HTTP
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: Arc<Client>,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        if config.base_url.trim().is_empty() {
            return Err(CatalogError::Config("base_url is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| CatalogError::Http {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    fn source_name(&self) -> &str {
        "gateway"
    }

    async fn fetch_diary_month(&self, user: &str, year: i32, month: Month) -> Result<MonthBucket, CatalogError> {
        let url = api::diary_month_url(&self.base_url, user, year, month);
        api::get_json(&self.client, &url).await
    }

    async fn fetch_movie_detail(&self, slug: &str) -> Result<MovieDetail, CatalogError> {
        let url = api::movie_detail_url(&self.base_url, slug);
        api::get_json(&self.client, &url).await
    }

    async fn fetch_popularity(&self, slug: &str) -> Result<Popularity, CatalogError> {
        let url = api::popularity_url(&self.base_url, slug);
        api::get_json(&self.client, &url).await
    }

    async fn fetch_user_profile(&self, user: &str) -> Result<UserProfile, CatalogError> {
        let url = api::user_profile_url(&self.base_url, user);
        api::get_json(&self.client, &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_base_url() {
        let config = CatalogConfig {
            base_url: "https://gw.example/".to_string(),
            ..CatalogConfig::default()
        };
        let client = HttpCatalogClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://gw.example");
        assert_eq!(client.source_name(), "gateway");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let config = CatalogConfig {
            base_url: String::new(),
            ..CatalogConfig::default()
        };
        assert!(matches!(HttpCatalogClient::new(&config), Err(CatalogError::Config(_))));
    }
}
