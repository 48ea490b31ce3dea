use crate::error::CatalogError;
use film_diary_models::Month;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

pub fn diary_month_url(base_url: &str, user: &str, year: i32, month: Month) -> String {
    format!(
        "{}/users/{}/diary/{}/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(user),
        year,
        month.number()
    )
}

pub fn movie_detail_url(base_url: &str, slug: &str) -> String {
    format!("{}/films/{}", base_url.trim_end_matches('/'), urlencoding::encode(slug))
}

pub fn popularity_url(base_url: &str, slug: &str) -> String {
    format!("{}/films/{}/members", base_url.trim_end_matches('/'), urlencoding::encode(slug))
}

pub fn user_profile_url(base_url: &str, user: &str) -> String {
    format!("{}/users/{}", base_url.trim_end_matches('/'), urlencoding::encode(user))
}

/// GET `url` and decode the JSON body
pub async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, CatalogError> {
    debug!("GET {}", url);

    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|source| CatalogError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(CatalogError::NotFound(url.to_string()));
    }

    let body = response.text().await.map_err(|source| CatalogError::Http {
        url: url.to_string(),
        source,
    })?;

    if !status.is_success() {
        return Err(CatalogError::Status {
            url: url.to_string(),
            code: status.as_u16(),
            body,
        });
    }

    decode_body(url, &body)
}

pub fn decode_body<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|source| CatalogError::Decode {
        url: url.to_string(),
        source,
    })
}
