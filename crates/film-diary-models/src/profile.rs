use serde::{Deserialize, Serialize};

/// A film pinned to the user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteFilm {
    pub slug: String,
    pub name: String,
}

/// Public profile data shown in the snapshot header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, alias = "avatar")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub favorites: Vec<FavoriteFilm>,
}

impl UserProfile {
    /// Profile used when the catalog can't provide one
    pub fn fallback(username: &str) -> Self {
        Self {
            display_name: Some(username.to_string()),
            avatar_url: None,
            favorites: Vec::new(),
        }
    }
}
