use serde::{Deserialize, Serialize};

/// Kind of a catalog detail record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailKind {
    Studio,
    Country,
    Language,
    Genre,
    Theme,
}

/// Detail record exactly as the catalog sends it: `{"type": "...", "name": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

/// A typed catalog detail (studio, country, language, genre, theme).
///
/// Records with a type we don't know about are kept as `Other` so they
/// survive a round trip but never leak into a typed breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDetail", into = "RawDetail")]
pub enum DetailRecord {
    Studio(String),
    Country(String),
    Language(String),
    Genre(String),
    Theme(String),
    Other { kind: String, name: String },
}

impl DetailRecord {
    pub fn kind(&self) -> Option<DetailKind> {
        match self {
            DetailRecord::Studio(_) => Some(DetailKind::Studio),
            DetailRecord::Country(_) => Some(DetailKind::Country),
            DetailRecord::Language(_) => Some(DetailKind::Language),
            DetailRecord::Genre(_) => Some(DetailKind::Genre),
            DetailRecord::Theme(_) => Some(DetailKind::Theme),
            DetailRecord::Other { .. } => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DetailRecord::Studio(name)
            | DetailRecord::Country(name)
            | DetailRecord::Language(name)
            | DetailRecord::Genre(name)
            | DetailRecord::Theme(name) => name,
            DetailRecord::Other { name, .. } => name,
        }
    }
}

impl From<RawDetail> for DetailRecord {
    fn from(raw: RawDetail) -> Self {
        match raw.kind.to_lowercase().as_str() {
            "studio" => DetailRecord::Studio(raw.name),
            "country" => DetailRecord::Country(raw.name),
            "language" => DetailRecord::Language(raw.name),
            "genre" => DetailRecord::Genre(raw.name),
            "theme" => DetailRecord::Theme(raw.name),
            _ => DetailRecord::Other {
                kind: raw.kind,
                name: raw.name,
            },
        }
    }
}

impl From<DetailRecord> for RawDetail {
    fn from(record: DetailRecord) -> Self {
        let kind = match &record {
            DetailRecord::Studio(_) => "studio".to_string(),
            DetailRecord::Country(_) => "country".to_string(),
            DetailRecord::Language(_) => "language".to_string(),
            DetailRecord::Genre(_) => "genre".to_string(),
            DetailRecord::Theme(_) => "theme".to_string(),
            DetailRecord::Other { kind, .. } => kind.clone(),
        };
        RawDetail {
            kind,
            name: record.name().to_string(),
        }
    }
}

/// Names of every record of one kind, in catalog order
pub fn names_of_kind(records: &[DetailRecord], kind: DetailKind) -> Vec<String> {
    records
        .iter()
        .filter(|record| record.kind() == Some(kind))
        .map(|record| record.name().to_string())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "role_name")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// The catalog sends a lone director as an object and several as a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Crew {
    #[serde(default)]
    pub director: OneOrMany<CrewMember>,
}

/// Per-movie metadata returned by the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(default, alias = "year")]
    pub release_year: Option<i32>,
    #[serde(default, alias = "runtime")]
    pub runtime_minutes: Option<u32>,
    #[serde(default, alias = "rating")]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub genres: Vec<DetailRecord>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Crew,
    #[serde(default)]
    pub details: Vec<DetailRecord>,
}

impl MovieDetail {
    pub fn directors(&self) -> Vec<CrewMember> {
        self.crew.director.clone().into_vec()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Popularity {
    pub members: u64,
}
