use crate::diary::WatchDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 1-based, dense, chronological position of a successfully fetched movie
pub type SequenceNumber = u32;

/// One diary entry enriched with catalog metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub sequence_number: SequenceNumber,
    pub slug: String,
    pub name: String,
    /// Half-star rating on a 0-5 scale
    pub rating: Option<f64>,
    pub rewatched: bool,
    pub reviewed: bool,
    pub liked: bool,
    pub date: WatchDate,
    pub release_year: Option<i32>,
    pub runtime_minutes: Option<u32>,
    pub popularity_members: u64,
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub studios: Vec<String>,
}

impl MovieRecord {
    /// Known runtime of at least `threshold_minutes`; unknown runtimes never qualify
    pub fn is_feature_length(&self, threshold_minutes: u32) -> bool {
        self.runtime_minutes.map(|runtime| runtime >= threshold_minutes).unwrap_or(false)
    }
}

/// The canonical movie list, ordered by sequence number.
///
/// Serialized as `{"1": {...}, "2": {...}}`. Loading validates that the keys
/// form the dense range 1..=N and agree with each record's sequence number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, MovieRecord>", into = "IndexMap<String, MovieRecord>")]
pub struct MovieList {
    movies: Vec<MovieRecord>,
}

impl MovieList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, assigning it the next sequence number
    pub fn push(&mut self, mut record: MovieRecord) -> SequenceNumber {
        let sequence = self.movies.len() as SequenceNumber + 1;
        record.sequence_number = sequence;
        self.movies.push(record);
        sequence
    }

    pub fn get(&self, sequence: SequenceNumber) -> Option<&MovieRecord> {
        if sequence == 0 {
            return None;
        }
        self.movies.get(sequence as usize - 1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MovieRecord> {
        self.movies.iter()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn last(&self) -> Option<&MovieRecord> {
        self.movies.last()
    }
}

impl<'a> IntoIterator for &'a MovieList {
    type Item = &'a MovieRecord;
    type IntoIter = std::slice::Iter<'a, MovieRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.movies.iter()
    }
}

impl TryFrom<IndexMap<String, MovieRecord>> for MovieList {
    type Error = String;

    fn try_from(map: IndexMap<String, MovieRecord>) -> Result<Self, Self::Error> {
        let mut movies = Vec::with_capacity(map.len());
        for (position, (key, record)) in map.into_iter().enumerate() {
            let expected = position as SequenceNumber + 1;
            let parsed: SequenceNumber = key
                .parse()
                .map_err(|_| format!("movie key '{}' is not a sequence number", key))?;
            if parsed != expected || record.sequence_number != expected {
                return Err(format!(
                    "movie list is not dense: expected sequence {}, found key {} (record {})",
                    expected, parsed, record.sequence_number
                ));
            }
            movies.push(record);
        }
        Ok(Self { movies })
    }
}

impl From<MovieList> for IndexMap<String, MovieRecord> {
    fn from(list: MovieList) -> Self {
        list.movies
            .into_iter()
            .map(|record| (record.sequence_number.to_string(), record))
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn sample_record(slug: &str, month: u32, day: u32) -> MovieRecord {
    MovieRecord {
        sequence_number: 0,
        slug: slug.to_string(),
        name: slug.to_string(),
        rating: Some(3.5),
        rewatched: false,
        reviewed: false,
        liked: false,
        date: WatchDate::new(2025, month, day),
        release_year: Some(2020),
        runtime_minutes: Some(100),
        popularity_members: 1000,
        average_rating: Some(3.4),
        genres: vec!["Drama".to_string()],
        countries: Vec::new(),
        languages: Vec::new(),
        studios: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_dense_sequence() {
        let mut list = MovieList::new();
        assert_eq!(list.push(sample_record("a", 1, 1)), 1);
        assert_eq!(list.push(sample_record("b", 1, 2)), 2);
        assert_eq!(list.get(2).unwrap().slug, "b");
        assert!(list.get(0).is_none());
        assert!(list.get(3).is_none());
    }

    #[test]
    fn test_movie_list_round_trip() {
        let mut list = MovieList::new();
        list.push(sample_record("a", 1, 1));
        list.push(sample_record("b", 2, 3));

        let json = serde_json::to_string(&list).unwrap();
        assert!(json.starts_with("{\"1\":"));
        let restored: MovieList = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, list);
    }

    #[test]
    fn test_gapped_movie_list_rejected() {
        let mut first = sample_record("a", 1, 1);
        first.sequence_number = 1;
        let mut third = sample_record("c", 1, 3);
        third.sequence_number = 3;
        let mut map = IndexMap::new();
        map.insert("1".to_string(), first);
        map.insert("3".to_string(), third);
        assert!(MovieList::try_from(map).is_err());
    }

    #[test]
    fn test_feature_length() {
        let mut record = sample_record("a", 1, 1);
        assert!(record.is_feature_length(75));
        record.runtime_minutes = Some(74);
        assert!(!record.is_feature_length(75));
        record.runtime_minutes = None;
        assert!(!record.is_feature_length(75));
    }
}
