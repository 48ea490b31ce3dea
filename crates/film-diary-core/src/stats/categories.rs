use super::{ratio, round_to};
use film_diary_models::{MovieRecord, SequenceNumber};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label → movies carrying it, most common label first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub movies: IndexMap<String, Vec<SequenceNumber>>,
    /// Mean rating per label; labels without enough rated movies are absent
    pub average_rating: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub genres: Breakdown,
    pub countries: Breakdown,
    pub languages: Breakdown,
    pub studios: Breakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseStats {
    /// Release year → sequence numbers, oldest year first. Unknown years are left out.
    pub by_year: IndexMap<i32, Vec<SequenceNumber>>,
    /// Share of movies released in the analysis year
    pub percent_current_year: f64,
}

fn breakdown<F>(movies: &[&MovieRecord], labels: F, min_rated: usize) -> Breakdown
where
    F: Fn(&MovieRecord) -> &[String],
{
    let mut groups: IndexMap<String, (Vec<SequenceNumber>, Vec<f64>)> = IndexMap::new();

    for movie in movies.iter().copied() {
        for label in labels(movie) {
            let (sequences, ratings) = groups.entry(label.clone()).or_default();
            // A label repeated within one movie counts once
            if sequences.last() == Some(&movie.sequence_number) {
                continue;
            }
            sequences.push(movie.sequence_number);
            if let Some(rating) = movie.rating {
                ratings.push(rating);
            }
        }
    }

    groups.sort_by(|_, a, _, b| b.0.len().cmp(&a.0.len()));

    let average_rating = groups
        .iter()
        .filter(|(_, (_, ratings))| !ratings.is_empty() && ratings.len() >= min_rated)
        .map(|(label, (_, ratings))| {
            let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
            (label.clone(), round_to(mean, 2))
        })
        .collect();

    Breakdown {
        movies: groups.into_iter().map(|(label, (sequences, _))| (label, sequences)).collect(),
        average_rating,
    }
}

pub(crate) fn category_stats(movies: &[&MovieRecord], min_rated: usize) -> CategoryStats {
    CategoryStats {
        genres: breakdown(movies, |movie| movie.genres.as_slice(), min_rated),
        countries: breakdown(movies, |movie| movie.countries.as_slice(), min_rated),
        languages: breakdown(movies, |movie| movie.languages.as_slice(), min_rated),
        studios: breakdown(movies, |movie| movie.studios.as_slice(), min_rated),
    }
}

pub(crate) fn release_stats(movies: &[&MovieRecord], year: i32) -> ReleaseStats {
    let mut by_year: IndexMap<i32, Vec<SequenceNumber>> = IndexMap::new();
    for movie in movies {
        if let Some(released) = movie.release_year {
            by_year.entry(released).or_default().push(movie.sequence_number);
        }
    }
    by_year.sort_keys();

    let current = by_year.get(&year).map(Vec::len).unwrap_or(0);
    ReleaseStats {
        percent_current_year: ratio(current, movies.len()),
        by_year,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fixtures::{list, record};

    fn rated(slug: &str, day: u32, rating: Option<f64>, genres: &[&str]) -> MovieRecord {
        let mut movie = record(slug, 1, day);
        movie.rating = rating;
        movie.genres = genres.iter().map(|g| g.to_string()).collect();
        movie
    }

    #[test]
    fn test_movie_in_every_label_it_carries() {
        let movies = list(vec![
            rated("a", 1, None, &["Drama", "Crime"]),
            rated("b", 2, None, &[]),
            rated("c", 3, None, &["Crime", "Crime"]),
        ]);
        let refs: Vec<&MovieRecord> = movies.iter().collect();
        let stats = category_stats(&refs, 4);

        assert_eq!(stats.genres.movies["Crime"], vec![1, 3]);
        assert_eq!(stats.genres.movies["Drama"], vec![1]);
        assert!(!stats.genres.movies.values().any(|seqs| seqs.contains(&2)));
        // Sorted by size, most common first
        assert_eq!(stats.genres.movies.keys().next().unwrap(), "Crime");
    }

    #[test]
    fn test_average_needs_enough_rated_movies() {
        let movies = list(vec![
            rated("a", 1, Some(4.0), &["Horror", "Comedy"]),
            rated("b", 2, Some(3.0), &["Horror", "Comedy"]),
            rated("c", 3, Some(2.5), &["Horror", "Comedy"]),
            rated("d", 4, Some(5.0), &["Horror"]),
            rated("e", 5, None, &["Comedy"]),
        ]);
        let refs: Vec<&MovieRecord> = movies.iter().collect();
        let stats = category_stats(&refs, 4);

        // Comedy has four movies but only three rated ones
        assert_eq!(stats.genres.movies["Comedy"].len(), 4);
        assert!(!stats.genres.average_rating.contains_key("Comedy"));
        assert_eq!(stats.genres.average_rating["Horror"], 3.63);
    }

    #[test]
    fn test_release_years() {
        let mut old = record("old", 1, 1);
        old.release_year = Some(1999);
        let mut unknown = record("unknown", 1, 2);
        unknown.release_year = None;
        let movies = list(vec![record("new", 1, 3), old, unknown]);
        let refs: Vec<&MovieRecord> = movies.iter().collect();

        let stats = release_stats(&refs, 2025);
        assert_eq!(stats.by_year.keys().copied().collect::<Vec<_>>(), vec![1999, 2025]);
        assert_eq!(stats.by_year[&2025], vec![1]);
        assert_eq!(stats.percent_current_year, 0.33);
    }
}
