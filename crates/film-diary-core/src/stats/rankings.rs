use film_diary_models::{MovieRecord, PersonList, SequenceNumber};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The n-th movie of the population ("1", "25", "50", …, "last")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub label: String,
    pub sequence_number: SequenceNumber,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRef {
    pub sequence_number: SequenceNumber,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMovie {
    pub sequence_number: SequenceNumber,
    pub members: u64,
}

/// Full rankings by member count; ties go to the earlier sequence number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularityStats {
    pub rarest: Vec<RankedMovie>,
    pub popular: Vec<RankedMovie>,
}

/// Milestones count positions within the population. "last" is always
/// emitted, even when it lands on an interval milestone.
pub(crate) fn milestones(movies: &[&MovieRecord], interval: u32) -> Vec<Milestone> {
    let milestone = |label: String, movie: &MovieRecord| Milestone {
        label,
        sequence_number: movie.sequence_number,
        name: movie.name.clone(),
    };

    let (Some(first), Some(last)) = (movies.first(), movies.last()) else {
        return Vec::new();
    };
    let interval = interval.max(1) as usize;

    let mut result = vec![milestone("1".to_string(), *first)];
    for (index, movie) in movies.iter().enumerate() {
        let position = index + 1;
        if position > 1 && position % interval == 0 {
            result.push(milestone(position.to_string(), *movie));
        }
    }
    result.push(milestone("last".to_string(), *last));
    result
}

pub(crate) fn top_rated(movies: &[&MovieRecord]) -> Vec<MovieRef> {
    let Some(highest) = movies.iter().filter_map(|movie| movie.rating).reduce(f64::max) else {
        return Vec::new();
    };
    movies
        .iter()
        .filter(|movie| movie.rating == Some(highest))
        .map(|movie| MovieRef {
            sequence_number: movie.sequence_number,
            name: movie.name.clone(),
        })
        .collect()
}

/// First `n` people of an already sorted list as name → appearances.
/// People sharing a name keep the first (highest ranked) count.
pub(crate) fn top_people(people: &PersonList, n: usize) -> IndexMap<String, u32> {
    let mut top = IndexMap::new();
    for person in people.top(n) {
        top.entry(person.name.clone()).or_insert(person.appearances);
    }
    top
}

pub(crate) fn multiwatches(movies: &[&MovieRecord]) -> IndexMap<String, Vec<SequenceNumber>> {
    let mut by_slug: IndexMap<String, Vec<SequenceNumber>> = IndexMap::new();
    for movie in movies {
        by_slug.entry(movie.slug.clone()).or_default().push(movie.sequence_number);
    }
    by_slug.retain(|_, sequences| sequences.len() > 1);
    by_slug
}

pub(crate) fn popularity(movies: &[&MovieRecord]) -> PopularityStats {
    let mut rarest: Vec<RankedMovie> = movies
        .iter()
        .map(|movie| RankedMovie {
            sequence_number: movie.sequence_number,
            members: movie.popularity_members,
        })
        .collect();
    let mut popular = rarest.clone();

    rarest.sort_by(|a, b| a.members.cmp(&b.members).then(a.sequence_number.cmp(&b.sequence_number)));
    popular.sort_by(|a, b| b.members.cmp(&a.members).then(a.sequence_number.cmp(&b.sequence_number)));

    PopularityStats { rarest, popular }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fixtures::{list, record};
    use film_diary_models::MovieList;

    fn numbered(n: u32) -> MovieList {
        list((1..=n).map(|i| record(&format!("m{}", i), 1 + (i - 1) / 28, 1 + (i - 1) % 28)).collect())
    }

    fn labels(movies: &MovieList, interval: u32) -> Vec<String> {
        let refs: Vec<&MovieRecord> = movies.iter().collect();
        milestones(&refs, interval).into_iter().map(|m| m.label).collect()
    }

    #[test]
    fn test_milestones_keep_coinciding_last() {
        assert_eq!(labels(&numbered(50), 25), vec!["1", "25", "50", "last"]);
        assert_eq!(labels(&numbered(30), 25), vec!["1", "25", "last"]);
        assert_eq!(labels(&numbered(1), 25), vec!["1", "last"]);
        assert!(labels(&MovieList::new(), 25).is_empty());
    }

    #[test]
    fn test_milestone_points_at_movie() {
        let movies = numbered(26);
        let refs: Vec<&MovieRecord> = movies.iter().collect();
        let result = milestones(&refs, 25);
        assert_eq!(result[1].sequence_number, 25);
        assert_eq!(result[1].name, "M25");
        assert_eq!(result[2].name, "M26");
    }

    #[test]
    fn test_top_rated_includes_ties() {
        let mut a = record("a", 1, 1);
        a.rating = Some(4.5);
        let mut b = record("b", 1, 2);
        b.rating = Some(3.0);
        let mut c = record("c", 1, 3);
        c.rating = Some(4.5);
        let movies = list(vec![a, b, c, record("d", 1, 4)]);
        let refs: Vec<&MovieRecord> = movies.iter().collect();

        let top: Vec<SequenceNumber> = top_rated(&refs).iter().map(|m| m.sequence_number).collect();
        assert_eq!(top, vec![1, 3]);
        assert!(top_rated(&[]).is_empty());
    }

    #[test]
    fn test_top_people_limits_and_projects() {
        let mut cast = PersonList::new();
        for i in 0..12 {
            cast.record_credit(&format!("p{}", i), &format!("Person {}", i), "m", None);
        }
        cast.record_credit("p11", "Person 11", "m2", None);
        cast.sort_by_appearances();

        let top = top_people(&cast, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top.get_index(0), Some((&"Person 11".to_string(), &2)));
    }

    #[test]
    fn test_top_people_same_name_keeps_first_count() {
        let mut cast = PersonList::new();
        for movie in ["m1", "m2", "m3"] {
            cast.record_credit("chris-a", "Chris", movie, None);
        }
        cast.record_credit("dana", "Dana", "m1", None);
        cast.record_credit("dana", "Dana", "m2", None);
        cast.record_credit("chris-b", "Chris", "m4", None);
        cast.sort_by_appearances();

        let top = top_people(&cast, 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top.get_index(0), Some((&"Chris".to_string(), &3)));
        assert_eq!(top["Dana"], 2);
    }

    #[test]
    fn test_multiwatches() {
        let movies = list(vec![record("a", 1, 1), record("b", 1, 2), record("a", 1, 3)]);
        let refs: Vec<&MovieRecord> = movies.iter().collect();
        let result = multiwatches(&refs);
        assert_eq!(result.len(), 1);
        assert_eq!(result["a"], vec![1, 3]);
    }

    #[test]
    fn test_popularity_rankings() {
        let mut a = record("a", 1, 1);
        a.popularity_members = 50;
        let mut b = record("b", 1, 2);
        b.popularity_members = 10;
        let mut c = record("c", 1, 3);
        c.popularity_members = 50;
        let movies = list(vec![a, b, c]);
        let refs: Vec<&MovieRecord> = movies.iter().collect();

        let stats = popularity(&refs);
        let rarest: Vec<SequenceNumber> = stats.rarest.iter().map(|m| m.sequence_number).collect();
        let popular: Vec<SequenceNumber> = stats.popular.iter().map(|m| m.sequence_number).collect();
        assert_eq!(rarest, vec![2, 1, 3]);
        assert_eq!(popular, vec![1, 3, 2]);
    }
}
