use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One appearance of a person in a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    pub movie_slug: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// A cast member or director aggregated across the year's movies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonAggregate {
    pub slug: String,
    pub name: String,
    pub appearances: u32,
    pub credits: Vec<Credit>,
}

/// Ordered map of person slug → aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonList {
    people: IndexMap<String, PersonAggregate>,
}

impl PersonList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one appearance. Repeated calls for the same movie (several roles)
    /// count again; nothing is deduplicated.
    pub fn record_credit(&mut self, slug: &str, name: &str, movie_slug: &str, role: Option<String>) {
        let person = self
            .people
            .entry(slug.to_string())
            .or_insert_with(|| PersonAggregate {
                slug: slug.to_string(),
                name: name.to_string(),
                appearances: 0,
                credits: Vec::new(),
            });
        person.appearances += 1;
        person.credits.push(Credit {
            movie_slug: movie_slug.to_string(),
            role,
        });
    }

    /// Sort by appearances, most first. Ties keep insertion order.
    pub fn sort_by_appearances(&mut self) {
        self.people.sort_by(|_, a, _, b| b.appearances.cmp(&a.appearances));
    }

    /// The first `n` people in current order
    pub fn top(&self, n: usize) -> impl Iterator<Item = &PersonAggregate> {
        self.people.values().take(n)
    }

    pub fn get(&self, slug: &str) -> Option<&PersonAggregate> {
        self.people.get(slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonAggregate> {
        self.people.values()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}
