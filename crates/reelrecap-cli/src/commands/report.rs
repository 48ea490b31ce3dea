use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use film_diary_core::{SnapshotPair, YearStats};
use film_diary_models::Month;
use indexmap::IndexMap;

const TOP_CATEGORIES: usize = 5;

fn styled(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_header(
        headers
            .iter()
            .map(|header| Cell::new(header).fg(Color::Cyan).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn number(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

fn percent(share: f64) -> String {
    format!("{:.0}%", share * 100.0)
}

fn rating(average: f64) -> String {
    if average > 0.0 {
        format!("{:.1}★", average)
    } else {
        "-".to_string()
    }
}

/// Label, all movies, feature-length movies
pub fn headline_rows(pair: &SnapshotPair) -> Vec<(&'static str, String, String)> {
    let all = &pair.all.stats;
    let full = &pair.full.stats;
    let flag = |stats: &YearStats, pick: fn(&YearStats) -> (u32, f64)| {
        let (count, share) = pick(stats);
        format!("{} ({})", count, percent(share))
    };

    vec![
        ("Movies", all.counts.yearly.to_string(), full.counts.yearly.to_string()),
        (
            "Hours",
            format!("{:.1}", all.runtime.yearly_minutes as f64 / 60.0),
            format!("{:.1}", full.runtime.yearly_minutes as f64 / 60.0),
        ),
        (
            "Per month",
            format!("{:.1}", all.counts.average_monthly),
            format!("{:.1}", full.counts.average_monthly),
        ),
        (
            "Per week",
            format!("{:.1}", all.counts.average_weekly),
            format!("{:.1}", full.counts.average_weekly),
        ),
        ("Average rating", rating(all.ratings.yearly_average), rating(full.ratings.yearly_average)),
        (
            "Rewatched",
            flag(all, |s| (s.engagement.rewatched.yearly, s.engagement.rewatched.percent)),
            flag(full, |s| (s.engagement.rewatched.yearly, s.engagement.rewatched.percent)),
        ),
        (
            "Reviewed",
            flag(all, |s| (s.engagement.reviewed.yearly, s.engagement.reviewed.percent)),
            flag(full, |s| (s.engagement.reviewed.yearly, s.engagement.reviewed.percent)),
        ),
        (
            "Liked",
            flag(all, |s| (s.engagement.liked.yearly, s.engagement.liked.percent)),
            flag(full, |s| (s.engagement.liked.yearly, s.engagement.liked.percent)),
        ),
        (
            "Released this year",
            percent(all.releases.percent_current_year),
            percent(full.releases.percent_current_year),
        ),
    ]
}

pub fn headline_table(pair: &SnapshotPair) -> Table {
    let mut table = styled(&["", "All movies", "Feature length"]);
    for (label, all, full) in headline_rows(pair) {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), number(all), number(full)]);
    }
    table
}

pub fn monthly_table(stats: &YearStats) -> Table {
    let mut table = styled(&["Month", "Movies", "Feature length", "Minutes", "Rating"]);
    for month in Month::ALL {
        let name = month.name();
        table.add_row(vec![
            Cell::new(name),
            number(stats.counts.monthly.get(name).copied().unwrap_or(0)),
            number(stats.counts.full_monthly.get(name).copied().unwrap_or(0)),
            number(stats.runtime.monthly_minutes.get(name).copied().unwrap_or(0)),
            number(rating(stats.ratings.monthly_average.get(name).copied().unwrap_or(0.0))),
        ]);
    }
    table
}

pub fn people_table(title: &str, people: &IndexMap<String, u32>) -> Table {
    let mut table = styled(&["#", title, "Movies"]);
    for (rank, (name, appearances)) in people.iter().enumerate() {
        table.add_row(vec![number(rank + 1), Cell::new(name), number(appearances)]);
    }
    table
}

pub fn genre_table(stats: &YearStats) -> Table {
    let genres = &stats.categories.genres;
    let mut table = styled(&["Genre", "Movies", "Rating"]);
    for (genre, movies) in genres.movies.iter().take(TOP_CATEGORIES) {
        let average = genres.average_rating.get(genre).copied().unwrap_or(0.0);
        table.add_row(vec![Cell::new(genre), number(movies.len()), number(rating(average))]);
    }
    table
}

pub fn milestone_table(stats: &YearStats) -> Table {
    let mut table = styled(&["Milestone", "#", "Movie"]);
    for milestone in &stats.milestones {
        table.add_row(vec![
            Cell::new(&milestone.label),
            number(milestone.sequence_number),
            Cell::new(&milestone.name),
        ]);
    }
    table
}

/// Longest runs of consecutive days and weeks, with their first and last bucket
pub fn streak_table(stats: &YearStats) -> Table {
    let mut table = styled(&["Streak", "Length", "From", "To"]);
    let runs = stats
        .streaks
        .longest_daily_streak
        .values()
        .map(|run| ("Daily", run))
        .chain(stats.streaks.longest_weekly_streak.values().map(|run| ("Weekly", run)));
    for (kind, run) in runs {
        let (Some(first), Some(last)) = (run.first(), run.last()) else {
            continue;
        };
        table.add_row(vec![Cell::new(kind), number(run.len()), Cell::new(first), Cell::new(last)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use film_diary_config::AnalysisConfig;
    use film_diary_core::{MasterLists, SnapshotInfo, StatsEngine};
    use film_diary_models::{DiaryYear, MovieList, MovieRecord, UserProfile, WatchDate};

    fn record(slug: &str, day: u32, runtime: u32, rating: Option<f64>) -> MovieRecord {
        MovieRecord {
            sequence_number: 0,
            slug: slug.to_string(),
            name: slug.to_uppercase(),
            rating,
            rewatched: false,
            reviewed: false,
            liked: day == 1,
            date: WatchDate {
                year: 2025,
                month: 1,
                day,
            },
            release_year: Some(2025),
            runtime_minutes: Some(runtime),
            popularity_members: 10,
            average_rating: None,
            genres: vec!["Drama".to_string()],
            countries: Vec::new(),
            languages: Vec::new(),
            studios: Vec::new(),
        }
    }

    fn snapshots() -> SnapshotPair {
        let mut movies = MovieList::new();
        movies.push(record("a", 1, 120, Some(4.0)));
        movies.push(record("b", 2, 20, None));
        let lists = MasterLists {
            movies,
            ..MasterLists::default()
        };
        StatsEngine::new(AnalysisConfig::default())
            .compute(
                &DiaryYear::default(),
                &lists,
                2025,
                SnapshotInfo::new("ana", 2025, UserProfile::fallback("ana")),
            )
            .unwrap()
    }

    #[test]
    fn test_headline_rows_compare_populations() {
        let rows = headline_rows(&snapshots());
        assert_eq!(rows[0], ("Movies", "2".to_string(), "1".to_string()));
        assert_eq!(rows[1], ("Hours", "2.3".to_string(), "2.0".to_string()));
        let liked = rows.iter().find(|(label, _, _)| *label == "Liked").unwrap();
        assert_eq!(liked.1, "1 (50%)");
        assert_eq!(liked.2, "1 (100%)");
    }

    #[test]
    fn test_tables_render() {
        let pair = snapshots();
        let monthly = monthly_table(&pair.all.stats).to_string();
        assert!(monthly.contains("January"));
        assert!(monthly.contains("December"));
        let streaks = streak_table(&pair.all.stats).to_string();
        assert!(streaks.contains("day 1"));
        assert!(streaks.contains("day 2"));
    }
}
