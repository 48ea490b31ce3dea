use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar month of a diary bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// 1-based month number (January = 1)
    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }

    /// 0-based position in [`Month::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_number(number: u32) -> Option<Month> {
        if (1..=12).contains(&number) {
            Some(Month::ALL[(number - 1) as usize])
        } else {
            None
        }
    }

    pub fn from_name(name: &str) -> Option<Month> {
        Month::ALL.iter().copied().find(|m| m.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WatchDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl WatchDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Calendar date, or `None` when the triple is not a real date
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    pub fn month(&self) -> Option<Month> {
        Month::from_number(self.month)
    }
}

impl From<NaiveDate> for WatchDate {
    fn from(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

/// Actions the user attached to a diary entry.
///
/// `rating` is on the catalog's 10-point scale (1..=10, one point per half star).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiaryActions {
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub reviewed: bool,
    #[serde(default)]
    pub rewatched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub slug: String,
    pub name: String,
    pub date: WatchDate,
    #[serde(default)]
    pub actions: DiaryActions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub entries: IndexMap<String, DiaryEntry>,
}

impl MonthBucket {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry and keep `count` equal to the number of entries
    pub fn push(&mut self, entry_id: String, entry: DiaryEntry) {
        self.entries.insert(entry_id, entry);
        self.count = self.entries.len() as u32;
    }
}

/// A full diary year: exactly one bucket per month.
///
/// Serialized as a JSON object keyed by month name. Missing months
/// deserialize to empty buckets; unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, MonthBucket>", into = "IndexMap<String, MonthBucket>")]
pub struct DiaryYear {
    months: [MonthBucket; 12],
}

impl DiaryYear {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn month(&self, month: Month) -> &MonthBucket {
        &self.months[month.index()]
    }

    pub fn month_mut(&mut self, month: Month) -> &mut MonthBucket {
        &mut self.months[month.index()]
    }

    pub fn set_month(&mut self, month: Month, bucket: MonthBucket) {
        self.months[month.index()] = bucket;
    }

    pub fn months(&self) -> impl Iterator<Item = (Month, &MonthBucket)> {
        Month::ALL.iter().copied().zip(self.months.iter())
    }

    /// Every entry in bucket order: January first, then each bucket's own order
    pub fn entries_in_order(&self) -> impl Iterator<Item = (&String, &DiaryEntry)> {
        self.months.iter().flat_map(|bucket| bucket.entries.iter())
    }

    pub fn total_entries(&self) -> usize {
        self.months.iter().map(|bucket| bucket.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_entries() == 0
    }
}

impl TryFrom<IndexMap<String, MonthBucket>> for DiaryYear {
    type Error = String;

    fn try_from(map: IndexMap<String, MonthBucket>) -> Result<Self, Self::Error> {
        let mut year = DiaryYear::new();
        for (key, bucket) in map {
            let month = Month::from_name(&key).ok_or_else(|| format!("unknown month key '{}'", key))?;
            year.set_month(month, bucket);
        }
        Ok(year)
    }
}

impl From<DiaryYear> for IndexMap<String, MonthBucket> {
    fn from(year: DiaryYear) -> Self {
        Month::ALL
            .iter()
            .zip(year.months)
            .map(|(month, bucket)| (month.name().to_string(), bucket))
            .collect()
    }
}
