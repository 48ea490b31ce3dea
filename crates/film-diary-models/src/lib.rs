pub mod catalog;
pub mod diary;
pub mod movie;
pub mod person;
pub mod profile;

pub use catalog::{names_of_kind, CastMember, Crew, CrewMember, DetailKind, DetailRecord, MovieDetail, OneOrMany, Popularity, RawDetail};
pub use diary::{DiaryActions, DiaryEntry, DiaryYear, Month, MonthBucket, WatchDate};
pub use movie::{MovieList, MovieRecord, SequenceNumber};
pub use person::{Credit, PersonAggregate, PersonList};
pub use profile::{FavoriteFilm, UserProfile};
