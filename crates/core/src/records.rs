//! The five record shapes shared by source and target.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::EntityKind;
use crate::error::ConfigError;
use crate::mapper::FieldSet;
use crate::normalize::{normalize_date, normalize_timestamp, TimestampPrecision};
use crate::schema::Field;
use crate::MappingError;

/// A field name paired with its value in the common textual form.
pub type ComparableField = (&'static str, Option<String>);

/// A record type the mapper can build and the verifier can compare.
pub trait Entity: Sized + Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Build the record from a resolved row.
    ///
    /// # Errors
    /// Returns a [`MappingError`] when a field is missing or unparseable.
    fn from_fields(fields: &FieldSet<'_>) -> Result<Self, MappingError>;

    fn id(&self) -> Uuid;

    /// Fields held by both stores, normalised for comparison.
    fn comparable_fields(&self, precision: TimestampPrecision) -> Vec<ComparableField>;
}

fn ts(value: Option<DateTime<Utc>>, precision: TimestampPrecision) -> Option<String> {
    value.map(|v| normalize_timestamp(v, precision))
}

fn uuid_text(id: Uuid) -> Option<String> {
    Some(id.hyphenated().to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub full_name: String,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl Entity for Person {
    const KIND: EntityKind = EntityKind::Person;

    fn from_fields(fields: &FieldSet<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            id: fields.uuid(Field::Id)?,
            full_name: fields.text(Field::FullName)?,
            created: fields.opt_timestamp(Field::Created)?,
            modified: fields.opt_timestamp(Field::Modified)?,
        })
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn comparable_fields(&self, precision: TimestampPrecision) -> Vec<ComparableField> {
        vec![
            ("id", uuid_text(self.id)),
            ("full_name", Some(self.full_name.clone())),
            ("created", ts(self.created, precision)),
            ("modified", ts(self.modified, precision)),
        ]
    }
}

/// Genre. The target table keeps no timestamps, so `created` and `updated`
/// are only ever filled from the source and are not compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl Entity for Genre {
    const KIND: EntityKind = EntityKind::Genre;

    fn from_fields(fields: &FieldSet<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            id: fields.uuid(Field::Id)?,
            name: fields.text(Field::Name)?,
            description: fields.opt_text(Field::Description)?,
            created: fields.opt_timestamp(Field::Created)?,
            updated: fields.opt_timestamp(Field::Updated)?,
        })
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn comparable_fields(&self, _precision: TimestampPrecision) -> Vec<ComparableField> {
        vec![
            ("id", uuid_text(self.id)),
            ("name", Some(self.name.clone())),
            ("description", self.description.clone()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilmworkType {
    Movie,
    TvShow,
}

impl FilmworkType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Movie => "movie",
            Self::TvShow => "tv_show",
        }
    }
}

impl fmt::Display for FilmworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilmworkType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "movie" => Ok(Self::Movie),
            "tv_show" => Ok(Self::TvShow),
            other => Err(ConfigError::Invalid {
                name: "film work type",
                value: other.to_owned(),
                reason: "expected movie or tv_show".to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filmwork {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub creation_date: Option<NaiveDate>,
    pub rating: Option<f64>,
    #[serde(rename = "type")]
    pub film_type: FilmworkType,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl Entity for Filmwork {
    const KIND: EntityKind = EntityKind::Filmwork;

    fn from_fields(fields: &FieldSet<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            id: fields.uuid(Field::Id)?,
            title: fields.text(Field::Title)?,
            description: fields.opt_text(Field::Description)?,
            creation_date: fields.opt_date(Field::CreationDate)?,
            rating: fields.opt_real(Field::Rating)?,
            film_type: fields.parsed(Field::Type)?,
            created: fields.opt_timestamp(Field::Created)?,
            modified: fields.opt_timestamp(Field::Modified)?,
        })
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn comparable_fields(&self, precision: TimestampPrecision) -> Vec<ComparableField> {
        vec![
            ("id", uuid_text(self.id)),
            ("title", Some(self.title.clone())),
            ("description", self.description.clone()),
            ("creation_date", self.creation_date.map(normalize_date)),
            ("rating", self.rating.map(|r| r.to_string())),
            ("type", Some(self.film_type.as_str().to_owned())),
            ("created", ts(self.created, precision)),
            ("modified", ts(self.modified, precision)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreFilmwork {
    pub id: Uuid,
    pub film_work: Uuid,
    pub genre: Uuid,
    pub created: Option<DateTime<Utc>>,
}

impl Entity for GenreFilmwork {
    const KIND: EntityKind = EntityKind::GenreFilmwork;

    fn from_fields(fields: &FieldSet<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            id: fields.uuid(Field::Id)?,
            film_work: fields.uuid(Field::FilmWork)?,
            genre: fields.uuid(Field::Genre)?,
            created: fields.opt_timestamp(Field::Created)?,
        })
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn comparable_fields(&self, precision: TimestampPrecision) -> Vec<ComparableField> {
        vec![
            ("id", uuid_text(self.id)),
            ("film_work", uuid_text(self.film_work)),
            ("genre", uuid_text(self.genre)),
            ("created", ts(self.created, precision)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonFilmWork {
    pub id: Uuid,
    pub film_work: Uuid,
    pub person: Uuid,
    pub role: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

impl Entity for PersonFilmWork {
    const KIND: EntityKind = EntityKind::PersonFilmWork;

    fn from_fields(fields: &FieldSet<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            id: fields.uuid(Field::Id)?,
            film_work: fields.uuid(Field::FilmWork)?,
            person: fields.uuid(Field::Person)?,
            role: fields.opt_text(Field::Role)?,
            created: fields.opt_timestamp(Field::Created)?,
        })
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn comparable_fields(&self, precision: TimestampPrecision) -> Vec<ComparableField> {
        vec![
            ("id", uuid_text(self.id)),
            ("film_work", uuid_text(self.film_work)),
            ("person", uuid_text(self.person)),
            ("role", self.role.clone()),
            ("created", ts(self.created, precision)),
        ]
    }
}

/// Any record, for callers that only learn the entity kind at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Person(Person),
    Genre(Genre),
    Filmwork(Filmwork),
    GenreFilmwork(GenreFilmwork),
    PersonFilmWork(PersonFilmWork),
}

impl Record {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Person(_) => EntityKind::Person,
            Self::Genre(_) => EntityKind::Genre,
            Self::Filmwork(_) => EntityKind::Filmwork,
            Self::GenreFilmwork(_) => EntityKind::GenreFilmwork,
            Self::PersonFilmWork(_) => EntityKind::PersonFilmWork,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::Person(r) => r.id,
            Self::Genre(r) => r.id,
            Self::Filmwork(r) => r.id,
            Self::GenreFilmwork(r) => r.id,
            Self::PersonFilmWork(r) => r.id,
        }
    }
}

/// All records of one entity kind, ready for a bulk insert.
#[derive(Debug, Clone, PartialEq)]
pub enum Batch {
    Person(Vec<Person>),
    Genre(Vec<Genre>),
    Filmwork(Vec<Filmwork>),
    GenreFilmwork(Vec<GenreFilmwork>),
    PersonFilmWork(Vec<PersonFilmWork>),
}

impl Batch {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Person(_) => EntityKind::Person,
            Self::Genre(_) => EntityKind::Genre,
            Self::Filmwork(_) => EntityKind::Filmwork,
            Self::GenreFilmwork(_) => EntityKind::GenreFilmwork,
            Self::PersonFilmWork(_) => EntityKind::PersonFilmWork,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Person(r) => r.len(),
            Self::Genre(r) => r.len(),
            Self::Filmwork(r) => r.len(),
            Self::GenreFilmwork(r) => r.len(),
            Self::PersonFilmWork(r) => r.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! batch_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$variant>> for Batch {
                fn from(records: Vec<$variant>) -> Self {
                    Self::$variant(records)
                }
            }
        )*
    };
}

batch_from!(Person, Genre, Filmwork, GenreFilmwork, PersonFilmWork);
