//! Entity kinds and the two stores they live in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One of the five logical record types of the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Genre,
    Filmwork,
    GenreFilmwork,
    PersonFilmWork,
}

impl EntityKind {
    /// Insertion order: parents first, junctions last, so every foreign key
    /// resolves at the time its row is written.
    pub const LOAD_ORDER: [Self; 5] =
        [Self::Person, Self::Filmwork, Self::Genre, Self::PersonFilmWork, Self::GenreFilmwork];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Person => "person",
            Self::Genre => "genre",
            Self::Filmwork => "filmwork",
            Self::GenreFilmwork => "genre_filmwork",
            Self::PersonFilmWork => "person_filmwork",
        }
    }

    /// Table name in the SQLite source.
    #[must_use]
    pub const fn source_table(&self) -> &'static str {
        match *self {
            Self::Person => "person",
            Self::Genre => "genre",
            Self::Filmwork => "film_work",
            Self::GenreFilmwork => "genre_film_work",
            Self::PersonFilmWork => "person_film_work",
        }
    }

    /// Unqualified table name in the PostgreSQL target.
    #[must_use]
    pub const fn target_table(&self) -> &'static str {
        self.as_str()
    }

    #[must_use]
    pub const fn table(&self, side: StoreSide) -> &'static str {
        match side {
            StoreSide::Source => self.source_table(),
            StoreSide::Target => self.target_table(),
        }
    }

    #[must_use]
    pub const fn is_junction(&self) -> bool {
        matches!(self, Self::GenreFilmwork | Self::PersonFilmWork)
    }

    /// Parent kinds a junction row references.
    #[must_use]
    pub const fn parents(&self) -> &'static [Self] {
        match *self {
            Self::GenreFilmwork => &[Self::Filmwork, Self::Genre],
            Self::PersonFilmWork => &[Self::Filmwork, Self::Person],
            Self::Person | Self::Genre | Self::Filmwork => &[],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts both the target name and the source table name.
impl FromStr for EntityKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::LOAD_ORDER
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.source_table() == s)
            .ok_or_else(|| ConfigError::Invalid {
                name: "entity kind",
                value: s.to_owned(),
                reason: "expected one of person, genre, filmwork, genre_filmwork, person_filmwork"
                    .to_owned(),
            })
    }
}

/// Which store a row was read from. Column order differs between the two.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StoreSide {
    Source,
    Target,
}

impl StoreSide {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

impl fmt::Display for StoreSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreSide {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(Self::Source),
            "target" => Ok(Self::Target),
            _ => Err(ConfigError::Invalid {
                name: "store side",
                value: s.to_owned(),
                reason: "expected source or target".to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn junctions_load_after_their_parents() {
        let order = EntityKind::LOAD_ORDER;
        for (pos, kind) in order.iter().enumerate() {
            for parent in kind.parents() {
                let parent_pos = order.iter().position(|k| k == parent).unwrap();
                assert!(parent_pos < pos, "{parent} must load before {kind}");
            }
        }
        assert!(order[3].is_junction());
        assert!(order[4].is_junction());
    }

    #[test]
    fn table_names_per_side() {
        assert_eq!(EntityKind::Filmwork.table(StoreSide::Source), "film_work");
        assert_eq!(EntityKind::Filmwork.table(StoreSide::Target), "filmwork");
        assert_eq!(EntityKind::PersonFilmWork.source_table(), "person_film_work");
        assert_eq!(EntityKind::PersonFilmWork.target_table(), "person_filmwork");
    }

    #[test]
    fn parse_accepts_either_table_name() {
        assert_eq!("genre_film_work".parse::<EntityKind>().unwrap(), EntityKind::GenreFilmwork);
        assert_eq!("genre_filmwork".parse::<EntityKind>().unwrap(), EntityKind::GenreFilmwork);
        assert!("movies".parse::<EntityKind>().is_err());
    }
}
