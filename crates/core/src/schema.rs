//! Column layouts per entity kind and store.
//!
//! Layouts are immutable statics. The mapper looks one up for every row, so
//! mapping a thousand rows behaves exactly like mapping one.

use std::fmt;

use crate::entity::{EntityKind, StoreSide};

/// A record field a column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    FullName,
    Name,
    Title,
    Description,
    CreationDate,
    Rating,
    Type,
    Created,
    Modified,
    Updated,
    FilmWork,
    Genre,
    Person,
    Role,
}

impl Field {
    pub const COUNT: usize = 15;

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Id => "id",
            Self::FullName => "full_name",
            Self::Name => "name",
            Self::Title => "title",
            Self::Description => "description",
            Self::CreationDate => "creation_date",
            Self::Rating => "rating",
            Self::Type => "type",
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Updated => "updated",
            Self::FilmWork => "film_work",
            Self::Genre => "genre",
            Self::Person => "person",
            Self::Role => "role",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a layout. `field: None` marks a column that is read but
/// has no counterpart in the record (still counted).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub field: Option<Field>,
}

const fn col(name: &'static str, field: Field) -> Column {
    Column { name, field: Some(field) }
}

const fn skip(name: &'static str) -> Column {
    Column { name, field: None }
}

const SOURCE_PERSON: [Column; 4] = [
    col("id", Field::Id),
    col("full_name", Field::FullName),
    col("created_at", Field::Created),
    col("updated_at", Field::Modified),
];

const SOURCE_GENRE: [Column; 5] = [
    col("id", Field::Id),
    col("name", Field::Name),
    col("description", Field::Description),
    col("created_at", Field::Created),
    col("updated_at", Field::Updated),
];

const SOURCE_FILMWORK: [Column; 9] = [
    col("id", Field::Id),
    col("title", Field::Title),
    col("description", Field::Description),
    col("creation_date", Field::CreationDate),
    skip("file_path"),
    col("rating", Field::Rating),
    col("type", Field::Type),
    col("created_at", Field::Created),
    col("updated_at", Field::Modified),
];

const SOURCE_GENRE_FILMWORK: [Column; 4] = [
    col("id", Field::Id),
    col("film_work_id", Field::FilmWork),
    col("genre_id", Field::Genre),
    col("created_at", Field::Created),
];

const SOURCE_PERSON_FILMWORK: [Column; 5] = [
    col("id", Field::Id),
    col("film_work_id", Field::FilmWork),
    col("person_id", Field::Person),
    col("role", Field::Role),
    col("created_at", Field::Created),
];

const TARGET_PERSON: [Column; 4] = [
    col("created", Field::Created),
    col("modified", Field::Modified),
    col("id", Field::Id),
    col("full_name", Field::FullName),
];

const TARGET_GENRE: [Column; 3] =
    [col("id", Field::Id), col("name", Field::Name), col("description", Field::Description)];

const TARGET_FILMWORK: [Column; 8] = [
    col("created", Field::Created),
    col("modified", Field::Modified),
    col("id", Field::Id),
    col("title", Field::Title),
    col("description", Field::Description),
    col("creation_date", Field::CreationDate),
    col("rating", Field::Rating),
    col("type", Field::Type),
];

const TARGET_GENRE_FILMWORK: [Column; 4] = [
    col("id", Field::Id),
    col("created", Field::Created),
    col("film_work_id", Field::FilmWork),
    col("genre_id", Field::Genre),
];

const TARGET_PERSON_FILMWORK: [Column; 5] = [
    col("id", Field::Id),
    col("role", Field::Role),
    col("created", Field::Created),
    col("film_work_id", Field::FilmWork),
    col("person_id", Field::Person),
];

/// The ordered columns a full scan of `kind` returns from `side`.
#[must_use]
pub const fn layout(kind: EntityKind, side: StoreSide) -> &'static [Column] {
    match (side, kind) {
        (StoreSide::Source, EntityKind::Person) => &SOURCE_PERSON,
        (StoreSide::Source, EntityKind::Genre) => &SOURCE_GENRE,
        (StoreSide::Source, EntityKind::Filmwork) => &SOURCE_FILMWORK,
        (StoreSide::Source, EntityKind::GenreFilmwork) => &SOURCE_GENRE_FILMWORK,
        (StoreSide::Source, EntityKind::PersonFilmWork) => &SOURCE_PERSON_FILMWORK,
        (StoreSide::Target, EntityKind::Person) => &TARGET_PERSON,
        (StoreSide::Target, EntityKind::Genre) => &TARGET_GENRE,
        (StoreSide::Target, EntityKind::Filmwork) => &TARGET_FILMWORK,
        (StoreSide::Target, EntityKind::GenreFilmwork) => &TARGET_GENRE_FILMWORK,
        (StoreSide::Target, EntityKind::PersonFilmWork) => &TARGET_PERSON_FILMWORK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_layout_maps_the_id() {
        for side in [StoreSide::Source, StoreSide::Target] {
            for kind in EntityKind::LOAD_ORDER {
                assert!(
                    layout(kind, side).iter().any(|c| c.field == Some(Field::Id)),
                    "{kind} {side} layout has no id column"
                );
            }
        }
    }

    #[test]
    fn field_indices_fit_the_field_set() {
        assert_eq!(Field::Role.index(), Field::COUNT - 1);
    }

    #[test]
    fn source_filmwork_skips_file_path() {
        let columns = layout(EntityKind::Filmwork, StoreSide::Source);
        assert_eq!(columns.len(), 9);
        assert_eq!(columns[4], Column { name: "file_path", field: None });
    }
}
