//! In-memory stores standing in for SQLite and PostgreSQL.

#![expect(clippy::unwrap_used, reason = "test code")]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use movies_etl_core::{Batch, EntityKind, RawRow, Record, StoreSide, Value};
use movies_etl_storage::{BulkSink, StorageError, TableSource};
use uuid::Uuid;

pub const TS: &str = "2021-06-16 20:14:09.221855+00";

fn text(s: &str) -> Value {
    Value::Text(s.to_owned())
}

fn id_text(id: Uuid) -> Value {
    Value::Text(id.to_string())
}

/// Source rows exactly as the legacy file lays them out, all text.
#[derive(Default)]
pub struct MemorySource {
    tables: HashMap<&'static str, Vec<RawRow>>,
}

impl MemorySource {
    pub fn push(&mut self, table: &'static str, values: Vec<Value>) -> &mut Self {
        self.tables.entry(table).or_default().push(RawRow::positional(values));
        self
    }

    pub fn person(&mut self, id: Uuid, name: &str) -> &mut Self {
        self.push("person", vec![id_text(id), text(name), text(TS), text(TS)])
    }

    pub fn genre(&mut self, id: Uuid, name: &str) -> &mut Self {
        self.push("genre", vec![id_text(id), text(name), Value::Null, text(TS), text(TS)])
    }

    pub fn film(&mut self, id: Uuid, title: &str) -> &mut Self {
        self.push(
            "film_work",
            vec![
                id_text(id),
                text(title),
                text("A long time ago"),
                text("1977-05-25"),
                text("/films/movie.mp4"),
                Value::Real(8.6),
                text("movie"),
                text(TS),
                text(TS),
            ],
        )
    }

    pub fn genre_link(&mut self, film: Uuid, genre: Uuid) -> &mut Self {
        self.push(
            "genre_film_work",
            vec![id_text(Uuid::new_v4()), id_text(film), id_text(genre), text(TS)],
        )
    }

    pub fn person_link(&mut self, film: Uuid, person: Uuid, role: &str) -> &mut Self {
        self.push(
            "person_film_work",
            vec![id_text(Uuid::new_v4()), id_text(film), id_text(person), text(role), text(TS)],
        )
    }
}

#[async_trait]
impl TableSource for MemorySource {
    fn side(&self) -> StoreSide {
        StoreSide::Source
    }

    async fn fetch_page(
        &self,
        table: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RawRow>, StorageError> {
        Ok(self
            .tables
            .get(table)
            .map(|rows| rows.iter().skip(offset).take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn count_rows(&self, table: &str) -> Result<u64, StorageError> {
        Ok(self.tables.get(table).map_or(0, |rows| rows.len() as u64))
    }
}

/// Two people, three genres, two films and their links.
pub fn sample_catalog() -> MemorySource {
    let (lucas, hamill) = (Uuid::new_v4(), Uuid::new_v4());
    let (action, drama, scifi) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let (star_wars, empire) = (Uuid::new_v4(), Uuid::new_v4());

    let mut source = MemorySource::default();
    source
        .person(lucas, "George Lucas")
        .person(hamill, "Mark Hamill")
        .genre(action, "Action")
        .genre(drama, "Drama")
        .genre(scifi, "Sci-Fi")
        .film(star_wars, "Star Wars")
        .film(empire, "The Empire Strikes Back")
        .genre_link(star_wars, action)
        .genre_link(star_wars, scifi)
        .genre_link(empire, drama)
        .person_link(star_wars, lucas, "director")
        .person_link(empire, hamill, "actor");
    source
}

/// Target double: keeps records, enforces foreign keys and skips existing
/// ids the way `ON CONFLICT (id) DO NOTHING` does.
#[derive(Default)]
pub struct MemoryTarget {
    records: Mutex<HashMap<EntityKind, Vec<Record>>>,
    truncations: AtomicUsize,
}

impl MemoryTarget {
    pub fn truncations(&self) -> usize {
        self.truncations.load(Ordering::SeqCst)
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.records.lock().unwrap().get(&kind).map_or(0, Vec::len)
    }

    pub fn insert_raw(&self, record: Record) {
        self.records.lock().unwrap().entry(record.kind()).or_default().push(record);
    }

    pub fn edit(&self, kind: EntityKind, f: impl FnOnce(&mut Vec<Record>)) {
        f(self.records.lock().unwrap().entry(kind).or_default());
    }

    fn ids(records: &HashMap<EntityKind, Vec<Record>>, kind: EntityKind) -> HashSet<Uuid> {
        records.get(&kind).map(|r| r.iter().map(Record::id).collect()).unwrap_or_default()
    }
}

fn batch_records(batch: &Batch) -> Vec<Record> {
    match batch {
        Batch::Person(r) => r.iter().cloned().map(Record::Person).collect(),
        Batch::Genre(r) => r.iter().cloned().map(Record::Genre).collect(),
        Batch::Filmwork(r) => r.iter().cloned().map(Record::Filmwork).collect(),
        Batch::GenreFilmwork(r) => r.iter().cloned().map(Record::GenreFilmwork).collect(),
        Batch::PersonFilmWork(r) => r.iter().cloned().map(Record::PersonFilmWork).collect(),
    }
}

fn ts_value(ts: Option<chrono::DateTime<chrono::Utc>>) -> Value {
    ts.map_or(Value::Null, Value::Timestamp)
}

fn opt_text(s: Option<&String>) -> Value {
    s.map_or(Value::Null, |s| Value::Text(s.clone()))
}

/// A record as the target would return it, in target column order.
fn target_row(record: &Record) -> RawRow {
    RawRow::positional(match record {
        Record::Person(p) => vec![
            ts_value(p.created),
            ts_value(p.modified),
            Value::Uuid(p.id),
            text(&p.full_name),
        ],
        Record::Genre(g) => vec![Value::Uuid(g.id), text(&g.name), opt_text(g.description.as_ref())],
        Record::Filmwork(f) => vec![
            ts_value(f.created),
            ts_value(f.modified),
            Value::Uuid(f.id),
            text(&f.title),
            opt_text(f.description.as_ref()),
            f.creation_date.map_or(Value::Null, Value::Date),
            f.rating.map_or(Value::Null, Value::Real),
            text(f.film_type.as_str()),
        ],
        Record::GenreFilmwork(l) => vec![
            Value::Uuid(l.id),
            ts_value(l.created),
            Value::Uuid(l.film_work),
            Value::Uuid(l.genre),
        ],
        Record::PersonFilmWork(l) => vec![
            Value::Uuid(l.id),
            opt_text(l.role.as_ref()),
            ts_value(l.created),
            Value::Uuid(l.film_work),
            Value::Uuid(l.person),
        ],
    })
}

/// Parent ids a junction record points at, with the parent kind.
fn references(record: &Record) -> Vec<(EntityKind, Uuid)> {
    match record {
        Record::GenreFilmwork(l) => {
            vec![(EntityKind::Filmwork, l.film_work), (EntityKind::Genre, l.genre)]
        },
        Record::PersonFilmWork(l) => {
            vec![(EntityKind::Filmwork, l.film_work), (EntityKind::Person, l.person)]
        },
        _ => Vec::new(),
    }
}

#[async_trait]
impl BulkSink for MemoryTarget {
    async fn truncate(&self, kinds: &[EntityKind]) -> Result<(), StorageError> {
        self.truncations.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        for kind in kinds {
            records.remove(kind);
        }
        Ok(())
    }

    async fn load(&self, batch: &Batch) -> Result<u64, StorageError> {
        let incoming = batch_records(batch);
        let mut records = self.records.lock().unwrap();
        for record in &incoming {
            for (parent, id) in references(record) {
                if !Self::ids(&records, parent).contains(&id) {
                    return Err(StorageError::ForeignKeyViolation(format!(
                        "{} {} references missing {parent} {id}",
                        record.kind(),
                        record.id()
                    )));
                }
            }
        }
        let mut existing = Self::ids(&records, batch.kind());
        let table = records.entry(batch.kind()).or_default();
        let mut inserted = 0;
        for record in incoming {
            if existing.insert(record.id()) {
                table.push(record);
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

#[async_trait]
impl TableSource for MemoryTarget {
    fn side(&self) -> StoreSide {
        StoreSide::Target
    }

    async fn fetch_page(
        &self,
        table: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RawRow>, StorageError> {
        let kind: EntityKind = table.parse().unwrap();
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&kind)
            .map(|r| r.iter().skip(offset).take(limit).map(target_row).collect())
            .unwrap_or_default())
    }

    async fn count_rows(&self, table: &str) -> Result<u64, StorageError> {
        Ok(self.len(table.parse().unwrap()) as u64)
    }
}
