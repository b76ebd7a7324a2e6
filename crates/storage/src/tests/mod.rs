//! Test utilities and module declarations for storage tests.

use rusqlite::Connection;
use tempfile::TempDir;

use crate::SqliteSource;

/// The legacy catalog layout, column for column.
pub const SOURCE_SCHEMA: &str = "
    CREATE TABLE person (
        id TEXT PRIMARY KEY,
        full_name TEXT NOT NULL,
        created_at TIMESTAMP WITH TIME ZONE,
        updated_at TIMESTAMP WITH TIME ZONE
    );
    CREATE TABLE genre (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        created_at TIMESTAMP WITH TIME ZONE,
        updated_at TIMESTAMP WITH TIME ZONE
    );
    CREATE TABLE film_work (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        creation_date DATE,
        file_path TEXT,
        rating FLOAT,
        type TEXT NOT NULL,
        created_at TIMESTAMP WITH TIME ZONE,
        updated_at TIMESTAMP WITH TIME ZONE
    );
    CREATE TABLE genre_film_work (
        id TEXT PRIMARY KEY,
        film_work_id TEXT NOT NULL,
        genre_id TEXT NOT NULL,
        created_at TIMESTAMP WITH TIME ZONE
    );
    CREATE TABLE person_film_work (
        id TEXT PRIMARY KEY,
        film_work_id TEXT NOT NULL,
        person_id TEXT NOT NULL,
        role TEXT,
        created_at TIMESTAMP WITH TIME ZONE
    );
";

/// Build a source file from [`SOURCE_SCHEMA`] plus `seed`, then open it
/// the way the loader does.
#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_source(seed: impl FnOnce(&Connection)) -> (SqliteSource, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("db.sqlite");
    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(SOURCE_SCHEMA).unwrap();
        seed(&conn);
    }
    let source = SqliteSource::open(&db_path).unwrap();
    (source, temp_dir)
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn insert_genres(conn: &Connection, count: usize) -> Vec<String> {
    (0..count)
        .map(|n| {
            let id = uuid::Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO genre (id, name, description, created_at, updated_at)
                 VALUES (?1, ?2, NULL, '2021-06-16 20:14:09.221855+00', '2021-06-16 20:14:09.221855+00')",
                rusqlite::params![id, format!("Genre {n}")],
            )
            .unwrap();
            id
        })
        .collect()
}

mod sqlite_source_tests;
