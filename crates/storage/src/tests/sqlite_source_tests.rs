use std::path::Path;

use chrono::NaiveDate;
use movies_etl_core::{EntityKind, Filmwork, FilmworkType, StoreSide, Value, map_entity};

use super::{create_test_source, insert_genres};
use crate::{SqliteSource, StorageError, TableSource as _};

const FILM_ID: &str = "3d825f60-9fff-4dfe-b294-1a45fa1e115d";

#[tokio::test]
#[expect(clippy::unwrap_used, reason = "test code")]
async fn film_work_rows_carry_source_columns() {
    let (source, _dir) = create_test_source(|conn| {
        conn.execute(
            "INSERT INTO film_work VALUES (?1, 'Star Wars', NULL, '1977-05-25', '/films/sw.mp4',
             8.6, 'movie', '2021-06-16 20:14:09.221855+00', '2021-06-16 20:14:09.221855+00')",
            [FILM_ID],
        )
        .unwrap();
    });

    let page = source.fetch_page("film_work", 0, 10).await.unwrap();
    assert_eq!(page.len(), 1);
    let row = &page[0];
    assert_eq!(
        row.column_names().unwrap(),
        [
            "id",
            "title",
            "description",
            "creation_date",
            "file_path",
            "rating",
            "type",
            "created_at",
            "updated_at"
        ]
    );
    assert_eq!(row.value(2), Some(&Value::Null));
    assert_eq!(row.value(5), Some(&Value::Real(8.6)));

    let film: Filmwork = map_entity(row, StoreSide::Source).unwrap();
    assert_eq!(film.id.to_string(), FILM_ID);
    assert_eq!(film.title, "Star Wars");
    assert_eq!(film.description, None);
    assert_eq!(film.creation_date, NaiveDate::from_ymd_opt(1977, 5, 25));
    assert_eq!(film.rating, Some(8.6));
    assert_eq!(film.film_type, FilmworkType::Movie);
    assert!(film.created.is_some());
}

#[tokio::test]
#[expect(clippy::unwrap_used, reason = "test code")]
async fn sixteen_byte_blobs_read_as_uuids() {
    let id = uuid::Uuid::new_v4();
    let (source, _dir) = create_test_source(|conn| {
        conn.execute(
            "INSERT INTO person (id, full_name) VALUES (?1, 'George Lucas')",
            [id.as_bytes().to_vec()],
        )
        .unwrap();
    });
    let page = source.fetch_page("person", 0, 10).await.unwrap();
    assert_eq!(page[0].value(0), Some(&Value::Uuid(id)));
}

#[tokio::test]
#[expect(clippy::unwrap_used, reason = "test code")]
async fn other_blobs_are_rejected() {
    let (source, _dir) = create_test_source(|conn| {
        conn.execute(
            "INSERT INTO person (id, full_name) VALUES (X'DEADBEEF', 'Nobody')",
            [],
        )
        .unwrap();
    });
    let err = source.fetch_page("person", 0, 10).await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::UnsupportedColumnType { ref column, .. } if column == "id"
    ));
}

#[tokio::test]
#[expect(clippy::unwrap_used, reason = "test code")]
async fn counts_and_table_names() {
    let (source, _dir) = create_test_source(|conn| {
        insert_genres(conn, 12);
    });
    assert_eq!(source.count_rows("genre").await.unwrap(), 12);
    assert_eq!(source.count_rows("person").await.unwrap(), 0);
    assert_eq!(source.side(), StoreSide::Source);
    assert_eq!(source.table_name(EntityKind::Filmwork), "film_work");
    assert_eq!(source.table_name(EntityKind::PersonFilmWork), "person_film_work");
}

#[tokio::test]
#[expect(clippy::unwrap_used, reason = "test code")]
async fn offset_past_the_end_is_empty() {
    let (source, _dir) = create_test_source(|conn| {
        insert_genres(conn, 2);
    });
    assert!(source.fetch_page("genre", 2, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn table_names_are_validated() {
    let (source, _dir) = create_test_source(|_| {});
    let err = source.count_rows("genre; DROP TABLE person").await;
    assert!(matches!(err, Err(StorageError::InvalidIdentifier { .. })));
}

#[test]
fn missing_file_is_reported() {
    let err = SqliteSource::open(Path::new("/nonexistent/dir/db.sqlite")).unwrap_err();
    assert!(matches!(err, StorageError::SourceNotFound(_)));
}

#[test]
#[expect(clippy::unwrap_used, reason = "test code")]
fn blocking_reads_work_outside_a_runtime() {
    let (source, dir) = create_test_source(|conn| {
        insert_genres(conn, 3);
    });
    assert_eq!(source.path(), dir.path().join("db.sqlite"));
    assert_eq!(source.fetch_page_blocking("genre", 1, 10).unwrap().len(), 2);
    assert_eq!(source.count_rows_blocking("genre").unwrap(), 3);
}
