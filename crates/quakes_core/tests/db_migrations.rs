use quakes_core::db::migrations::latest_version;
use quakes_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "quakes");
    assert_index_exists(&conn, "idx_quakes_time");
    assert_index_exists(&conn, "idx_quakes_magnitude");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quakes.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "quakes");
}

#[test]
fn schema_rejects_out_of_range_coordinates() {
    let conn = open_db_in_memory().unwrap();

    let err = conn
        .execute(
            "INSERT INTO quakes (code, magnitude, time_ms, location_name, longitude, latitude)
             VALUES ('bad-lat', 3.0, 0, 'x', 10.0, 95.0);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("CHECK constraint failed"));

    let err = conn
        .execute(
            "INSERT INTO quakes (code, magnitude, time_ms, location_name, longitude, latitude)
             VALUES ('bad-lon', 3.0, 0, 'x', -181.0, 10.0);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("CHECK constraint failed"));

    conn.execute(
        "INSERT INTO quakes (code, magnitude, time_ms, location_name, longitude, latitude)
         VALUES ('edge', 3.0, 0, 'x', 180.0, -90.0);",
        [],
    )
    .unwrap();
}

#[test]
fn opened_connections_fold_unicode_case() {
    let conn = open_db_in_memory().unwrap();

    let folded: String = conn
        .query_row("SELECT fold_case('ÉFATÉ, Vanuatu');", [], |row| row.get(0))
        .unwrap();
    assert_eq!(folded, "éfaté, vanuatu");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'index' AND tbl_name = 'quakes' AND name = ?1
            );",
            [index_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "index {index_name} does not exist");
}
