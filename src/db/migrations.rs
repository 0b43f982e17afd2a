use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS day_records (
            location  TEXT    NOT NULL,
            system    TEXT    NOT NULL CHECK(system IN ('hijri','gregorian')),
            year      INTEGER NOT NULL,
            month     INTEGER NOT NULL,
            seq       INTEGER NOT NULL,
            g_date    TEXT    NOT NULL,
            h_year    INTEGER NOT NULL,
            h_month   INTEGER NOT NULL,
            h_day     INTEGER NOT NULL,
            payload   TEXT    NOT NULL,
            stored_at TEXT    DEFAULT (datetime('now')),
            PRIMARY KEY (location, system, year, month, seq)
        );

        CREATE INDEX IF NOT EXISTS idx_day_records_g_date
            ON day_records (location, g_date);

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'day_records'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
