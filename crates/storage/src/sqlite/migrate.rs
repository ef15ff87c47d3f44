use chrono::Utc;
use sqlx::{Row, SqliteConnection, SqlitePool};

use super::SqliteInitError;

async fn column_names(conn: &mut SqliteConnection, table: &str) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query("SELECT name FROM pragma_table_info(?1)")
        .bind(table)
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(|row| row.try_get::<String, _>("name")).collect()
}

/// Renames `from` to `to` when the table still carries the older column name.
async fn rename_legacy_column(
    conn: &mut SqliteConnection,
    table: &str,
    from: &str,
    to: &str,
) -> Result<(), sqlx::Error> {
    let columns = column_names(conn, table).await?;
    if columns.iter().any(|c| c == from) && !columns.iter().any(|c| c == to) {
        sqlx::query(&format!("ALTER TABLE {table} RENAME COLUMN {from} TO {to}"))
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Brings tables written by the first release of the game (plain `password`,
/// `correct_answers`/`wrong_answers`, no timestamp) up to the version 1 layout.
/// Old results get the upgrade time as `completed_at`.
async fn upgrade_legacy_tables(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    rename_legacy_column(conn, "users", "password", "password_hash").await?;
    rename_legacy_column(conn, "results", "correct_answers", "correct_count").await?;
    rename_legacy_column(conn, "results", "wrong_answers", "wrong_count").await?;

    let columns = column_names(conn, "results").await?;
    if !columns.is_empty() && !columns.iter().any(|c| c == "completed_at") {
        sqlx::query("ALTER TABLE results ADD COLUMN completed_at TEXT NOT NULL DEFAULT ''")
            .execute(&mut *conn)
            .await?;
        sqlx::query("UPDATE results SET completed_at = ?1 WHERE completed_at = ''")
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Applies pending schema versions. Tables left by the first release of the
/// game are upgraded in place before version 1 is recorded.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: users and results.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        upgrade_legacy_tables(&mut *tx).await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT UNIQUE NOT NULL,
                    password_hash TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS results (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    correct_count INTEGER NOT NULL CHECK (correct_count >= 0),
                    wrong_count INTEGER NOT NULL CHECK (wrong_count >= 0),
                    completed_at TEXT NOT NULL,
                    FOREIGN KEY (user_id) REFERENCES users(id)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_results_user_id
                    ON results (user_id, id);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
