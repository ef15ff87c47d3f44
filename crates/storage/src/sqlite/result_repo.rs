use quiz_core::model::{GameResult, ResultId, UserId};

use super::SqliteRepository;
use super::mapping::{id_to_i64, map_result_row, result_id_from_i64, write_error};
use crate::repository::{ResultRepository, ResultRow, StorageError};

#[async_trait::async_trait]
impl ResultRepository for SqliteRepository {
    async fn append_result(&self, result: &GameResult) -> Result<ResultId, StorageError> {
        let user_id = id_to_i64("user_id", result.user_id().value())?;

        let res = sqlx::query(
            r"
                INSERT INTO results (user_id, correct_count, wrong_count, completed_at)
                VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(user_id)
        .bind(i64::from(result.correct()))
        .bind(i64::from(result.wrong()))
        .bind(result.completed_at())
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        result_id_from_i64(res.last_insert_rowid())
    }

    async fn list_recent_results(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<ResultRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, user_id, correct_count, wrong_count, completed_at
                FROM results
                WHERE user_id = ?1
                ORDER BY id DESC
                LIMIT ?2
            ",
        )
        .bind(id_to_i64("user_id", user_id.value())?)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_result_row(&row)?);
        }
        Ok(out)
    }

    async fn best_result(&self, user_id: UserId) -> Result<Option<ResultRow>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, user_id, correct_count, wrong_count, completed_at
                FROM results
                WHERE user_id = ?1
                ORDER BY correct_count DESC, id ASC
                LIMIT 1
            ",
        )
        .bind(id_to_i64("user_id", user_id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_result_row).transpose()
    }
}
