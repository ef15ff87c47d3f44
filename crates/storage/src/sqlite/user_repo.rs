use quiz_core::model::{User, UserId, Username};

use super::SqliteRepository;
use super::mapping::{map_user_row, user_id_from_i64, write_error};
use crate::repository::{NewUserRecord, StorageError, UserRepository};

#[async_trait::async_trait]
impl UserRepository for SqliteRepository {
    async fn insert_user(&self, user: NewUserRecord) -> Result<UserId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO users (username, password_hash)
            VALUES (?1, ?2)
            ",
        )
        .bind(user.username.as_str())
        .bind(user.password_hash.as_str())
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        user_id_from_i64(res.last_insert_rowid())
    }

    async fn find_user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, username, password_hash
            FROM users
            WHERE username = ?1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_user_row).transpose()
    }
}
