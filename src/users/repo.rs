use sqlx::PgExecutor;
use uuid::Uuid;

use super::model::User;

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, username, password_hash, created_at";

impl User {
    /// Persist a new user. Works on the pool or on a session's connection.
    pub async fn insert<'e, E>(&self, db: E) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            r#"
            INSERT INTO users (id, first_name, last_name, email, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(self.id)
            .bind(&self.first_name)
            .bind(&self.last_name)
            .bind(&self.email)
            .bind(&self.username)
            .bind(&self.password_hash)
            .bind(self.created_at)
            .fetch_one(db)
            .await
    }

    pub async fn find_by_id<'e, E>(db: E, id: Uuid) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_email<'e, E>(db: E, email: &str) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_username<'e, E>(
        db: E,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(db)
            .await
    }

    /// Returns whether a row was removed.
    pub async fn delete<'e, E>(db: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let done = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}
