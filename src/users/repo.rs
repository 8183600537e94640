use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{StoreError, StoreResult};
use crate::users::repo_types::{NewUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with `DuplicateEmail` if any user, deleted or not,
    /// owns the email.
    async fn create(&self, new: NewUser) -> StoreResult<User>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>>;
    /// Email lookups ignore case.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_active_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Every user, soft-deleted ones included, in insertion order.
    async fn list_all(&self) -> StoreResult<Vec<User>>;
    async fn list_active(&self) -> StoreResult<Vec<User>>;
    /// Stamp `deleted_at` unless already set. `None` when the id is unknown.
    async fn soft_delete(&self, id: i64) -> StoreResult<Option<User>>;
    async fn update_last_ip(&self, id: i64, ip: &str) -> StoreResult<()>;
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, last_ip_address, created_at, deleted_at";

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.password_hash)
            .fetch_one(&self.db)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicateEmail,
                other => StoreError::Database(other),
            })
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1) ORDER BY id LIMIT 1"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_active_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1) AND deleted_at IS NULL"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn list_all(&self) -> StoreResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.db).await?;
        Ok(users)
    }

    async fn list_active(&self) -> StoreResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL ORDER BY id");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.db).await?;
        Ok(users)
    }

    async fn soft_delete(&self, id: i64) -> StoreResult<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
               SET deleted_at = COALESCE(deleted_at, now())
             WHERE id = $1
         RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn update_last_ip(&self, id: i64, ip: &str) -> StoreResult<()> {
        sqlx::query("UPDATE users SET last_ip_address = $2 WHERE id = $1")
            .bind(id)
            .bind(ip)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
