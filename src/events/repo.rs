use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreResult;
use crate::events::repo_types::{Event, EventChanges, NewEvent};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, new: NewEvent) -> StoreResult<Event>;
    async fn list(&self) -> StoreResult<Vec<Event>>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Event>>;
    /// Apply `changes` and bump `updated_at`. `None` when the id is unknown.
    async fn update(&self, id: i64, changes: EventChanges) -> StoreResult<Option<Event>>;
    /// Hard delete. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

const EVENT_COLUMNS: &str = "id, title, description, date, created_by, created_at, updated_at";

#[derive(Clone)]
pub struct PgEventRepository {
    db: PgPool,
}

impl PgEventRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create(&self, new: NewEvent) -> StoreResult<Event> {
        let sql = format!(
            r#"
            INSERT INTO events (title, description, date, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING {EVENT_COLUMNS}
            "#
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(&new.title)
            .bind(&new.description)
            .bind(new.date)
            .bind(new.created_by)
            .fetch_one(&self.db)
            .await?;
        Ok(event)
    }

    async fn list(&self) -> StoreResult<Vec<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY id");
        let events = sqlx::query_as::<_, Event>(&sql).fetch_all(&self.db).await?;
        Ok(events)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(event)
    }

    async fn update(&self, id: i64, changes: EventChanges) -> StoreResult<Option<Event>> {
        let sql = format!(
            r#"
            UPDATE events
               SET title       = COALESCE($2, title),
                   description = COALESCE($3, description),
                   date        = COALESCE($4, date),
                   updated_at  = now()
             WHERE id = $1
         RETURNING {EVENT_COLUMNS}
            "#
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.date)
            .fetch_optional(&self.db)
            .await?;
        Ok(event)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
