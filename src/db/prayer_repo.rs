use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{Category, NewPrayerEntry, PrayerEntry};

/// Persistent store of prayer entries.
///
/// No ownership checks happen here; callers scope writes through
/// [`crate::server::gate`].
#[derive(Debug, Clone)]
pub struct PrayerRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct PrayerEntryRow {
    id: i64,
    user_id: i64,
    name: String,
    description: Option<String>,
    category: String,
    is_resolved: bool,
    created_at: String,
}

impl TryFrom<PrayerEntryRow> for PrayerEntry {
    type Error = sqlx::Error;

    fn try_from(row: PrayerEntryRow) -> Result<Self, Self::Error> {
        let category: Category = row
            .category
            .parse()
            .map_err(|e: String| sqlx::Error::Decode(e.into()))?;

        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(PrayerEntry {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            category,
            is_resolved: row.is_resolved,
            created_at,
        })
    }
}

impl PrayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All entries owned by `user_id`, oldest first.
    pub async fn list(&self, user_id: i64) -> Result<Vec<PrayerEntry>, sqlx::Error> {
        let rows: Vec<PrayerEntryRow> =
            sqlx::query_as("SELECT * FROM prayer_entries WHERE user_id = ? ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(PrayerEntry::try_from).collect()
    }

    pub async fn create(
        &self,
        user_id: i64,
        entry: &NewPrayerEntry,
    ) -> Result<PrayerEntry, sqlx::Error> {
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO prayer_entries (user_id, name, description, category, is_resolved, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(user_id)
        .bind(&entry.name)
        .bind(&entry.description)
        .bind(entry.category.as_str())
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<PrayerEntry>, sqlx::Error> {
        let row: Option<PrayerEntryRow> = sqlx::query_as("SELECT * FROM prayer_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(PrayerEntry::try_from).transpose()
    }

    /// Looks up an entry by the `(id, user_id)` pair.
    pub async fn find_owned(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<PrayerEntry>, sqlx::Error> {
        let row: Option<PrayerEntryRow> =
            sqlx::query_as("SELECT * FROM prayer_entries WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(PrayerEntry::try_from).transpose()
    }

    /// Sets the resolved flag. Returns `None` if the entry does not exist.
    pub async fn update(
        &self,
        id: i64,
        is_resolved: bool,
    ) -> Result<Option<PrayerEntry>, sqlx::Error> {
        let result = sqlx::query("UPDATE prayer_entries SET is_resolved = ? WHERE id = ?")
            .bind(is_resolved)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Deleting an id that does not exist is not an error.
    pub async fn delete(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM prayer_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
