// Fields and field-events queries
// Row structs mirror the column lists; area is cast to DOUBLE PRECISION so
// NUMERIC storage always maps to f64

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::FromRow;

use super::DbPool;

/// One row of the `fields` table as the overview reads it
#[derive(Debug, FromRow)]
pub struct FieldRow {
    pub id: i32,
    pub name: String,
    pub area: f64,
    pub crop: String,
    pub status: String,
    pub progress: i32,
    pub plant_date: Option<NaiveDate>,
    pub harvest_date: Option<NaiveDate>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// One upcoming event joined to its field's display name
#[derive(Debug, FromRow)]
pub struct EventRow {
    pub id: i32,
    pub field_id: i32,
    pub field_name: String,
    pub action: String,
    pub event_date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
}

/// Values for a field insert; status and progress are fixed by the insert
/// statement itself ('planted', 0)
#[derive(Debug)]
pub struct NewField {
    pub name: String,
    pub area: f64,
    pub crop: String,
}

/// The columns the insert returns
#[derive(Debug, FromRow)]
pub struct CreatedFieldRow {
    pub id: i32,
    pub name: String,
    pub area: f64,
    pub crop: String,
    pub status: String,
    pub progress: i32,
}

/// All fields, newest first
pub async fn list_fields(pool: &DbPool) -> Result<Vec<FieldRow>, sqlx::Error> {
    sqlx::query_as::<_, FieldRow>(
        "SELECT id, name, area::DOUBLE PRECISION AS area, crop, status, progress, \
                plant_date, harvest_date, created_at, updated_at \
         FROM fields \
         ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

/// Events on or after the store's current date, soonest first
pub async fn upcoming_events(pool: &DbPool) -> Result<Vec<EventRow>, sqlx::Error> {
    sqlx::query_as::<_, EventRow>(
        "SELECT fe.id, fe.field_id, f.name AS field_name, fe.action, \
                fe.event_date, fe.status, fe.notes \
         FROM field_events fe \
         JOIN fields f ON fe.field_id = f.id \
         WHERE fe.event_date >= CURRENT_DATE \
         ORDER BY fe.event_date ASC",
    )
    .fetch_all(pool)
    .await
}

/// Insert a field and return the created row in one transaction.
///
/// The transaction guard rolls back on drop if the insert or the returning
/// fetch fails, and the pooled connection goes back to the pool on every
/// exit path.
pub async fn insert_field(pool: &DbPool, new: &NewField) -> Result<CreatedFieldRow, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, CreatedFieldRow>(
        "INSERT INTO fields (name, area, crop, status, progress) \
         VALUES ($1, $2, $3, 'planted', 0) \
         RETURNING id, name, area::DOUBLE PRECISION AS area, crop, status, progress",
    )
    .bind(&new.name)
    .bind(new.area)
    .bind(&new.crop)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(row)
}
