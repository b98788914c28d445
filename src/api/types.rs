// API types module
// Wire shapes for the fields endpoint; member names are camelCase on the
// wire, the envelope aggregates stay snake_case

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::store::{CreatedFieldRow, FieldRow};

/// One field as the overview returns it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
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

impl From<FieldRow> for FieldRecord {
    fn from(row: FieldRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            area: row.area,
            crop: row.crop,
            status: row.status,
            progress: row.progress,
            plant_date: row.plant_date,
            harvest_date: row.harvest_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One upcoming event with its non-negative day count
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEvent {
    pub id: i32,
    pub field_id: i32,
    /// Display name of the owning field
    pub field: String,
    pub action: String,
    pub date: NaiveDate,
    pub days: i64,
    pub status: String,
    pub notes: Option<String>,
}

/// GET response envelope
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub fields: Vec<FieldRecord>,
    pub events: Vec<UpcomingEvent>,
    pub total_area: f64,
    pub ready_for_harvest: usize,
}

/// POST request payload; all members optional so validation can name what
/// is missing instead of failing deserialization
#[derive(Debug, Deserialize)]
pub struct CreateFieldRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub crop: Option<String>,
}

/// The created field as POST returns it
#[derive(Debug, Serialize)]
pub struct CreatedField {
    pub id: i32,
    pub name: String,
    pub area: f64,
    pub crop: String,
    pub status: String,
    pub progress: i32,
}

impl From<CreatedFieldRow> for CreatedField {
    fn from(row: CreatedFieldRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            area: row.area,
            crop: row.crop,
            status: row.status,
            progress: row.progress,
        }
    }
}

/// POST response envelope
#[derive(Debug, Serialize)]
pub struct CreateFieldResponse {
    pub success: bool,
    pub field: CreatedField,
}
