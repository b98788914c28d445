// Fields endpoint handlers
// GET builds the overview (fields, upcoming events, aggregates); POST
// validates and inserts one field

use chrono::{Local, NaiveDate};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::response::json_response;
use super::types::{
    CreateFieldRequest, CreateFieldResponse, FieldRecord, OverviewResponse, UpcomingEvent,
};
use crate::config::AppState;
use crate::error::ApiError;
use crate::store::{self, EventRow, NewField};

/// Status literal counted by the `ready_for_harvest` aggregate
const HARVEST_READY_STATUS: &str = "harvest-ready";

const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: name, area, crop";

/// GET: all fields (newest first), upcoming events (soonest first), and the
/// two aggregates computed over the projected fields
pub async fn handle_overview(state: &AppState) -> Result<Response<Full<Bytes>>, ApiError> {
    let pool = state.pool()?;

    let field_rows = store::list_fields(pool).await?;
    let event_rows = store::upcoming_events(pool).await?;

    let fields: Vec<FieldRecord> = field_rows.into_iter().map(Into::into).collect();

    let today = Local::now().date_naive();
    let events: Vec<UpcomingEvent> = event_rows
        .into_iter()
        .map(|row| project_event(row, today))
        .collect();

    let (total_area, ready_for_harvest) = summarize(&fields);

    Ok(json_response(
        StatusCode::OK,
        &OverviewResponse {
            fields,
            events,
            total_area,
            ready_for_harvest,
        },
    ))
}

/// POST: validate the payload and insert one field with status 'planted'
/// and progress 0
pub async fn handle_create(state: &AppState, body: &[u8]) -> Result<Response<Full<Bytes>>, ApiError> {
    // Config check comes first: an unconfigured store answers 500 before
    // the payload is even parsed
    let pool = state.pool()?;

    let payload: CreateFieldRequest = serde_json::from_slice(body)
        .map_err(|e| ApiError::ValidationFailed(format!("Invalid JSON: {e}")))?;
    let new = validate(payload)?;

    let row = store::insert_field(pool, &new).await?;

    Ok(json_response(
        StatusCode::CREATED,
        &CreateFieldResponse {
            success: true,
            field: row.into(),
        },
    ))
}

/// Require non-empty name and crop and a present area.
///
/// Zero is a valid area; emptiness only disqualifies the string members.
fn validate(req: CreateFieldRequest) -> Result<NewField, ApiError> {
    let name = req.name.filter(|n| !n.is_empty());
    let crop = req.crop.filter(|c| !c.is_empty());

    match (name, req.area, crop) {
        (Some(name), Some(area), Some(crop)) => Ok(NewField { name, area, crop }),
        _ => Err(ApiError::ValidationFailed(MISSING_FIELDS_MESSAGE.to_string())),
    }
}

fn project_event(row: EventRow, today: NaiveDate) -> UpcomingEvent {
    UpcomingEvent {
        id: row.id,
        field_id: row.field_id,
        field: row.field_name,
        action: row.action,
        date: row.event_date,
        days: days_until(row.event_date, today),
        status: row.status,
        notes: row.notes,
    }
}

/// Day count until the event, clamped so already-due events read 0
fn days_until(event_date: NaiveDate, today: NaiveDate) -> i64 {
    event_date.signed_duration_since(today).num_days().max(0)
}

/// Float sum of all areas and the count of harvest-ready fields
fn summarize(fields: &[FieldRecord]) -> (f64, usize) {
    let total_area = fields.iter().map(|f| f.area).sum();
    let ready_for_harvest = fields
        .iter()
        .filter(|f| f.status == HARVEST_READY_STATUS)
        .count();

    (total_area, ready_for_harvest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn state_without_store() -> AppState {
        let config = Config::load_from("does-not-exist").expect("defaults should load");
        AppState::without_store(config)
    }

    fn record(area: f64, status: &str) -> FieldRecord {
        FieldRecord {
            id: 1,
            name: "North Field".to_string(),
            area,
            crop: "wheat".to_string(),
            status: status.to_string(),
            progress: 0,
            plant_date: None,
            harvest_date: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_days_until_future() {
        assert_eq!(days_until(date(2026, 8, 15), date(2026, 8, 7)), 8);
    }

    #[test]
    fn test_days_until_clamps_today_and_past() {
        assert_eq!(days_until(date(2026, 8, 7), date(2026, 8, 7)), 0);
        assert_eq!(days_until(date(2026, 8, 1), date(2026, 8, 7)), 0);
    }

    #[test]
    fn test_validate_accepts_zero_area() {
        let req = CreateFieldRequest {
            name: Some("North Field".to_string()),
            area: Some(0.0),
            crop: Some("wheat".to_string()),
        };
        let new = validate(req).expect("zero area is valid");
        assert_eq!(new.area, 0.0);
    }

    #[test]
    fn test_validate_rejects_empty_strings_and_absent_area() {
        let empty_name = CreateFieldRequest {
            name: Some(String::new()),
            area: Some(1.0),
            crop: Some("wheat".to_string()),
        };
        assert!(matches!(
            validate(empty_name),
            Err(ApiError::ValidationFailed(msg)) if msg == MISSING_FIELDS_MESSAGE
        ));

        let empty_crop = CreateFieldRequest {
            name: Some("North Field".to_string()),
            area: Some(1.0),
            crop: Some(String::new()),
        };
        assert!(validate(empty_crop).is_err());

        let no_area = CreateFieldRequest {
            name: Some("North Field".to_string()),
            area: None,
            crop: Some("wheat".to_string()),
        };
        assert!(validate(no_area).is_err());
    }

    #[test]
    fn test_summarize_sums_area_and_counts_ready() {
        let fields = vec![
            record(12.5, "planted"),
            record(3.25, HARVEST_READY_STATUS),
            record(4.25, "growing"),
        ];
        let (total_area, ready) = summarize(&fields);
        assert!((total_area - 20.0).abs() < f64::EPSILON);
        assert_eq!(ready, 1);
        assert!(ready <= fields.len());
    }

    #[test]
    fn test_project_event_clamps_days() {
        let row = EventRow {
            id: 7,
            field_id: 2,
            field_name: "East Field".to_string(),
            action: "harvest".to_string(),
            event_date: date(2026, 8, 5),
            status: "scheduled".to_string(),
            notes: Some("combine booked".to_string()),
        };
        let event = project_event(row, date(2026, 8, 7));
        assert_eq!(event.days, 0);
        assert_eq!(event.field, "East Field");
        assert_eq!(event.date, date(2026, 8, 5));
    }

    #[tokio::test]
    async fn test_overview_without_store_is_config_error() {
        let state = state_without_store();
        let err = handle_overview(&state).await.expect_err("must fail");
        assert!(matches!(err, ApiError::ConfigMissing));
    }

    #[tokio::test]
    async fn test_create_without_store_is_config_error() {
        let state = state_without_store();
        let body = br#"{"name": "North Field", "area": 12.5, "crop": "wheat"}"#;
        let err = handle_create(&state, body).await.expect_err("must fail");
        assert!(matches!(err, ApiError::ConfigMissing));
    }
}
