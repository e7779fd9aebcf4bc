use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Daily status of one employee. Parsing is case-sensitive and accepts no synonyms.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, EnumString, Display, AsRefStr,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// One attendance fact, joined with the owning employee's current name.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": 1,
        "employee_name": "Ann Lee",
        "date": "2024-01-10",
        "status": "Present",
        "created_at": "2024-01-10T09:00:00"
    })
)]
pub struct AttendanceRecord {
    pub id: i64,

    /// Internal id of the owning employee
    pub employee_id: i64,

    pub employee_name: String,

    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(value_type = AttendanceStatus)]
    pub status: String,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}
