use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::attendance::AttendanceRecord;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": "E1",
        "full_name": "Ann Lee",
        "email": "ann@x.com",
        "department": "Eng",
        "created_at": "2024-01-10T09:00:00"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: i64,

    /// External employee code, unique across the directory
    #[schema(example = "E1")]
    pub employee_id: String,

    #[schema(example = "Ann Lee")]
    pub full_name: String,

    /// Always stored lowercase
    #[schema(example = "ann@x.com")]
    pub email: String,

    #[schema(example = "Eng")]
    pub department: String,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,

    /// Only filled in when a single employee is fetched
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub attendances: Option<Vec<AttendanceRecord>>,
}
