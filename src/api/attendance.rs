use crate::{
    error::{ApiError, ApiResult},
    model::attendance::{AttendanceRecord, AttendanceStatus},
    utils::validation::{non_empty, parse_date, parse_status, require_fields},
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use tracing::{debug, info, warn};
use utoipa::{IntoParams, ToSchema};

/// Columns of an [`AttendanceRecord`], for queries aliasing attendance as `a`
/// and employees as `e`.
pub(crate) const RECORD_COLUMNS: &str =
    "a.id, a.employee_id, e.full_name AS employee_name, a.date, a.status, a.created_at";

#[derive(Deserialize, Serialize, ToSchema)]
pub struct RecordAttendance {
    /// Internal id of the employee
    #[schema(example = 1)]
    pub employee_id: Option<i64>,
    #[schema(example = "2024-01-10", format = "date")]
    pub date: Option<String>,
    #[schema(example = "Present")]
    pub status: Option<String>,
}

impl RecordAttendance {
    /// `{}` carries nothing to record.
    fn is_empty(&self) -> bool {
        self.employee_id.is_none() && self.date.is_none() && self.status.is_none()
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AttendanceFilter {
    /// Internal id of the employee
    pub employee_id: Option<String>,
    /// Exact date, YYYY-MM-DD
    pub date: Option<String>,
    /// Inclusive lower bound, YYYY-MM-DD
    pub from_date: Option<String>,
    /// Inclusive upper bound, YYYY-MM-DD
    pub to_date: Option<String>,
}

// Typed values bound to the dynamic WHERE clause
enum FilterValue {
    I64(i64),
    Date(NaiveDate),
}

/// Outcome of an upsert keyed by (employee, date).
pub enum Recorded {
    Created(AttendanceRecord),
    Updated(AttendanceRecord),
}

/// Inserts the fact for (employee, date) or overwrites the status of the
/// existing one. Id and creation time of an existing fact are left alone.
pub async fn upsert_attendance(
    pool: &PgPool,
    employee_id: i64,
    date: NaiveDate,
    status: AttendanceStatus,
) -> ApiResult<Recorded> {
    let mut tx = pool.begin().await?;

    // Holds off a concurrent employee delete until this transaction ends.
    let employee = sqlx::query_scalar::<_, i64>("SELECT id FROM employees WHERE id = $1 FOR SHARE")
        .bind(employee_id)
        .fetch_optional(&mut *tx)
        .await?;
    if employee.is_none() {
        return Err(ApiError::not_found("Employee not found"));
    }

    let insert_sql = format!(
        r#"
        WITH a AS (
            INSERT INTO attendance (employee_id, date, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (employee_id, date) DO NOTHING
            RETURNING id, employee_id, date, status, created_at
        )
        SELECT {RECORD_COLUMNS}
        FROM a JOIN employees e ON e.id = a.employee_id
        "#
    );
    let inserted = sqlx::query_as::<_, AttendanceRecord>(&insert_sql)
        .bind(employee_id)
        .bind(date)
        .bind(status.as_ref())
        .fetch_optional(&mut *tx)
        .await?;

    if let Some(record) = inserted {
        tx.commit().await?;
        info!(id = record.id, employee_id, %date, %status, "Attendance created");
        return Ok(Recorded::Created(record));
    }

    let update_sql = format!(
        r#"
        WITH a AS (
            UPDATE attendance SET status = $3
            WHERE employee_id = $1 AND date = $2
            RETURNING id, employee_id, date, status, created_at
        )
        SELECT {RECORD_COLUMNS}
        FROM a JOIN employees e ON e.id = a.employee_id
        "#
    );
    let updated = sqlx::query_as::<_, AttendanceRecord>(&update_sql)
        .bind(employee_id)
        .bind(date)
        .bind(status.as_ref())
        .fetch_optional(&mut *tx)
        .await?;

    match updated {
        Some(record) => {
            tx.commit().await?;
            info!(id = record.id, employee_id, %date, %status, "Attendance updated");
            Ok(Recorded::Updated(record))
        }
        None => {
            // Conflicting row vanished between the two statements.
            warn!(employee_id, %date, "Attendance row deleted during upsert");
            Err(ApiError::Internal)
        }
    }
}

/// Matching facts, newest date first.
pub async fn find_attendance(
    pool: &PgPool,
    filter: &AttendanceFilter,
) -> ApiResult<Vec<AttendanceRecord>> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(raw) = non_empty(&filter.employee_id) {
        let employee_id = raw
            .parse::<i64>()
            .map_err(|_| ApiError::validation("Invalid employee_id filter"))?;
        args.push(FilterValue::I64(employee_id));
        where_sql.push_str(&format!(" AND a.employee_id = ${}", args.len()));
    }

    if let Some(raw) = non_empty(&filter.date) {
        args.push(FilterValue::Date(parse_date(raw, "date")?));
        where_sql.push_str(&format!(" AND a.date = ${}", args.len()));
    }

    if let Some(raw) = non_empty(&filter.from_date) {
        args.push(FilterValue::Date(parse_date(raw, "from_date")?));
        where_sql.push_str(&format!(" AND a.date >= ${}", args.len()));
    }

    if let Some(raw) = non_empty(&filter.to_date) {
        args.push(FilterValue::Date(parse_date(raw, "to_date")?));
        where_sql.push_str(&format!(" AND a.date <= ${}", args.len()));
    }

    let sql = format!(
        r#"
        SELECT {RECORD_COLUMNS}
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        {where_sql}
        ORDER BY a.date DESC, a.id DESC
        "#
    );
    debug!(sql = %sql, "Fetching attendance");

    let mut query = sqlx::query_as::<_, AttendanceRecord>(&sql);
    for arg in args {
        query = match arg {
            FilterValue::I64(v) => query.bind(v),
            FilterValue::Date(d) => query.bind(d),
        };
    }

    Ok(query.fetch_all(pool).await?)
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Matching records, newest date first", body = [AttendanceRecord]),
        (status = 400, description = "Malformed filter", body = Object, example = json!({
            "error": "Invalid from_date format. Use YYYY-MM-DD"
        }))
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<PgPool>,
    query: web::Query<AttendanceFilter>,
) -> ApiResult<HttpResponse> {
    let records = find_attendance(pool.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Mark attendance
///
/// Creates the record for (employee, date), or overwrites its status when one exists.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = RecordAttendance,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceRecord),
        (status = 200, description = "Existing record updated", body = AttendanceRecord),
        (status = 400, description = "Missing field, bad status or bad date", body = Object, example = json!({
            "error": "Status must be 'Present' or 'Absent'"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn record_attendance(
    pool: web::Data<PgPool>,
    payload: web::Json<RecordAttendance>,
) -> ApiResult<HttpResponse> {
    if payload.is_empty() {
        return Err(ApiError::validation("Request body is required"));
    }

    let employee_id = payload.employee_id.map(|id| id.to_string());
    require_fields(&[
        ("employee_id", employee_id.as_deref()),
        ("date", payload.date.as_deref()),
        ("status", payload.status.as_deref()),
    ])?;

    let status = parse_status(payload.status.as_deref().unwrap_or_default())?;
    let employee_id = payload.employee_id.unwrap_or_default();

    // an unknown employee outranks a malformed date
    let known = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM employees WHERE id = $1)")
        .bind(employee_id)
        .fetch_one(pool.get_ref())
        .await?;
    if !known {
        return Err(ApiError::not_found("Employee not found"));
    }

    let date = parse_date(payload.date.as_deref().unwrap_or_default(), "date")?;

    match upsert_attendance(pool.get_ref(), employee_id, date, status).await? {
        Recorded::Created(record) => Ok(HttpResponse::Created().json(record)),
        Recorded::Updated(record) => Ok(HttpResponse::Ok().json(record)),
    }
}

/// Delete an attendance record
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(
        ("id" = i64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Deleted", body = Object, example = json!({
            "message": "Attendance record deleted"
        })),
        (status = 404, description = "Attendance record not found", body = Object, example = json!({
            "error": "Attendance record not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let record_id = path.into_inner();

    let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
        .bind(record_id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Attendance record not found"));
    }

    info!(record_id, "Attendance deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Attendance record deleted" })))
}
