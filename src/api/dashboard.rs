use crate::{
    error::ApiResult,
    model::{
        attendance::AttendanceStatus,
        dashboard::{DashboardStats, DepartmentCount, TopPresentEmployee},
    },
};
use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use sqlx::PgPool;
use tracing::debug;

const TOP_PRESENT_LIMIT: i64 = 5;

/// Recomputes every figure from the store. All reads share one snapshot, so
/// the department counts always add up to `total_employees`.
pub async fn compute_stats(pool: &PgPool, today: NaiveDate) -> Result<DashboardStats, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let total_employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(&mut *tx)
        .await?;

    let total_departments =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT department) FROM employees")
            .fetch_one(&mut *tx)
            .await?;

    let total_attendance_records = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance")
        .fetch_one(&mut *tx)
        .await?;

    let (present_today, absent_today) = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE status = $2),
            COUNT(*) FILTER (WHERE status = $3)
        FROM attendance
        WHERE date = $1
        "#,
    )
    .bind(today)
    .bind(AttendanceStatus::Present.as_ref())
    .bind(AttendanceStatus::Absent.as_ref())
    .fetch_one(&mut *tx)
    .await?;

    let departments = sqlx::query_as::<_, DepartmentCount>(
        r#"
        SELECT department AS name, COUNT(*) AS count
        FROM employees
        GROUP BY department
        ORDER BY department
        "#,
    )
    .fetch_all(&mut *tx)
    .await?;

    let top_present_employees = sqlx::query_as::<_, TopPresentEmployee>(
        r#"
        SELECT e.full_name AS name, e.department, COUNT(a.id) AS present_days
        FROM employees e
        JOIN attendance a ON a.employee_id = e.id
        WHERE a.status = $1
        GROUP BY e.id, e.full_name, e.department
        ORDER BY present_days DESC, e.id ASC
        LIMIT $2
        "#,
    )
    .bind(AttendanceStatus::Present.as_ref())
    .bind(TOP_PRESENT_LIMIT)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(DashboardStats {
        total_employees,
        total_departments,
        total_attendance_records,
        present_today,
        absent_today,
        departments,
        top_present_employees,
    })
}

/// Dashboard statistics
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Aggregate statistics", body = DashboardStats)
    ),
    tag = "Dashboard"
)]
pub async fn get_dashboard(pool: web::Data<PgPool>) -> ApiResult<HttpResponse> {
    // "today" is the server's local calendar date
    let today = Local::now().date_naive();
    let stats = compute_stats(pool.get_ref(), today).await?;
    debug!(%today, total_employees = stats.total_employees, "Dashboard computed");
    Ok(HttpResponse::Ok().json(stats))
}
