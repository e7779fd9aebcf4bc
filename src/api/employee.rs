use crate::{
    api::attendance::RECORD_COLUMNS,
    db::{EMPLOYEE_CODE_CONSTRAINT, EMPLOYEE_EMAIL_CONSTRAINT, unique_violation},
    error::{ApiError, ApiResult},
    model::{attendance::AttendanceRecord, employee::Employee},
    utils::validation::{is_valid_email, require_fields},
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, warn};
use utoipa::ToSchema;

const EMPLOYEE_COLUMNS: &str = "id, employee_id, full_name, email, department, created_at";

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "E1")]
    pub employee_id: Option<String>,
    #[schema(example = "Ann Lee")]
    pub full_name: Option<String>,
    #[schema(example = "Ann@X.com", format = "email")]
    pub email: Option<String>,
    #[schema(example = "Eng")]
    pub department: Option<String>,
}

impl CreateEmployee {
    /// `{}` carries nothing to create.
    fn is_empty(&self) -> bool {
        self.employee_id.is_none()
            && self.full_name.is_none()
            && self.email.is_none()
            && self.department.is_none()
    }
}

fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default().trim()
}

fn duplicate_code(code: &str) -> ApiError {
    ApiError::Conflict(format!("Employee ID '{code}' already exists"))
}

fn duplicate_email(email: &str) -> ApiError {
    ApiError::Conflict(format!("Email '{email}' is already registered"))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Missing or invalid field", body = Object, example = json!({
            "error": "Missing required fields: full_name"
        })),
        (status = 409, description = "Employee ID or email already taken", body = Object, example = json!({
            "error": "Employee ID 'E1' already exists"
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<PgPool>,
    payload: web::Json<CreateEmployee>,
) -> ApiResult<HttpResponse> {
    if payload.is_empty() {
        return Err(ApiError::validation("Request body is required"));
    }

    require_fields(&[
        ("employee_id", payload.employee_id.as_deref()),
        ("full_name", payload.full_name.as_deref()),
        ("email", payload.email.as_deref()),
        ("department", payload.department.as_deref()),
    ])?;

    let code = trimmed(&payload.employee_id);
    let email = trimmed(&payload.email);
    if !is_valid_email(email) {
        return Err(ApiError::validation("Invalid email address format"));
    }
    let email = email.to_lowercase();

    let mut tx = pool.begin().await?;

    let code_taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM employees WHERE employee_id = $1)",
    )
    .bind(code)
    .fetch_one(&mut *tx)
    .await?;
    if code_taken {
        return Err(duplicate_code(code));
    }

    let email_taken =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM employees WHERE email = $1)")
            .bind(&email)
            .fetch_one(&mut *tx)
            .await?;
    if email_taken {
        return Err(duplicate_email(&email));
    }

    let sql = format!(
        r#"
        INSERT INTO employees (employee_id, full_name, email, department)
        VALUES ($1, $2, $3, $4)
        RETURNING {EMPLOYEE_COLUMNS}
        "#
    );
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(code)
        .bind(trimmed(&payload.full_name))
        .bind(&email)
        .bind(trimmed(&payload.department))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // A concurrent insert can still win the race past the checks above.
            let constraint = unique_violation(&e).map(str::to_owned);
            match constraint.as_deref() {
                Some(EMPLOYEE_CODE_CONSTRAINT) => duplicate_code(code),
                Some(EMPLOYEE_EMAIL_CONSTRAINT) => duplicate_email(&email),
                _ => ApiError::from(e),
            }
        })?;

    tx.commit().await?;

    info!(id = employee.id, employee_id = %employee.employee_id, "Employee created");
    Ok(HttpResponse::Created().json(employee))
}

/// List Employees, newest first
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees", body = [Employee])
    ),
    tag = "Employee"
)]
pub async fn list_employees(pool: web::Data<PgPool>) -> ApiResult<HttpResponse> {
    let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY created_at DESC, id DESC");

    let employees = sqlx::query_as::<_, Employee>(&sql)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID, with its attendance history
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id" = i64, Path, description = "Internal employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1");
    let mut employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    let sql = format!(
        r#"
        SELECT {RECORD_COLUMNS}
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        WHERE a.employee_id = $1
        ORDER BY a.date DESC, a.id DESC
        "#
    );
    let attendances = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(id)
        .fetch_all(pool.get_ref())
        .await?;

    employee.attendances = Some(attendances);
    Ok(HttpResponse::Ok().json(employee))
}

/// Delete Employee together with its attendance records
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id" = i64, Path, description = "Internal employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Employee 'Ann Lee' deleted successfully"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    let mut tx = pool.begin().await?;

    // attendance rows go with it (ON DELETE CASCADE)
    let full_name = sqlx::query_scalar::<_, String>(
        "DELETE FROM employees WHERE id = $1 RETURNING full_name",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(full_name) = full_name else {
        warn!(id, "Delete of unknown employee");
        return Err(ApiError::not_found("Employee not found"));
    };

    tx.commit().await?;

    info!(id, "Employee deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Employee '{full_name}' deleted successfully")
    })))
}
