use crate::api::attendance::{AttendanceFilter, RecordAttendance};
use crate::api::employee::CreateEmployee;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::dashboard::{DashboardStats, DepartmentCount, TopPresentEmployee};
use crate::model::employee::Employee;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS API",
        version = "1.0.0",
        description = r#"
## Employee & Attendance Records

- **Employees**: register, list, inspect and remove employees.
  Removing an employee removes its attendance history.
- **Attendance**: one Present/Absent mark per employee per day.
  Marking the same day again overwrites the status.
- **Dashboard**: head counts, today's attendance, per-department totals
  and the five most present employees.

Errors are returned as `{"error": "..."}`.
"#,
    ),
    paths(
        crate::api::health::health,

        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::list_attendance,
        crate::api::attendance::record_attendance,
        crate::api::attendance::delete_attendance,

        crate::api::dashboard::get_dashboard
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            AttendanceRecord,
            AttendanceStatus,
            AttendanceFilter,
            RecordAttendance,
            DashboardStats,
            DepartmentCount,
            TopPresentEmployee
        )
    ),
    tags(
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Attendance", description = "Daily attendance APIs"),
        (name = "Dashboard", description = "Aggregate statistics"),
        (name = "Health", description = "Service status"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/health",
            "/api/employees",
            "/api/employees/{id}",
            "/api/attendance",
            "/api/attendance/{id}",
            "/api/dashboard",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "{expected} missing");
        }
    }
}
