use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct DepartmentCount {
    #[schema(example = "Eng")]
    pub name: String,
    #[schema(example = 4)]
    pub count: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct TopPresentEmployee {
    #[schema(example = "Ann Lee")]
    pub name: String,
    #[schema(example = "Eng")]
    pub department: String,
    #[schema(example = 21)]
    pub present_days: i64,
}

/// Summary recomputed from the store on every request.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_employees: i64,
    pub total_departments: i64,
    pub total_attendance_records: i64,
    pub present_today: i64,
    pub absent_today: i64,
    pub departments: Vec<DepartmentCount>,
    /// At most five entries, most present first
    pub top_present_employees: Vec<TopPresentEmployee>,
}
