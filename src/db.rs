use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Idempotent table bootstrap, run once at start-up.
const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id          BIGSERIAL PRIMARY KEY,
        employee_id VARCHAR(50)  NOT NULL,
        full_name   VARCHAR(150) NOT NULL,
        email       VARCHAR(200) NOT NULL,
        department  VARCHAR(100) NOT NULL,
        created_at  TIMESTAMP    NOT NULL DEFAULT (NOW() AT TIME ZONE 'utc'),
        CONSTRAINT employees_employee_id_key UNIQUE (employee_id),
        CONSTRAINT employees_email_key UNIQUE (email)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id          BIGSERIAL PRIMARY KEY,
        employee_id BIGINT      NOT NULL REFERENCES employees (id) ON DELETE CASCADE,
        date        DATE        NOT NULL,
        status      VARCHAR(10) NOT NULL CHECK (status IN ('Present', 'Absent')),
        created_at  TIMESTAMP   NOT NULL DEFAULT (NOW() AT TIME ZONE 'utc'),
        CONSTRAINT unique_employee_date UNIQUE (employee_id, date)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS attendance_date_idx ON attendance (date)
    "#,
];

const SCHEMA_LOCK_KEY: i64 = 0x4852_4d53;

pub const EMPLOYEE_CODE_CONSTRAINT: &str = "employees_employee_id_key";
pub const EMPLOYEE_EMAIL_CONSTRAINT: &str = "employees_email_key";

pub async fn init_db(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    // CREATE ... IF NOT EXISTS still races when two processes bootstrap at once
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    tx.commit().await
}

/// Name of the unique constraint a failed write tripped over, if that is why it failed.
pub fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            Some(db_err.constraint().unwrap_or_default())
        }
        _ => None,
    }
}
