use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

/// Minimal schema bootstrap. Dates are ISO-8601 text so range filters compare
/// lexicographically; list-valued fields are JSON text.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS a001_order (
        id TEXT PRIMARY KEY NOT NULL,
        client_id TEXT NOT NULL,
        client_name TEXT,
        date TEXT NOT NULL,
        total REAL NOT NULL DEFAULT 0,
        status TEXT NOT NULL,
        is_credit INTEGER NOT NULL DEFAULT 0,
        remaining_debt REAL,
        items_json TEXT NOT NULL DEFAULT '[]',
        discount REAL,
        tax REAL,
        notes TEXT
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_a001_order_date ON a001_order (date);",
    r#"
    CREATE TABLE IF NOT EXISTS a002_client (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        address TEXT NOT NULL DEFAULT '',
        phone TEXT NOT NULL DEFAULT '',
        price REAL NOT NULL DEFAULT 0,
        has_credit INTEGER NOT NULL DEFAULT 0,
        routes_json TEXT NOT NULL DEFAULT '[]',
        total_debt REAL NOT NULL DEFAULT 0
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS a003_staff (
        id TEXT PRIMARY KEY NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL DEFAULT '',
        position TEXT NOT NULL DEFAULT '',
        salary REAL NOT NULL DEFAULT 0,
        is_active INTEGER NOT NULL DEFAULT 1,
        loans_json TEXT NOT NULL DEFAULT '[]'
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS a004_attendance (
        id TEXT PRIMARY KEY NOT NULL,
        staff_id TEXT NOT NULL,
        staff_name TEXT,
        date TEXT NOT NULL,
        check_in TEXT NOT NULL,
        check_out TEXT
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_a004_attendance_date ON a004_attendance (date);",
];

/// Open (creating if needed) the SQLite database file and bootstrap the schema
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database at {}", absolute_path.display());
    open(&db_url).await
}

/// Connect to `url` and bootstrap the schema. An in-memory database is pinned
/// to a single pooled connection so every query sees the same tables.
pub async fn open(url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(url.to_string());
    options.sqlx_logging(false);
    if url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options).await?;
    bootstrap_schema(&conn).await?;
    Ok(conn)
}

pub async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for sql in SCHEMA {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    tracing::debug!("Schema bootstrap complete ({} statements)", SCHEMA.len());
    Ok(())
}

/// Text form of local timestamps stored in the database
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Text form of calendar dates stored in the database
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_datetime(value: &chrono::NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

pub fn parse_datetime(value: &str) -> Result<chrono::NaiveDateTime, String> {
    chrono::NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .map_err(|e| format!("Invalid timestamp '{}': {}", value, e))
}

pub fn parse_date(value: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| format!("Invalid date '{}': {}", value, e))
}
