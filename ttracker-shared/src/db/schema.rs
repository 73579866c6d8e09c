/// Schema bootstrap
///
/// Creates the enum types and tables the PostgreSQL adapter expects, if they
/// are missing. Every statement is idempotent, so this runs on every startup.
/// Existing tables are never altered.
///
/// # Example
///
/// ```no_run
/// use ttracker_shared::db::schema::ensure_schema;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// ensure_schema(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use tracing::{debug, info};

/// DDL statements, in dependency order
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    DO $$ BEGIN
        CREATE TYPE project_priority AS ENUM ('High', 'Medium', 'Low');
    EXCEPTION
        WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    DO $$ BEGIN
        CREATE TYPE task_status AS ENUM ('Pending', 'InProgress', 'Done');
    EXCEPTION
        WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
        cognito_id VARCHAR(255) NOT NULL UNIQUE,
        username VARCHAR(255),
        email VARCHAR(255),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
        user_id INTEGER NOT NULL REFERENCES users(id),
        title VARCHAR(255) NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        priority project_priority NOT NULL DEFAULT 'Low',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
        project_id INTEGER NOT NULL REFERENCES projects(id),
        title VARCHAR(255) NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        status task_status NOT NULL DEFAULT 'Pending',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
        name VARCHAR(255) NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        admin_id INTEGER NOT NULL REFERENCES users(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_projects_user_id ON projects(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id)",
];

/// Advisory lock key held while the schema is bootstrapped
pub const SCHEMA_LOCK_KEY: i64 = 0x7474_7261_636b_6572;

/// Creates any missing types, tables and indexes in one transaction
///
/// Concurrent callers are serialized on [`SCHEMA_LOCK_KEY`]; the lock is
/// released when the transaction ends.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Ensuring database schema");

    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    debug!(statements = SCHEMA_STATEMENTS.len(), "Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_created_after_their_references() {
        let position = |needle: &str| {
            SCHEMA_STATEMENTS
                .iter()
                .position(|s| s.contains(needle))
                .unwrap()
        };

        assert!(position("TYPE project_priority") < position("TABLE IF NOT EXISTS projects"));
        assert!(position("TYPE task_status") < position("TABLE IF NOT EXISTS tasks"));
        assert!(position("TABLE IF NOT EXISTS users") < position("TABLE IF NOT EXISTS projects"));
        assert!(position("TABLE IF NOT EXISTS projects") < position("TABLE IF NOT EXISTS tasks"));
        assert!(position("TABLE IF NOT EXISTS users") < position("TABLE IF NOT EXISTS teams"));
    }
}
