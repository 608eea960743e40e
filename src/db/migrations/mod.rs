use anyhow::Result;
use sqlx::{Executor, PgPool};
use tracing::{info, warn};

// Embedded so the binary carries its own schema
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_initial_schema.sql",
        include_str!("sql/001_initial_schema.sql"),
    ),
    (
        "002_add_indexes.sql",
        include_str!("sql/002_add_indexes.sql"),
    ),
];

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    for (name, sql) in MIGRATIONS {
        pool.execute(*sql).await?;
        info!("Applied migration: {}", name);
    }

    create_default_admin(pool).await?;

    Ok(())
}

/// Create default admin user if no users exist
async fn create_default_admin(pool: &PgPool) -> Result<()> {
    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if user_count == 0 {
        let password_hash = bcrypt::hash("admin123", 10)?;
        let id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, password_hash, is_active, is_admin, created_at, updated_at)
            VALUES ($1, $2, $3, $4, TRUE, TRUE, $5, $5)
            "#,
        )
        .bind(id)
        .bind("admin@codance.com")
        .bind("admin")
        .bind(password_hash)
        .bind(now)
        .execute(pool)
        .await?;

        warn!("Default admin user created, change its password immediately!");
    }

    Ok(())
}
