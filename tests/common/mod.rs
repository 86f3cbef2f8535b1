//! Common test utilities
//!
//! Integration tests run against a real MySQL database named by
//! TEST_DATABASE_URL and skip silently when it is not reachable.

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

/// Connect to the integration test database.
///
/// Returns an error when TEST_DATABASE_URL is unset or unreachable; the
/// caller is expected to skip the test in that case.
pub async fn get_test_pool() -> Result<MySqlPool, Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let url = std::env::var("TEST_DATABASE_URL")?;

    let pool = MySqlPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    Ok(pool)
}

/// Create the schema used by the integration tests
pub async fn setup_database(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id CHAR(36) NOT NULL PRIMARY KEY,
            email VARCHAR(255) NOT NULL,
            name VARCHAR(255) NULL,
            role VARCHAR(32) NOT NULL DEFAULT 'user',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            UNIQUE KEY uq_users_email (email)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS organizations (
            id CHAR(36) NOT NULL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            slug VARCHAR(255) NOT NULL,
            owner_id CHAR(36) NOT NULL,
            email VARCHAR(255) NULL,
            industry VARCHAR(255) NULL,
            country VARCHAR(255) NULL,
            address VARCHAR(255) NULL,
            state VARCHAR(255) NULL,
            description TEXT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            UNIQUE KEY uq_organizations_slug (slug)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS memberships (
            user_id CHAR(36) NOT NULL,
            organization_id CHAR(36) NOT NULL,
            role VARCHAR(32) NOT NULL DEFAULT 'member',
            joined_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (user_id, organization_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS invitations (
            id CHAR(36) NOT NULL PRIMARY KEY,
            organization_id CHAR(36) NOT NULL,
            invited_by CHAR(36) NOT NULL,
            token VARCHAR(64) NOT NULL,
            email VARCHAR(255) NULL,
            is_generic BOOLEAN NOT NULL DEFAULT FALSE,
            expires_at TIMESTAMP NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            UNIQUE KEY uq_invitations_token (token)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove all rows between tests
pub async fn cleanup_database(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM invitations").execute(pool).await?;
    sqlx::query("DELETE FROM memberships").execute(pool).await?;
    sqlx::query("DELETE FROM organizations").execute(pool).await?;
    sqlx::query("DELETE FROM users").execute(pool).await?;
    Ok(())
}
