use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::models::{CorpusEntry, TutorProfile, UserRef};
use crate::services::corpus::{retain_resolved, CorpusError, ProfileCorpus};
use crate::config::DatabaseSettings;

/// Table names of the external stores
#[derive(Debug, Clone)]
pub struct CorpusTables {
    pub users: String,
    pub tutors: String,
}

impl Default for CorpusTables {
    fn default() -> Self {
        Self {
            users: "user".to_string(),
            tutors: "tutor".to_string(),
        }
    }
}

/// Profile corpus backed by the PostgreSQL tutor and user tables
///
/// Read-only: the engine never writes to either table and runs no
/// migrations.
pub struct PostgresCorpus {
    pool: PgPool,
    load_query: String,
}

impl PostgresCorpus {
    /// Create a new corpus over an existing pool
    pub fn new(pool: PgPool, tables: &CorpusTables) -> Self {
        Self {
            pool,
            load_query: build_load_query(tables),
        }
    }

    /// Connect using database settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, CorpusError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections.unwrap_or(10))
            .min_connections(settings.min_connections.unwrap_or(1))
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(&settings.url)
            .await?;

        tracing::info!(
            "Connected to PostgreSQL (max: {} connections)",
            settings.max_connections.unwrap_or(10)
        );

        let tables = CorpusTables {
            users: settings.users_table.clone(),
            tutors: settings.tutors_table.clone(),
        };

        Ok(Self::new(pool, &tables))
    }
}

/// Quote an identifier for interpolation into SQL
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// One LEFT JOIN so profiles with a missing owner still come back as rows
/// and can be excluded individually.
fn build_load_query(tables: &CorpusTables) -> String {
    format!(
        r#"
            SELECT
                t.id::BIGINT AS id,
                t.user_id::BIGINT AS user_id,
                t.subject,
                t.price_per_hour::FLOAT8 AS price_per_hour,
                t.availability,
                t.whatsapp_number,
                t.location,
                t.bio,
                COALESCE(t.rating, 0)::FLOAT8 AS rating,
                COALESCE(t.total_sessions, 0)::BIGINT AS total_sessions,
                u.id::BIGINT AS owner_id,
                u.name AS owner_name
            FROM {tutors} t
            LEFT JOIN {users} u ON u.id = t.user_id
            ORDER BY t.id
        "#,
        tutors = quote_ident(&tables.tutors),
        users = quote_ident(&tables.users),
    )
}

fn decode_row(row: &PgRow) -> Result<(TutorProfile, Option<UserRef>), sqlx::Error> {
    let total_sessions: i64 = row.try_get("total_sessions")?;

    let profile = TutorProfile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        subject: row.try_get("subject")?,
        price_per_hour: row.try_get("price_per_hour")?,
        availability: row.try_get("availability")?,
        whatsapp_number: row.try_get("whatsapp_number")?,
        location: row.try_get("location")?,
        bio: row.try_get("bio")?,
        rating: row.try_get("rating")?,
        total_sessions: u32::try_from(total_sessions.max(0)).unwrap_or(u32::MAX),
    };

    let owner_id: Option<i64> = row.try_get("owner_id")?;
    let owner_name: Option<String> = row.try_get("owner_name")?;
    let owner = owner_id
        .zip(owner_name)
        .map(|(id, name)| UserRef { id, name });

    Ok((profile, owner))
}

#[async_trait]
impl ProfileCorpus for PostgresCorpus {
    async fn load_all(&self) -> Result<Vec<CorpusEntry>, CorpusError> {
        let rows = sqlx::query(&self.load_query).fetch_all(&self.pool).await?;

        let decoded = rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()?;

        let entries = retain_resolved(decoded);

        tracing::debug!("Loaded {} tutor profiles from PostgreSQL ({} rows)", entries.len(), rows.len());

        Ok(entries)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_query_uses_configured_tables() {
        let query = build_load_query(&CorpusTables {
            users: "accounts".to_string(),
            tutors: "tutor_profiles".to_string(),
        });

        assert!(query.contains("FROM \"tutor_profiles\" t"));
        assert!(query.contains("LEFT JOIN \"accounts\" u"));
    }

    #[test]
    fn test_default_tables_match_schema() {
        let tables = CorpusTables::default();
        assert_eq!(tables.users, "user");
        assert_eq!(tables.tutors, "tutor");
    }

    #[test]
    fn test_identifier_quoting() {
        assert_eq!(quote_ident("user"), "\"user\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL"]
    async fn test_load_all_against_database() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL not set");
        let pool = PgPoolOptions::new().connect(&url).await.unwrap();
        let corpus = PostgresCorpus::new(pool, &CorpusTables::default());

        assert!(corpus.health_check().await);
        assert!(corpus.load_all().await.is_ok());
    }
}
