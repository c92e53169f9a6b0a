//! Registrations repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{BadgeNumber, Registration, RegistrationQuery, RegistrationRow},
    services::badges::BadgeLedger,
};

const COLUMNS: &str = r#"
    id, full_name, email, phone, photo_url, participation_mode, location_type,
    accommodation_type, arrival_date, departure_date, nationality, is_member,
    branch, church_unit, badge_number, badge_url, badge_generated_at,
    badge_regenerated_at, created_at
"#;

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct RegistrationsRepository {
    pool: Pool<Postgres>,
}

impl RegistrationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Every registration, oldest first
    pub async fn list_all(&self) -> AppResult<Vec<Registration>> {
        let query = format!("SELECT {} FROM registrations ORDER BY created_at, id", COLUMNS);
        let rows = sqlx::query_as::<_, RegistrationRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Registration::from).collect())
    }

    /// Search registrations by name or email with pagination
    pub async fn search(&self, query: &RegistrationQuery) -> AppResult<(Vec<Registration>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 200);
        let offset = (page - 1) * per_page;

        let mut params: Vec<String> = Vec::new();
        let mut conditions = Vec::new();

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(format!("%{}%", search));
            conditions.push(format!(
                "(full_name ILIKE ${} OR email ILIKE ${})",
                params.len(),
                params.len()
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM registrations {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            r#"
            SELECT {} FROM registrations {}
            ORDER BY created_at DESC, id
            LIMIT {} OFFSET {}
            "#,
            COLUMNS, where_clause, per_page, offset
        );
        let mut select_builder = sqlx::query_as::<_, RegistrationRow>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let rows = select_builder.fetch_all(&self.pool).await?;

        Ok((rows.into_iter().map(Registration::from).collect(), total))
    }

    /// Get a registration by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Registration> {
        let query = format!("SELECT {} FROM registrations WHERE id = $1", COLUMNS);
        let row = sqlx::query_as::<_, RegistrationRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Registration {} not found", id)))?;
        Ok(row.into())
    }

    /// Highest sequence already issued or claimed under `prefix`
    pub async fn max_badge_sequence(&self, prefix: &str) -> AppResult<Option<u32>> {
        // Sequences may outgrow four digits, so compare numerically after parsing
        let numbers: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT badge_number FROM registrations WHERE badge_number LIKE $1
            UNION
            SELECT badge_number FROM badge_number_claims WHERE badge_number LIKE $1
            "#,
        )
        .bind(format!("{}-%", prefix))
        .fetch_all(&self.pool)
        .await?;

        Ok(numbers
            .iter()
            .filter_map(|n| BadgeNumber::parse(n))
            .filter(|n| n.prefix == prefix)
            .map(|n| n.sequence)
            .max())
    }

    /// Reserve `number` for registration `id`. Returns `false` if another
    /// writer got there first.
    pub async fn claim_badge_number(&self, id: Uuid, number: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO badge_number_claims (badge_number, registration_id)
            SELECT $1, $2
            WHERE NOT EXISTS (SELECT 1 FROM registrations WHERE badge_number = $1)
            ON CONFLICT (badge_number) DO NOTHING
            "#,
        )
        .bind(number)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Store a newly issued badge; fails if the registration already has one
    pub async fn record_new_badge(
        &self,
        id: Uuid,
        number: &str,
        url: &str,
        at: DateTime<Utc>,
    ) -> AppResult<Registration> {
        let query = format!(
            r#"
            UPDATE registrations
            SET badge_number = $2, badge_url = $3, badge_generated_at = $4
            WHERE id = $1 AND badge_number IS NULL
            RETURNING {}
            "#,
            COLUMNS
        );
        let row = sqlx::query_as::<_, RegistrationRow>(&query)
            .bind(id)
            .bind(number)
            .bind(url)
            .bind(at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unique_to_conflict(e, number))?
            .ok_or_else(|| {
                AppError::Conflict(format!("Registration {} already has a badge", id))
            })?;
        Ok(row.into())
    }

    /// Point an existing badge at a freshly rendered image
    pub async fn record_regenerated_badge(
        &self,
        id: Uuid,
        number: &str,
        url: &str,
        at: DateTime<Utc>,
    ) -> AppResult<Registration> {
        let query = format!(
            r#"
            UPDATE registrations
            SET badge_url = $3, badge_regenerated_at = $4
            WHERE id = $1 AND badge_number = $2
            RETURNING {}
            "#,
            COLUMNS
        );
        let row = sqlx::query_as::<_, RegistrationRow>(&query)
            .bind(id)
            .bind(number)
            .bind(url)
            .bind(at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!(
                    "Badge {} no longer belongs to registration {}",
                    number, id
                ))
            })?;
        Ok(row.into())
    }
}

fn unique_to_conflict(err: sqlx::Error, number: &str) -> AppError {
    let is_unique = err
        .as_database_error()
        .and_then(|db| db.code())
        .map_or(false, |code| code == UNIQUE_VIOLATION);
    if is_unique {
        AppError::Conflict(format!("Badge number {} is already issued", number))
    } else {
        AppError::Database(err)
    }
}

#[async_trait]
impl BadgeLedger for RegistrationsRepository {
    async fn registration(&self, id: Uuid) -> AppResult<Registration> {
        self.get_by_id(id).await
    }

    async fn last_sequence(&self, prefix: &str) -> AppResult<Option<u32>> {
        self.max_badge_sequence(prefix).await
    }

    async fn claim_number(&self, id: Uuid, number: &str) -> AppResult<bool> {
        self.claim_badge_number(id, number).await
    }

    async fn record_badge(
        &self,
        id: Uuid,
        number: &str,
        url: &str,
        at: DateTime<Utc>,
        regenerated: bool,
    ) -> AppResult<Registration> {
        if regenerated {
            self.record_regenerated_badge(id, number, url, at).await
        } else {
            self.record_new_badge(id, number, url, at).await
        }
    }
}
