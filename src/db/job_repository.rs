use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::{Pool, Postgres, QueryBuilder};
use std::fmt;
use tracing::debug;

use crate::api::job::models::{JobUpdate, NewJob};
use crate::db::models::{CompanySummary, Job, JobDetail, JobFilter, JobSummary};

/// Errors surfaced by a job store
#[derive(Debug)]
pub enum StoreError {
    /// The row was rejected by a table constraint (foreign key, unique, check, not null)
    Constraint(String),

    /// Any other database failure
    Database(sqlx::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Constraint(msg) => write!(f, "Constraint violation: {}", msg),
            StoreError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    return StoreError::Constraint(db_err.message().to_string());
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

/// Persistence operations for jobs
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a job and return the stored row
    async fn create(&self, job: &NewJob) -> Result<Job, StoreError>;

    /// List jobs matching `filter`, ordered by id
    async fn find_all(&self, filter: &JobFilter) -> Result<Vec<JobSummary>, StoreError>;

    /// Fetch one job with its company, `None` if the id is unknown
    async fn get(&self, id: i32) -> Result<Option<JobDetail>, StoreError>;

    /// Overwrite title, salary and equity. `None` if the id is unknown
    async fn update(&self, id: i32, changes: &JobUpdate) -> Result<Option<Job>, StoreError>;

    /// Delete a job. Deleting an unknown id is not an error
    async fn delete(&self, id: i32) -> Result<(), StoreError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

/// Escape LIKE wildcards so user input only ever matches literally
fn like_pattern(title: &str) -> String {
    let mut pattern = String::with_capacity(title.len() + 2);
    pattern.push('%');
    for c in title.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Build the listing query for a filter. All values are bound parameters.
pub fn list_query(filter: &JobFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT title, salary, equity, company_handle FROM jobs");

    match filter {
        JobFilter::All => {}
        JobFilter::MinSalary(min) => {
            query.push(" WHERE salary >= ").push_bind(*min);
        }
        JobFilter::HasEquity => {
            query.push(" WHERE equity > 0");
        }
        JobFilter::TitleLike(title) => {
            query.push(" WHERE title ILIKE ").push_bind(like_pattern(title));
        }
    }

    query.push(" ORDER BY id");
    query
}

/// Postgres-backed job repository
#[derive(Clone)]
pub struct PgJobRepository {
    pool: Pool<Postgres>,
}

impl PgJobRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn create(&self, job: &NewJob) -> Result<Job, StoreError> {
        debug!(
            "Creating job: title={}, company_handle={}",
            job.title, job.company_handle
        );

        let row = sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs (title, salary, equity, company_handle)
            VALUES ($1, $2, $3, $4)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(&job.title)
        .bind(job.salary)
        .bind(job.equity)
        .bind(&job.company_handle)
        .fetch_one(&self.pool)
        .await?;

        debug!("Job created with id={}", row.id);
        Ok(row)
    }

    async fn find_all(&self, filter: &JobFilter) -> Result<Vec<JobSummary>, StoreError> {
        let mut query = list_query(filter);
        debug!("Listing jobs: filter={:?}, sql={}", filter, query.sql());

        let rows = query
            .build_query_as::<JobSummary>()
            .fetch_all(&self.pool)
            .await?;

        debug!("Listed {} jobs", rows.len());
        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<Option<JobDetail>, StoreError> {
        debug!("Fetching job id={}", id);

        // Both reads share one snapshot so the company matches the job row
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(job) = job else {
            tx.commit().await?;
            debug!("Job id={} not found", id);
            return Ok(None);
        };

        let company = sqlx::query_as::<_, CompanySummary>(
            r#"
            SELECT handle, name, description, num_employees, logo_url
            FROM companies
            WHERE handle = $1
            "#,
        )
        .bind(&job.company_handle)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        if company.is_none() {
            debug!(
                "Company {} for job id={} not found",
                job.company_handle, id
            );
        }

        Ok(Some(JobDetail { job, company }))
    }

    async fn update(&self, id: i32, changes: &JobUpdate) -> Result<Option<Job>, StoreError> {
        debug!("Updating job id={}: title={}", id, changes.title);

        let row = sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET title = $1, salary = $2, equity = $3
            WHERE id = $4
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(&changes.title)
        .bind(changes.salary)
        .bind(changes.equity)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        debug!("Update of job id={} matched={}", id, row.is_some());
        Ok(row)
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(
            "Delete of job id={} removed {} rows",
            id,
            result.rows_affected()
        );
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
