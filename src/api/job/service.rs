use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::validation::ErrorResponse;
use crate::db::job_repository::{JobRepository, StoreError};
use crate::db::models::{Job, JobDetail, JobSummary};
use super::models::{JobQuery, JobUpdate, NewJob};

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed
    DatabaseError(sqlx::Error),

    /// Input rejected, either by validation or by a table constraint
    BadRequest(String),

    /// Job not found
    NotFound(i32),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ServiceError::BadRequest(msg) => write!(f, "{}", msg),
            ServiceError::NotFound(id) => write!(f, "Job with id: {} not found.", id),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Constraint(msg) => ServiceError::BadRequest(msg),
            StoreError::Database(e) => ServiceError::DatabaseError(e),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::DatabaseError(e) => {
                error!("Database error: {}", e);
                // Driver details stay in the logs
                ErrorResponse::new(self.status_code(), "Database error occurred").into_response()
            }
            ServiceError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                ErrorResponse::new(self.status_code(), msg.clone()).into_response()
            }
            ServiceError::NotFound(id) => {
                warn!("Job not found: {}", id);
                ErrorResponse::new(self.status_code(), self.to_string()).into_response()
            }
        }
    }
}

/// Job service containing business logic
pub struct JobService {
    repo: Arc<dyn JobRepository>,
}

impl JobService {
    /// Create a new JobService on top of a job store
    pub fn new(repo: Arc<dyn JobRepository>) -> Self {
        Self { repo }
    }

    /// Create a single job
    ///
    /// No duplicate check is made, the same title may be posted twice for one
    /// company. An unknown company handle is rejected by the store.
    pub async fn create_job(&self, job: &NewJob) -> Result<Job, ServiceError> {
        info!(
            "Service: Creating job title={} company={}",
            job.title, job.company_handle
        );

        let row = self.repo.create(job).await?;

        info!("Service: Job created successfully with id={}", row.id);
        Ok(row)
    }

    /// List jobs, applying at most one filter from the query
    pub async fn find_all(&self, query: &JobQuery) -> Result<Vec<JobSummary>, ServiceError> {
        let filter = query.filter()?;
        info!("Service: Listing jobs with filter={:?}", filter);

        let jobs = self.repo.find_all(&filter).await?;

        info!("Service: Found {} jobs", jobs.len());
        Ok(jobs)
    }

    /// Fetch a job with its company
    ///
    /// # Returns
    /// - `Ok(JobDetail)` - Job found, `company` is `None` if its row is gone
    /// - `Err(ServiceError::NotFound)` - No job with this id
    pub async fn get_job(&self, id: i32) -> Result<JobDetail, ServiceError> {
        info!("Service: Fetching job id={}", id);

        self.repo.get(id).await?.ok_or(ServiceError::NotFound(id))
    }

    /// Replace title, salary and equity of a job
    ///
    /// Returns `Ok(None)` when no job has this id.
    pub async fn update_job(
        &self,
        id: i32,
        changes: &JobUpdate,
    ) -> Result<Option<Job>, ServiceError> {
        info!("Service: Updating job id={}", id);

        let row = self.repo.update(id, changes).await?;
        if row.is_none() {
            warn!("Service: Update matched no job with id={}", id);
        }
        Ok(row)
    }

    /// Delete a job, succeeding whether or not it existed
    pub async fn delete_job(&self, id: i32) -> Result<(), ServiceError> {
        info!("Service: Deleting job id={}", id);

        self.repo.delete(id).await?;
        Ok(())
    }
}
