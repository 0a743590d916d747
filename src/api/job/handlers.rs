use actix_web::{
    HttpResponse, delete, get, patch, post,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use actix_web_validator::Json;
use tracing::info;

use crate::api::auth::AuthenticatedUser;
use super::dto::{JobResponse, JobsResponse, MessageResponse};
use super::models::{JobQuery, JobUpdate, NewJob};
use super::service::{JobService, ServiceError};

/// POST /jobs { job } => 201 { job }, where job carries its new `id`
///
/// Authorization required: login
#[post("")]
async fn create_job(
    user: AuthenticatedUser,
    service: Data<JobService>,
    body: Json<NewJob>,
) -> Result<HttpResponse, ServiceError> {
    info!("POST /jobs by {}", user.claims.username);
    let job = service.create_job(&body).await?;
    Ok(HttpResponse::Created().json(JobResponse { job }))
}

/// GET /jobs[?minSalary=N|hasEquity=1|title=substring] => { jobs }
#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    query: Query<JobQuery>,
) -> Result<HttpResponse, ServiceError> {
    let jobs = service.find_all(&query).await?;
    Ok(HttpResponse::Ok().json(JobsResponse { jobs }))
}

/// GET /jobs/{id} => { job } with the company embedded
#[get("/{id}")]
async fn get_job(
    service: Data<JobService>,
    id: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.get_job(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JobResponse { job }))
}

/// PATCH /jobs/{id} { title, salary, equity } => job, or null if no such job
///
/// Authorization required: login
#[patch("/{id}")]
async fn update_job(
    user: AuthenticatedUser,
    service: Data<JobService>,
    id: Path<i32>,
    body: Json<JobUpdate>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    info!("PATCH /jobs/{} by {}", id, user.claims.username);
    let job = service.update_job(id, &body).await?;
    Ok(HttpResponse::Ok().json(job))
}

/// DELETE /jobs/{id} => { msg }
///
/// Authorization required: login
#[delete("/{id}")]
async fn delete_job(
    user: AuthenticatedUser,
    service: Data<JobService>,
    id: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    info!("DELETE /jobs/{} by {}", id, user.claims.username);
    service.delete_job(id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        msg: "Job removed.".to_string(),
    }))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/jobs")
            .service(create_job)
            .service(list_jobs)
            .service(get_job)
            .service(update_job)
            .service(delete_job),
    );
}
