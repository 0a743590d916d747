use serde::Serialize;

use crate::db::models::JobSummary;

/// Single job wrapped as `{"job": ...}`
#[derive(Serialize)]
pub struct JobResponse<T: Serialize> {
    pub job: T,
}

/// Job listing wrapped as `{"jobs": [...]}`
#[derive(Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobSummary>,
}

/// Plain acknowledgement, e.g. after a delete
#[derive(Serialize)]
pub struct MessageResponse {
    pub msg: String,
}
