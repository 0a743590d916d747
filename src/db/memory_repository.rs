use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::api::job::models::{JobUpdate, NewJob};
use crate::db::job_repository::{JobRepository, StoreError};
use crate::db::models::{CompanySummary, Job, JobDetail, JobFilter, JobSummary};

/// Same predicates as the SQL built by `list_query`
fn matches(filter: &JobFilter, job: &Job) -> bool {
    match filter {
        JobFilter::All => true,
        JobFilter::MinSalary(min) => job.salary.is_some_and(|s| s >= *min),
        JobFilter::HasEquity => job.equity.is_some_and(|e| e > Decimal::ZERO),
        JobFilter::TitleLike(needle) => job
            .title
            .to_lowercase()
            .contains(&needle.to_lowercase()),
    }
}

#[derive(Default)]
struct MemoryState {
    next_id: i32,
    jobs: BTreeMap<i32, Job>,
    companies: HashMap<String, CompanySummary>,
}

/// In-memory job store with the same semantics as the Postgres one
#[derive(Default)]
pub struct MemoryJobRepository {
    state: Mutex<MemoryState>,
}

impl MemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company(self, handle: &str, name: &str) -> Self {
        self.state.lock().unwrap().companies.insert(
            handle.to_string(),
            CompanySummary {
                handle: handle.to_string(),
                name: name.to_string(),
                description: format!("{} description", name),
                num_employees: Some(10),
                logo_url: None,
            },
        );
        self
    }

    /// Drop a company row without touching its jobs
    pub fn remove_company(&self, handle: &str) {
        self.state.lock().unwrap().companies.remove(handle);
    }
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn create(&self, job: &NewJob) -> Result<Job, StoreError> {
        let mut state = self.state.lock().unwrap();
        if !state.companies.contains_key(&job.company_handle) {
            return Err(StoreError::Constraint(format!(
                "insert or update on table \"jobs\" violates foreign key constraint \"jobs_company_handle_fkey\": {}",
                job.company_handle
            )));
        }

        state.next_id += 1;
        let row = Job {
            id: state.next_id,
            title: job.title.clone(),
            salary: job.salary,
            equity: job.equity,
            company_handle: job.company_handle.clone(),
        };
        state.jobs.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_all(&self, filter: &JobFilter) -> Result<Vec<JobSummary>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .jobs
            .values()
            .filter(|job| matches(filter, job))
            .map(JobSummary::from)
            .collect())
    }

    async fn get(&self, id: i32) -> Result<Option<JobDetail>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.jobs.get(&id).map(|job| JobDetail {
            job: job.clone(),
            company: state.companies.get(&job.company_handle).cloned(),
        }))
    }

    async fn update(&self, id: i32, changes: &JobUpdate) -> Result<Option<Job>, StoreError> {
        let mut state = self.state.lock().unwrap();
        Ok(state.jobs.get_mut(&id).map(|job| {
            job.title = changes.title.clone();
            job.salary = changes.salary;
            job.equity = changes.equity;
            job.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        self.state.lock().unwrap().jobs.remove(&id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn job(title: &str, salary: Option<i32>, equity: Option<&str>) -> Job {
        Job {
            id: 1,
            title: title.to_string(),
            salary,
            equity: equity.map(|e| Decimal::from_str(e).unwrap()),
            company_handle: "acme".to_string(),
        }
    }

    #[test]
    fn min_salary_is_inclusive_and_skips_null() {
        let filter = JobFilter::MinSalary(50000);
        assert!(matches(&filter, &job("a", Some(50000), None)));
        assert!(!matches(&filter, &job("a", Some(49999), None)));
        assert!(!matches(&filter, &job("a", None, None)));
    }

    #[test]
    fn has_equity_requires_positive_equity() {
        let filter = JobFilter::HasEquity;
        assert!(matches(&filter, &job("a", None, Some("0.01"))));
        assert!(!matches(&filter, &job("a", None, Some("0"))));
        assert!(!matches(&filter, &job("a", None, None)));
    }

    #[test]
    fn title_like_ignores_case() {
        let filter = JobFilter::TitleLike("DEV".to_string());
        assert!(matches(&filter, &job("Web Developer", None, None)));
        assert!(!matches(&filter, &job("Designer", None, None)));
    }
}
