use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::db::models::JobFilter;
use super::service::ServiceError;

/// Request body for posting a new job
#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    #[validate(range(min = 0, message = "Salary must not be negative"))]
    pub salary: Option<i32>,

    #[validate(custom(function = "validate_equity"))]
    pub equity: Option<Decimal>,

    #[validate(length(
        min = 1,
        max = 25,
        message = "Company handle must be between 1 and 25 characters"
    ))]
    pub company_handle: String,
}

/// Request body for replacing the mutable fields of a job.
///
/// Every field is written: a missing `salary` or `equity` is stored as NULL.
#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    #[validate(range(min = 0, message = "Salary must not be negative"))]
    pub salary: Option<i32>,

    #[validate(custom(function = "validate_equity"))]
    pub equity: Option<Decimal>,
}

fn validate_equity(equity: &Decimal) -> Result<(), ValidationError> {
    if *equity < Decimal::ZERO || *equity > Decimal::ONE {
        let mut err = ValidationError::new("equity_range");
        err.message = Some("Equity must be between 0 and 1".into());
        return Err(err);
    }
    Ok(())
}

/// Query string accepted by the job listing.
///
/// Values stay raw strings so that an empty `?minSalary=` or a loose
/// `?hasEquity=1` do not fail extraction; `filter` interprets them.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub min_salary: Option<String>,
    pub has_equity: Option<String>,
    pub title: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl JobQuery {
    /// Pick the single filter to apply.
    ///
    /// Precedence is `minSalary`, then `hasEquity`, then `title`. Once one
    /// matches the rest are ignored, so `?minSalary=1&title=dev` lists the
    /// same jobs as `?minSalary=1`. Empty values count as absent, and any
    /// `hasEquity` other than `false` turns the equity filter on.
    pub fn filter(&self) -> Result<JobFilter, ServiceError> {
        if let Some(raw) = present(&self.min_salary) {
            let min = raw.parse::<i32>().map_err(|_| {
                ServiceError::BadRequest(format!("minSalary must be an integer, got {:?}", raw))
            })?;
            return Ok(JobFilter::MinSalary(min));
        }

        if present(&self.has_equity).is_some_and(|v| !v.eq_ignore_ascii_case("false")) {
            return Ok(JobFilter::HasEquity);
        }

        Ok(match self.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => JobFilter::TitleLike(title.to_string()),
            None => JobFilter::All,
        })
    }
}
