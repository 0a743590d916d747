use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Job row as returned by listing (no id)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Database representation of a job with all fields
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        JobSummary {
            title: job.title.clone(),
            salary: job.salary,
            equity: job.equity,
            company_handle: job.company_handle.clone(),
        }
    }
}

/// Company fields embedded into a single job lookup
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A job together with the company it belongs to.
///
/// `company` is left out of the JSON when the company row could not be found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanySummary>,
}

/// Filter applied to a job listing.
///
/// At most one predicate is ever active, see `JobQuery::filter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFilter {
    All,
    MinSalary(i32),
    HasEquity,
    TitleLike(String),
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
    fn detail_omits_missing_company() {
        let detail = JobDetail {
            job: job("Backend Engineer", Some(120000), Some("0.01")),
            company: None,
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["companyHandle"], "acme");
        assert_eq!(value["equity"], "0.01");
        assert!(value.get("company").is_none());
    }
}
