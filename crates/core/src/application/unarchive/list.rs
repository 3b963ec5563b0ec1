// List Jobs Use Case

use serde::{Deserialize, Serialize};

use crate::application::{PaginatedResponse, ServiceConfig};
use crate::domain::{JobResponse, JobStatus};
use crate::error::{AppError, Result};
use crate::port::job_store::MAX_ROWS_PER_PAGE;
use crate::port::{JobFilter, JobStore, PageRequest};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsQuery {
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub rows_per_page: Option<u32>,
}

/// Validate query parameters
pub fn validate_query(query: &ListJobsQuery, config: &ServiceConfig) -> Result<PageRequest> {
    let page = query.page.unwrap_or(1);
    if page == 0 {
        return Err(AppError::Validation("page starts at 1".to_string()));
    }

    let rows_per_page = query.rows_per_page.unwrap_or(config.rows_per_page);
    if rows_per_page == 0 || rows_per_page > MAX_ROWS_PER_PAGE {
        return Err(AppError::Validation(format!(
            "rowsPerPage out of range (1..={})",
            MAX_ROWS_PER_PAGE
        )));
    }

    Ok(PageRequest::new(page, rows_per_page))
}

/// Execute list use case (ordered by ascending id, i.e. creation order)
pub async fn execute(
    store: &dyn JobStore,
    config: &ServiceConfig,
    query: ListJobsQuery,
) -> Result<PaginatedResponse<JobResponse>> {
    let page = validate_query(&query, config)?;
    let filter = JobFilter {
        status: query.status,
    };

    let result = store.list(&filter, page).await?;
    let results = result.jobs.into_iter().map(JobResponse::from).collect();

    Ok(PaginatedResponse::new(
        results,
        result.total,
        page,
        &filter,
        &config.jobs_endpoint_url,
    ))
}
