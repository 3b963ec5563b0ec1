// Paginated list responses

use serde::{Deserialize, Serialize};

use crate::domain::JobStatus;
use crate::port::{JobFilter, PageRequest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub previous: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub rows_per_page: u32,
    /// Total number of matching records across all pages
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub links: PageLinks,
    pub pagination: PageInfo,
    pub results: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    /// Wrap one page of results, building links relative to `base_url`
    pub fn new(
        results: Vec<T>,
        total: u64,
        page: PageRequest,
        filter: &JobFilter,
        base_url: &str,
    ) -> Self {
        let has_next = u64::from(page.page) * u64::from(page.rows_per_page) < total;

        let next = has_next
            .then(|| page_url(base_url, page.page + 1, page.rows_per_page, filter.status));
        let previous = (page.page > 1)
            .then(|| page_url(base_url, page.page - 1, page.rows_per_page, filter.status));

        Self {
            links: PageLinks { previous, next },
            pagination: PageInfo {
                page: page.page,
                rows_per_page: page.rows_per_page,
                count: total,
            },
            results,
        }
    }
}

fn page_url(base_url: &str, page: u32, rows_per_page: u32, status: Option<JobStatus>) -> String {
    let mut url = format!("{}?page={}&rowsPerPage={}", base_url, page, rows_per_page);
    if let Some(status) = status {
        url.push_str("&status=");
        url.push_str(status.as_str());
    }
    url
}
