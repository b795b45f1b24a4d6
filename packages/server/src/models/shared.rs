use serde::Serialize;


/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total number of matching items across all pages.
    #[schema(example = 15)]
    pub total: u64,
    /// Current page number (1-based).
    #[schema(example = 2)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 10)]
    pub limit: u64,
    /// Total number of pages.
    #[schema(example = 2)]
    pub total_pages: u64,
    /// Whether this page reaches the end of the result set.
    #[schema(example = true)]
    pub is_last_page: bool,
}

impl Pagination {
    /// Derive page counts from a total. `limit` must be non-zero.
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
            is_last_page: page.saturating_mul(limit) >= total,
        }
    }
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Split a comma-separated list, trimming items and dropping empty ones.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
