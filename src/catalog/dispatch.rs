//! Listing request dispatch.
//!
//! A listing request carries at most one meaningful selector. When several
//! are present, precedence is: search query, category, performer, tag,
//! then plain pagination. Empty or whitespace-only values count as absent.

use serde::Deserialize;

use crate::catalog::engine::CatalogEngine;
use crate::error::Result;
use crate::model::PaginatedResult;

/// Raw listing parameters as they arrive from the request layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    pub page: Option<String>,
    pub q: Option<String>,
    pub category: Option<String>,
    pub performer: Option<String>,
    pub tag: Option<String>,
}

/// The single engine operation selected for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    Search { query: String, page: i64 },
    Category { name: String, page: i64 },
    Performer { name: String, page: i64 },
    Tag { name: String, page: i64 },
    Page { page: i64 },
}

/// Page number from a raw parameter: 1 when absent, unparseable or < 1.
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1)
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl CatalogQuery {
    pub fn from_params(params: &QueryParams) -> Self {
        let page = parse_page(params.page.as_deref());

        if let Some(query) = present(&params.q) {
            CatalogQuery::Search { query, page }
        } else if let Some(name) = present(&params.category) {
            CatalogQuery::Category { name, page }
        } else if let Some(name) = present(&params.performer) {
            CatalogQuery::Performer { name, page }
        } else if let Some(name) = present(&params.tag) {
            CatalogQuery::Tag { name, page }
        } else {
            CatalogQuery::Page { page }
        }
    }

    pub fn page(&self) -> i64 {
        match self {
            CatalogQuery::Search { page, .. }
            | CatalogQuery::Category { page, .. }
            | CatalogQuery::Performer { page, .. }
            | CatalogQuery::Tag { page, .. }
            | CatalogQuery::Page { page } => *page,
        }
    }
}

impl CatalogEngine {
    /// Run the operation a `CatalogQuery` selects.
    pub fn execute(&self, query: &CatalogQuery) -> Result<PaginatedResult> {
        match query {
            CatalogQuery::Search { query, page } => self.search(query, *page),
            CatalogQuery::Category { name, page } => self.filter_by_category(name, *page),
            CatalogQuery::Performer { name, page } => self.filter_by_performer(name, *page),
            CatalogQuery::Tag { name, page } => self.filter_by_tag(name, *page),
            CatalogQuery::Page { page } => self.paginate(*page),
        }
    }
}
