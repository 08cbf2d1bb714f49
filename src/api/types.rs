// src/api/types.rs
//! Request and response shapes for database queries.

use crate::constants::NOTION_API_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of one `databases/{id}/query` call.
///
/// `filter` and `sorts` are passed through untouched: they are already fully
/// formed query descriptors by the time they reach the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Value>,
}

impl QueryRequest {
    /// First-page request with the standard page size.
    pub fn new(filter: Option<Value>, sorts: Option<Value>) -> Self {
        Self {
            page_size: NOTION_API_PAGE_SIZE,
            start_cursor: None,
            filter,
            sorts,
        }
    }

    /// The same query, continuing from `cursor`.
    pub fn at_cursor(&self, cursor: Option<String>) -> Self {
        Self {
            start_cursor: cursor,
            ..self.clone()
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub object: String,
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Converts every result, keeping the pagination fields.
    pub fn map_results<U, F>(self, f: F) -> PaginatedResponse<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResponse {
            object: self.object,
            results: self.results.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}
