// src/api/pagination.rs
//! Bounded cursor pagination over a database query.

use super::types::QueryRequest;
use super::DatabaseQuery;
use crate::constants::{NOTION_MAX_QUERY_PAGES, NOTION_MAX_RECORDS};
use crate::error::FetchError;
use crate::model::RawRecord;
use crate::types::DatabaseId;
use serde_json::Value;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;

/// Reads every row of a database query, one page at a time.
///
/// Pages are requested strictly in sequence. The fetch stops when the API
/// reports no more rows, when it returns no cursor, or after
/// [`NOTION_MAX_QUERY_PAGES`] pages, whichever comes first; rows past
/// [`NOTION_MAX_RECORDS`] are dropped without error.
///
/// A fetch is all-or-nothing: if any page fails, rows already read are
/// discarded and only the error is returned.
pub struct PageFetcher<Q> {
    query: Q,
}

impl<Q: DatabaseQuery> PageFetcher<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Fetch up to [`NOTION_MAX_RECORDS`] rows in the API's order.
    ///
    /// Cancelling `cancel` aborts the in-flight request and returns
    /// [`FetchError::Cancelled`].
    pub async fn fetch(
        &self,
        database: &DatabaseId,
        filter: Option<Value>,
        sorts: Option<Value>,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawRecord>, FetchError> {
        let query = QueryRequest::new(filter, sorts);
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen_cursors = HashSet::new();

        for page in 1..=NOTION_MAX_QUERY_PAGES {
            let request = query.at_cursor(cursor.take());

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    log::debug!("Fetch of {} cancelled before page {}", database, page);
                    return Err(FetchError::Cancelled);
                }
                result = self.query.query_database(database, &request) => result?,
            };

            log::debug!(
                "Database {} page {}: {} rows, has_more={}",
                database,
                page,
                response.results.len(),
                response.has_more
            );
            records.extend(response.results);

            if !response.has_more {
                break;
            }
            let Some(next) = response.next_cursor else {
                break;
            };
            if !seen_cursors.insert(next.clone()) {
                return Err(FetchError::CursorAnomaly { cursor: next });
            }

            if page == NOTION_MAX_QUERY_PAGES {
                log::info!(
                    "Database {} has more than {} rows; the rest are left out",
                    database,
                    NOTION_MAX_RECORDS
                );
            }
            cursor = Some(next);
        }

        records.truncate(NOTION_MAX_RECORDS);
        log::info!("Fetched {} rows from database {}", records.len(), database);
        Ok(records)
    }
}
