// src/api/mod.rs
//! Notion API interaction: the ability to read rows out of a database.
//!
//! The digest pipeline depends on [`DatabaseQuery`], never on HTTP details.
//! [`NotionHttpClient`] is the production implementation; tests substitute
//! their own.

pub mod client;
pub mod notion_client_adapter;
mod pagination;
pub mod parser;
mod responses;
mod types;

use crate::error::FetchError;
use crate::model::RawRecord;
use crate::types::DatabaseId;

/// The ability to run one page of a database query.
#[async_trait::async_trait]
pub trait DatabaseQuery: Send + Sync {
    async fn query_database(
        &self,
        database: &DatabaseId,
        request: &QueryRequest,
    ) -> Result<PaginatedResponse<RawRecord>, FetchError>;
}

#[async_trait::async_trait]
impl<Q: DatabaseQuery + ?Sized> DatabaseQuery for std::sync::Arc<Q> {
    async fn query_database(
        &self,
        database: &DatabaseId,
        request: &QueryRequest,
    ) -> Result<PaginatedResponse<RawRecord>, FetchError> {
        (**self).query_database(database, request).await
    }
}

// Re-export the public interface
pub use client::NotionHttpClient;
pub use pagination::PageFetcher;
pub use responses::WirePage;
pub use types::{PaginatedResponse, QueryRequest};
