// src/pipeline.rs
//! The digest pipeline: fetch → normalize → filter → render.
//!
//! Each stage is a capability trait so it can be exercised in isolation.
//! Only fetching can fail; everything after it is total, so one odd row
//! never costs the whole digest.

use crate::api::{DatabaseQuery, PageFetcher};
use crate::digest::{filter_items, render_digest};
use crate::error::{AppError, FetchError};
use crate::model::{IgnoreRule, RawRecord};
use crate::normalize::ItemNormalizer;
use crate::output::OutputReport;
use crate::types::{DatabaseId, Digest};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Retrieves the raw rows of a database.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_records(
        &self,
        database: &DatabaseId,
        filter: Option<Value>,
        sorts: Option<Value>,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawRecord>, FetchError>;
}

/// Turns raw rows into a rendered digest.
pub trait DigestComposer {
    fn compose(&self, records: &[RawRecord], rule: &IgnoreRule) -> Digest;
}

/// Delivers a rendered digest to its destinations.
#[async_trait::async_trait]
pub trait DigestDelivery {
    async fn deliver(&self, digest: Digest) -> Result<OutputReport, AppError>;
}

#[async_trait::async_trait]
impl<Q: DatabaseQuery> RecordSource for PageFetcher<Q> {
    async fn fetch_records(
        &self,
        database: &DatabaseId,
        filter: Option<Value>,
        sorts: Option<Value>,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawRecord>, FetchError> {
        self.fetch(database, filter, sorts, cancel).await
    }
}

/// One database's digest generator.
pub struct DigestPipeline<S> {
    source: S,
    normalizer: ItemNormalizer,
}

impl<Q: DatabaseQuery> DigestPipeline<PageFetcher<Q>> {
    /// A pipeline reading through `query` with bounded pagination.
    pub fn from_query(query: Q, normalizer: ItemNormalizer) -> Self {
        Self::new(PageFetcher::new(query), normalizer)
    }
}

impl<S: RecordSource> DigestPipeline<S> {
    pub fn new(source: S, normalizer: ItemNormalizer) -> Self {
        Self { source, normalizer }
    }

    /// Fetches the database and renders its digest.
    ///
    /// `filter` and `sorts` are fully formed query descriptors. A fetch
    /// failure (including cancellation) is the only possible error, and no
    /// partial digest is produced when it happens.
    pub async fn generate_digest(
        &self,
        database: &DatabaseId,
        filter: Option<Value>,
        sorts: Option<Value>,
        rule: &IgnoreRule,
        cancel: &CancellationToken,
    ) -> Result<Digest, FetchError> {
        let records = self
            .source
            .fetch_records(database, filter, sorts, cancel)
            .await?;
        let digest = self.compose(&records, rule);

        log::info!(
            "Digest for {}: {} rows fetched, {} bytes",
            database,
            records.len(),
            digest.len()
        );
        Ok(digest)
    }
}

impl<S> DigestComposer for DigestPipeline<S> {
    fn compose(&self, records: &[RawRecord], rule: &IgnoreRule) -> Digest {
        let items = self.normalizer.normalize_all(records);
        let kept = filter_items(items, rule);
        render_digest(&kept, self.normalizer.clock())
    }
}
