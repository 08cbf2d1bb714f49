// src/lib.rs
//! notion-digest library: turns Notion databases into HTML digests.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `FetchError`, `AppError`, `ValidationError`
//! - **Configuration**: `AppConfig`, `DatabaseJob`, `CommandLineInput`
//! - **Domain model**: `RawRecord`, `NormalizedItem`, `IgnoreRule`, `PropertyValue`
//! - **API client**: `DatabaseQuery`, `NotionHttpClient`, `PageFetcher`
//! - **Digest stages**: `PropertyNormalizer`, `ItemNormalizer`, `filter_items`, `render_digest`
//! - **Pipeline**: `DigestPipeline::generate_digest`, `run_jobs`

pub mod api;
pub mod config;
mod constants;
pub mod digest;
mod error;
pub mod executor;
pub mod model;
pub mod normalize;
pub mod output;
mod pipeline;
mod query_template;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, FetchError, NotionErrorCode, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{AppConfig, CommandLineInput, ConfigFile, DatabaseJob, MailSettings};
pub use crate::constants::{
    DEFAULT_IGNORE_TAG, LOG_FILE_NAME, NOTION_API_PAGE_SIZE, NOTION_MAX_QUERY_PAGES,
    NOTION_MAX_RECORDS,
};

// --- Domain Model ---
pub use crate::model::{DigestStyle, FieldMap, IgnoreRule, NormalizedItem, RawRecord};

// --- Domain Types ---
pub use crate::types::{
    ApiKey, DatabaseId, DateValue, Digest, FormulaResult, PropertyName, PropertyValue,
    RollupResult, SelectOption, TextSpan, User, ValidatedUrl,
};

// --- API Client ---
pub use crate::api::{DatabaseQuery, NotionHttpClient, PageFetcher, PaginatedResponse, QueryRequest};

// --- Digest Stages ---
pub use crate::digest::{filter_items, render_digest};
pub use crate::normalize::{ItemNormalizer, PropertyNormalizer, ViewerClock};
pub use crate::query_template::QueryTemplates;

// --- Pipeline ---
pub use crate::executor::{run_job, run_jobs, JobOutcome};
pub use crate::pipeline::{DigestComposer, DigestDelivery, DigestPipeline, RecordSource};
