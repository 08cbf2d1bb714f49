// src/api/responses.rs
//! Wire shapes of the Notion query endpoint.
//!
//! Pages are decoded only down to their property map; each property value
//! stays raw JSON until the adapter decodes it on its own, so one property
//! the client library does not know cannot fail a whole page.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

pub use notion_client::objects::error::Error as NotionError;
use notion_client::objects::page::DatePropertyValue;

use super::types::PaginatedResponse;

/// A database row as returned by `databases/{id}/query`.
#[derive(Debug, Clone, Deserialize)]
pub struct WirePage {
    pub id: String,
    pub created_time: DateTime<Utc>,
    pub last_edited_time: DateTime<Utc>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

pub type QueryDatabaseResponse = PaginatedResponse<WirePage>;

/// A rollup property, decoded with local shapes rather than notion-client's.
///
/// The API sends rollup dates as ranges, `incomplete`/`unsupported` as empty
/// objects, and keeps adding aggregation functions; none of that may cost
/// the value. `function` is not read at all.
#[derive(Deserialize)]
pub struct WireRollupProperty {
    #[serde(default)]
    pub rollup: Option<WireRollup>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireRollup {
    Number {
        #[serde(default)]
        number: Option<f64>,
    },
    Date {
        #[serde(default)]
        date: Option<WireRollupDate>,
    },
    /// Elements stay raw; each one is a property value of its own.
    Array {
        #[serde(default)]
        array: Vec<Value>,
    },
    Incomplete,
    Unsupported,
    #[serde(other)]
    Unknown,
}

/// A rollup date is normally a date object; older payloads carry a bare
/// timestamp.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum WireRollupDate {
    Range(DatePropertyValue),
    Instant(DateTime<Utc>),
}
