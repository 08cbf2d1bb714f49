//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use notion_digest::{
    DatabaseId, DatabaseQuery, FetchError, PaginatedResponse, QueryRequest, RawRecord,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

pub const DATABASE_ID: &str = "550e8400e29b41d4a716446655440000";
pub const DATABASE_ID_HYPHENATED: &str = "550e8400-e29b-41d4-a716-446655440000";
pub const API_KEY: &str = "secret_integration_test_key_0001";

pub fn database() -> DatabaseId {
    DatabaseId::parse(DATABASE_ID).expect("fixture id is valid")
}

/// A record with no properties, identified by `id`.
pub fn bare_record(id: &str) -> RawRecord {
    RawRecord {
        id: id.to_string(),
        created_time: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
        last_edited_time: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
        url: format!("https://www.notion.so/{}", id),
        properties: Default::default(),
    }
}

/// A full page of `size` records whose ids start with `prefix`.
pub fn page_of(prefix: &str, size: usize, next_cursor: Option<&str>) -> PaginatedResponse<RawRecord> {
    PaginatedResponse {
        object: "list".to_string(),
        results: (0..size)
            .map(|i| bare_record(&format!("{}-{}", prefix, i)))
            .collect(),
        next_cursor: next_cursor.map(str::to_string),
        has_more: next_cursor.is_some(),
    }
}

/// An in-memory query that replays scripted responses in order and records
/// every request it was given.
pub struct ScriptedQuery {
    responses: Mutex<VecDeque<Result<PaginatedResponse<RawRecord>, FetchError>>>,
    pub requests: Mutex<Vec<QueryRequest>>,
}

impl ScriptedQuery {
    pub fn new(responses: Vec<Result<PaginatedResponse<RawRecord>, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `pages` full pages, every one claiming there is more.
    pub fn endless(pages: usize) -> Self {
        Self::new(
            (0..pages)
                .map(|p| Ok(page_of(&format!("p{}", p), 100, Some(format!("cursor-{}", p).as_str()))))
                .collect(),
        )
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl DatabaseQuery for ScriptedQuery {
    async fn query_database(
        &self,
        _database: &DatabaseId,
        request: &QueryRequest,
    ) -> Result<PaginatedResponse<RawRecord>, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request {:?}", request))
    }
}

/// A `databases/{id}/query` page as Notion serves it.
pub fn wire_page(id: &str, title: &str, tags: &[&str], created: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "created_time": created,
        "last_edited_time": created,
        "created_by": {"object": "user", "id": "u1"},
        "last_edited_by": {"object": "user", "id": "u1"},
        "archived": false,
        "url": format!("https://www.notion.so/{}", id),
        "properties": {
            "Tags": {
                "id": "tags",
                "type": "multi_select",
                "multi_select": tags
                    .iter()
                    .map(|t| json!({"id": format!("opt-{}", t), "name": t, "color": "default"}))
                    .collect::<Vec<_>>()
            },
            "Name": {
                "id": "title",
                "type": "title",
                "title": [{
                    "type": "text",
                    "text": {"content": title, "link": null},
                    "plain_text": title,
                    "href": null,
                    "annotations": {
                        "bold": false, "italic": false, "strikethrough": false,
                        "underline": false, "code": false, "color": "default"
                    }
                }]
            }
        }
    })
}

pub fn query_body(pages: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "object": "list",
        "results": pages,
        "next_cursor": next_cursor,
        "has_more": next_cursor.is_some(),
        "type": "page_or_database",
        "page_or_database": {}
    })
}

/// Adds one raw property object to a `wire_page`.
pub fn with_property(mut page: Value, name: &str, property: Value) -> Value {
    page["properties"][name] = property;
    page
}
