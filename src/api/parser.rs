// src/api/parser.rs
//! Response parsing for database queries.

use super::client::ApiResponse;
use super::notion_client_adapter::convert_page;
use super::responses::{NotionError, QueryDatabaseResponse};
use super::types::PaginatedResponse;
use crate::error::{FetchError, NotionErrorCode};
use crate::model::RawRecord;

const BODY_PREVIEW_LEN: usize = 500;

/// Parse any Notion API response, routing non-2xx bodies to the error parser.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, FetchError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success(&result.data, &result.url)
    } else {
        Err(parse_error(&result.data, result.status.as_u16(), &result.url))
    }
}

fn parse_success<T>(body: &str, url: &str) -> Result<T, FetchError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        FetchError::Deserialization {
            source: e,
            body: preview(body),
        }
    })
}

/// Notion error bodies carry a code and message; anything else falls back
/// to the bare HTTP status.
pub fn parse_error(body: &str, status: u16, url: &str) -> FetchError {
    match serde_json::from_str::<NotionError>(body) {
        Ok(error) => FetchError::NotionApi {
            status,
            code: NotionErrorCode::from_api_response(&error.code),
            message: error.message,
            request_id: error.request_id,
        },
        Err(_) => FetchError::HttpStatus {
            status,
            url: url.to_string(),
        },
    }
}

/// Parse one page of `databases/{id}/query` results into raw records.
pub fn parse_query_response(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<RawRecord>, FetchError> {
    let response: QueryDatabaseResponse = parse_api_response(result)?;
    Ok(response.map_results(convert_page))
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_LEN) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
