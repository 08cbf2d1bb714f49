// src/api/client.rs
//! Pure HTTP client wrapper for Notion API.
//!
//! This module provides a thin wrapper around reqwest for making
//! HTTP requests to the Notion API. It handles authentication and
//! basic request/response operations without parsing or business logic.

use super::types::{PaginatedResponse, QueryRequest};
use crate::constants::{NOTION_API_BASE_URL, NOTION_VERSION};
use crate::error::{AppError, FetchError};
use crate::model::RawRecord;
use crate::types::{ApiKey, DatabaseId, ValidatedUrl};
use reqwest::{header, Client, Response};
use serde::Serialize;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client against the public Notion API.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        let base_url = ValidatedUrl::parse(NOTION_API_BASE_URL)?;
        Self::with_base_url(api_key, &base_url)
    }

    /// Creates a client against another base URL, e.g. a local mock server.
    pub fn with_base_url(api_key: &ApiKey, base_url: &ValidatedUrl) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()
            .map_err(FetchError::from)?;
        Ok(Self {
            client,
            base_url: base_url.as_base().to_string(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::InvalidConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    ///
    /// `endpoint` is the path below the base URL.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        log::debug!("POST {}", url);
        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "   Query body: {}",
                serde_json::to_string_pretty(body)
                    .unwrap_or_else(|_| "Failed to serialize".to_string())
            );
        }

        let response = self.client.post(url).json(body).send().await?;

        log::debug!("{} -> {}", endpoint, response.status());
        Ok(response)
    }
}

#[async_trait::async_trait]
impl super::DatabaseQuery for NotionHttpClient {
    async fn query_database(
        &self,
        database: &DatabaseId,
        request: &QueryRequest,
    ) -> Result<PaginatedResponse<RawRecord>, FetchError> {
        let endpoint = format!("databases/{}/query", database.to_hyphenated());
        let response = self.post(&endpoint, request).await?;
        let result = extract_response_text(response).await?;
        super::parser::parse_query_response(result)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text along with its status and URL.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, FetchError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
