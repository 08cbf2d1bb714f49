// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many rows the Notion API returns per page of query results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

/// Most pages a single fetch will request.
pub const NOTION_MAX_QUERY_PAGES: usize = 10;

/// Most rows a single digest can contain. Anything past this is silently
/// left out, never an error.
pub const NOTION_MAX_RECORDS: usize = NOTION_API_PAGE_SIZE as usize * NOTION_MAX_QUERY_PAGES;

/// API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

// ---------------------------------------------------------------------------
// Digest defaults
// ---------------------------------------------------------------------------

/// Tag that keeps a row out of every digest unless the database overrides
/// its ignore list.
pub const DEFAULT_IGNORE_TAG: &str = "gister:ignore";

pub const DEFAULT_CONFIG_PATH: &str = ".notion-digest.yaml";

pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Implicit-TLS submission port.
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Name of the log file created in the system temp directory.
pub const LOG_FILE_NAME: &str = "notion_digest.log";
