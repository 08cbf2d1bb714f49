use thiserror::Error;

mod domain_types;
mod ids;
mod properties;

pub use domain_types::*;
pub use ids::*;
pub use properties::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}
