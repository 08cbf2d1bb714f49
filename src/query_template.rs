// src/query_template.rs
//! Expands the filter and sort templates of a database into query JSON.
//!
//! Templates are Handlebars with three date variables, `yesterday`, `today`
//! and `tomorrow`, each the RFC 3339 midnight (UTC) of that calendar day.
//! A filter such as
//!
//! ```text
//! {"timestamp": "created_time", "created_time": {"on_or_after": "{{yesterday}}"}}
//! ```
//!
//! therefore always selects relative to the day the digest runs.

use crate::error::AppError;
use chrono::{Days, NaiveDate, NaiveTime, SecondsFormat};
use handlebars::Handlebars;
use serde_json::{json, Value};

const FILTER_TEMPLATE: &str = "filter";
const SORT_TEMPLATE: &str = "sort";

/// Renders query templates for one run day.
pub struct QueryTemplates {
    handlebars: Handlebars<'static>,
}

impl QueryTemplates {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        Self { handlebars }
    }

    /// The filter descriptor for `today`, or `None` for an empty template.
    pub fn expand_filter(&self, template: &str, today: NaiveDate) -> Result<Option<Value>, AppError> {
        self.expand(FILTER_TEMPLATE, template, today)
    }

    /// The sort descriptors for `today`, or `None` for an empty template.
    /// Notion takes sorts as a list, so anything but a JSON array is rejected.
    pub fn expand_sorts(&self, template: &str, today: NaiveDate) -> Result<Option<Value>, AppError> {
        let sorts = self.expand(SORT_TEMPLATE, template, today)?;
        match sorts {
            Some(value) if !value.is_array() => Err(AppError::InvalidConfiguration(format!(
                "sort template must produce a JSON array, got: {}",
                value
            ))),
            other => Ok(other),
        }
    }

    fn expand(&self, name: &str, template: &str, today: NaiveDate) -> Result<Option<Value>, AppError> {
        if template.trim().is_empty() {
            return Ok(None);
        }

        let rendered = self
            .handlebars
            .render_template(template, &date_variables(today))
            .map_err(|e| AppError::TemplateRenderError {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        log::debug!("Expanded {} template: {}", name, rendered);

        serde_json::from_str(&rendered)
            .map(Some)
            .map_err(|source| AppError::QueryTemplateJson {
                name: name.to_string(),
                source,
            })
    }
}

impl Default for QueryTemplates {
    fn default() -> Self {
        Self::new()
    }
}

fn date_variables(today: NaiveDate) -> Value {
    let midnight = |day: NaiveDate| {
        day.and_time(NaiveTime::MIN)
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::AutoSi, true)
    };
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);

    json!({
        "yesterday": midnight(yesterday),
        "today": midnight(today),
        "tomorrow": midnight(tomorrow),
    })
}
