//! Domain model for one digest run.
//!
//! A run moves records through three shapes: [`RawRecord`] as returned by a
//! database query, [`NormalizedItem`] after every property has been flattened
//! to text, and finally the HTML digest. None of them outlive the run.

use crate::types::{PropertyName, PropertyValue};
use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One row of a database, exactly as the query returned it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub id: String,
    pub created_time: DateTime<Utc>,
    pub last_edited_time: DateTime<Utc>,
    pub url: String,
    /// Properties in the order the API listed them.
    pub properties: IndexMap<PropertyName, PropertyValue>,
}

impl RawRecord {
    /// The first title-kind property, if the row has one.
    pub fn title_property(&self) -> Option<(&PropertyName, &PropertyValue)> {
        self.properties.iter().find(|(_, value)| value.is_title())
    }
}

/// Flat name → text mapping produced by the field-dump normalization.
pub type FieldMap = BTreeMap<String, String>;

/// Reserved field-map keys carrying record metadata.
pub mod reserved {
    pub const ID: &str = "__id";
    pub const CREATED_TIME: &str = "__createdTime";
    pub const LAST_EDITED_TIME: &str = "__lastEditedTime";
    pub const URL: &str = "__url";

    pub const ALL: [&str; 4] = [ID, CREATED_TIME, LAST_EDITED_TIME, URL];

    /// Whether `key` is one of the metadata keys rather than a user property.
    pub fn is_reserved(key: &str) -> bool {
        ALL.contains(&key)
    }
}

/// The pipeline's unit of work.
///
/// `id`, `url` and `created_time` always come from record metadata. `title`
/// may be empty when the row has no title property (and is always empty in
/// field-dump mode, where `fields` is populated instead).
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub tags: IndexSet<String>,
    pub created_time: DateTime<Utc>,
    pub fields: Option<FieldMap>,
}

impl NormalizedItem {
    /// A structured item with no tags and no field map.
    pub fn new(id: &str, title: &str, url: &str, created_time: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            tags: IndexSet::new(),
            created_time,
            fields: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields = Some(fields);
        self
    }
}

/// Which of the two digest styles a database uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestStyle {
    /// Title plus tags, one linked line per row.
    #[default]
    Items,
    /// Every property flattened into a name → text map.
    ///
    /// Rows carry no title and no tags, so the link text falls back to the
    /// creation time and ignore tags (`gister:ignore` included) never drop a
    /// row. Only the `createdBefore` cutoff filters this style.
    Fields,
}

/// Which rows to leave out of a digest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IgnoreRule {
    pub tags: HashSet<String>,
    /// Rows created strictly before this instant are dropped.
    pub created_before: Option<DateTime<Utc>>,
}

impl IgnoreRule {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            created_before: None,
        }
    }

    pub fn with_cutoff(mut self, cutoff: DateTime<Utc>) -> Self {
        self.created_before = Some(cutoff);
        self
    }

    /// Whether `item` must be left out of the digest.
    pub fn excludes(&self, item: &NormalizedItem) -> bool {
        if let Some(cutoff) = self.created_before {
            if item.created_time < cutoff {
                return true;
            }
        }
        item.tags.iter().any(|tag| self.tags.contains(tag))
    }
}
