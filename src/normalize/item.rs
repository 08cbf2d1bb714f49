//! Record → item normalization for both digest styles.

use super::property::PropertyNormalizer;
use super::time::ViewerClock;
use crate::model::{reserved, DigestStyle, FieldMap, NormalizedItem, RawRecord};
use crate::types::PropertyValue;
use indexmap::IndexSet;

pub const DEFAULT_TITLE_PROPERTY: &str = "Name";
pub const DEFAULT_TAGS_PROPERTY: &str = "Tags";

/// Maps raw records into [`NormalizedItem`]s.
///
/// Metadata (`id`, `url`, `created_time`) always comes from the record
/// itself. What else is filled in depends on the [`DigestStyle`]:
///
/// - `Items`: `title` from the title column and `tags` from a multi-select
///   column, looked up by name.
/// - `Fields`: every property flattened into `fields`, plus the reserved
///   metadata keys. Title and tags stay empty.
#[derive(Debug, Clone)]
pub struct ItemNormalizer {
    style: DigestStyle,
    title_property: String,
    tags_property: String,
    properties: PropertyNormalizer,
}

impl ItemNormalizer {
    pub fn new(style: DigestStyle, properties: PropertyNormalizer) -> Self {
        Self {
            style,
            title_property: DEFAULT_TITLE_PROPERTY.to_string(),
            tags_property: DEFAULT_TAGS_PROPERTY.to_string(),
            properties,
        }
    }

    pub fn with_title_property(mut self, name: impl Into<String>) -> Self {
        self.title_property = name.into();
        self
    }

    pub fn with_tags_property(mut self, name: impl Into<String>) -> Self {
        self.tags_property = name.into();
        self
    }

    pub fn style(&self) -> DigestStyle {
        self.style
    }

    pub fn clock(&self) -> &ViewerClock {
        self.properties.clock()
    }

    pub fn normalize(&self, record: &RawRecord) -> NormalizedItem {
        let item = NormalizedItem::new(&record.id, "", &record.url, record.created_time);

        match self.style {
            DigestStyle::Items => NormalizedItem {
                title: self.title_of(record),
                tags: self.tags_of(record),
                ..item
            },
            DigestStyle::Fields => item.with_fields(self.field_map(record)),
        }
    }

    pub fn normalize_all(&self, records: &[RawRecord]) -> Vec<NormalizedItem> {
        records.iter().map(|r| self.normalize(r)).collect()
    }

    /// The configured title column, or failing that the first title-kind one.
    fn title_of(&self, record: &RawRecord) -> String {
        let named = record
            .properties
            .get(self.title_property.as_str())
            .filter(|value| value.is_title());

        match named.or_else(|| record.title_property().map(|(_, value)| value)) {
            Some(value) => self.properties.stringify(value),
            None => String::new(),
        }
    }

    fn tags_of(&self, record: &RawRecord) -> IndexSet<String> {
        match record.properties.get(self.tags_property.as_str()) {
            Some(PropertyValue::MultiSelect { multi_select }) => {
                multi_select.iter().map(|o| o.name.clone()).collect()
            }
            Some(other) => {
                log::debug!(
                    "Tags property '{}' is {}, not multi_select; no tags read",
                    self.tags_property,
                    other.type_name()
                );
                IndexSet::new()
            }
            None => IndexSet::new(),
        }
    }

    fn field_map(&self, record: &RawRecord) -> FieldMap {
        let clock = self.properties.clock();
        let mut fields: FieldMap = record
            .properties
            .iter()
            .map(|(name, value)| (name.to_string(), self.properties.stringify(value)))
            .collect();

        // Metadata wins over a user column that happens to share a reserved name.
        fields.insert(reserved::ID.to_string(), record.id.clone());
        fields.insert(
            reserved::CREATED_TIME.to_string(),
            clock.pretty(record.created_time),
        );
        fields.insert(
            reserved::LAST_EDITED_TIME.to_string(),
            clock.pretty(record.last_edited_time),
        );
        fields.insert(reserved::URL.to_string(), record.url.clone());
        fields
    }
}

impl Default for ItemNormalizer {
    fn default() -> Self {
        Self::new(DigestStyle::default(), PropertyNormalizer::default())
    }
}
