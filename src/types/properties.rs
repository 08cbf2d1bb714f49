use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single typed property value as read from a database row.
///
/// The variant is the property kind. Every optional sub-value the API may
/// leave out is an `Option` here, so a decoded value can never claim a kind
/// whose payload is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        title: Vec<TextSpan>,
    },
    RichText {
        rich_text: Vec<TextSpan>,
    },
    Number {
        number: Option<f64>,
    },
    Select {
        select: Option<SelectOption>,
    },
    MultiSelect {
        multi_select: Vec<SelectOption>,
    },
    Status {
        status: Option<SelectOption>,
    },
    Date {
        date: Option<DateValue>,
    },
    People {
        people: Vec<User>,
    },
    Files {
        files: Vec<FileRef>,
    },
    Checkbox {
        checkbox: Option<bool>,
    },
    Url {
        url: Option<String>,
    },
    Email {
        email: Option<String>,
    },
    PhoneNumber {
        phone_number: Option<String>,
    },
    Formula {
        formula: Option<FormulaResult>,
    },
    Relation {
        relation: Vec<String>,
    },
    Rollup {
        rollup: Option<RollupResult>,
    },
    CreatedTime {
        created_time: Option<DateTime<Utc>>,
    },
    CreatedBy {
        created_by: Option<User>,
    },
    LastEditedTime {
        last_edited_time: Option<DateTime<Utc>>,
    },
    LastEditedBy {
        last_edited_by: Option<User>,
    },
    /// A property kind this crate does not decode (buttons, unique IDs,
    /// verification, or anything newer than the client library).
    Unsupported {
        kind: String,
    },
}

impl PropertyValue {
    /// Returns the Notion API type name for this property value.
    pub fn type_name(&self) -> &str {
        match self {
            PropertyValue::Title { .. } => "title",
            PropertyValue::RichText { .. } => "rich_text",
            PropertyValue::Number { .. } => "number",
            PropertyValue::Select { .. } => "select",
            PropertyValue::MultiSelect { .. } => "multi_select",
            PropertyValue::Status { .. } => "status",
            PropertyValue::Date { .. } => "date",
            PropertyValue::People { .. } => "people",
            PropertyValue::Files { .. } => "files",
            PropertyValue::Checkbox { .. } => "checkbox",
            PropertyValue::Url { .. } => "url",
            PropertyValue::Email { .. } => "email",
            PropertyValue::PhoneNumber { .. } => "phone_number",
            PropertyValue::Formula { .. } => "formula",
            PropertyValue::Relation { .. } => "relation",
            PropertyValue::Rollup { .. } => "rollup",
            PropertyValue::CreatedTime { .. } => "created_time",
            PropertyValue::CreatedBy { .. } => "created_by",
            PropertyValue::LastEditedTime { .. } => "last_edited_time",
            PropertyValue::LastEditedBy { .. } => "last_edited_by",
            PropertyValue::Unsupported { kind } => kind,
        }
    }

    /// Whether this is the title column of its database.
    pub fn is_title(&self) -> bool {
        matches!(self, PropertyValue::Title { .. })
    }
}

/// One run of text inside a title or rich-text property.
///
/// Only the plain rendering is kept; annotations and links play no part in
/// a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub plain_text: String,
}

impl TextSpan {
    pub fn plain(text: &str) -> Self {
        Self {
            plain_text: text.to_string(),
        }
    }
}

/// Select, multi-select and status option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: Option<String>,
    pub name: String,
}

impl SelectOption {
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
        }
    }
}

/// A date or date range.
///
/// Date-only values arrive as midnight UTC. `time_zone` is set only when the
/// user pinned the value to an explicit zone in Notion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub time_zone: Option<String>,
}

impl DateValue {
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
            time_zone: None,
        }
    }

    pub fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            time_zone: None,
        }
    }

    pub fn in_zone(self, zone: &str) -> Self {
        Self {
            time_zone: Some(zone.to_string()),
            ..self
        }
    }
}

/// User representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
}

impl User {
    pub fn named(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Some(name.to_string()),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.as_deref().unwrap_or_default())
    }
}

/// File attachment reference. Carried for completeness; digests never show files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
}

/// The computed result of a formula property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormulaResult {
    String { string: Option<String> },
    Number { number: Option<f64> },
    Date { date: Option<DateValue> },
    Boolean { boolean: Option<bool> },
}

/// The aggregated result of a rollup property.
///
/// `Array` holds full property values, which is what makes rollups
/// recursive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RollupResult {
    Number { number: Option<f64> },
    Array { array: Vec<PropertyValue> },
    Date { date: Option<DateValue> },
    Unsupported,
    Incomplete,
}
