// src/api/notion_client_adapter.rs
//! Adapter from notion-client property types to the crate's own model.
//!
//! Each property is decoded on its own through
//! `notion_client::objects::page::PageProperty`. Anything the library cannot
//! decode, and the kinds a digest has no use for, become
//! [`PropertyValue::Unsupported`] so a row is never lost over one column.

use super::responses::{WirePage, WireRollup, WireRollupDate, WireRollupProperty};
use crate::model::RawRecord;
use crate::types::{
    DateValue, FileRef, FormulaResult, PropertyName, PropertyValue, RollupResult, SelectOption,
    TextSpan, User,
};
use chrono::{DateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use notion_client::objects::page::{
    DatePropertyValue, FormulaPropertyValue, PageProperty, SelectPropertyValue,
};
use notion_client::objects::property::DateOrDateTime;
use notion_client::objects::rich_text::RichText;
use serde_json::Value;

/// Convert a query result row into a [`RawRecord`].
pub fn convert_page(page: WirePage) -> RawRecord {
    let properties: IndexMap<PropertyName, PropertyValue> = page
        .properties
        .into_iter()
        .map(|(name, raw)| {
            let value = decode_property(&name, raw);
            (PropertyName::new(name), value)
        })
        .collect();

    RawRecord {
        id: page.id,
        created_time: page.created_time,
        last_edited_time: page.last_edited_time,
        url: page.url,
        properties,
    }
}

/// Decode one raw property object, degrading to `Unsupported` on failure.
pub fn decode_property(name: &str, raw: Value) -> PropertyValue {
    let kind = raw
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let decoded = if kind == "rollup" {
        serde_json::from_value::<WireRollupProperty>(raw).map(|property| PropertyValue::Rollup {
            rollup: property.rollup.map(|rollup| convert_rollup(name, rollup)),
        })
    } else {
        serde_json::from_value::<PageProperty>(raw).map(convert_page_property)
    };

    match decoded {
        Ok(value) => value,
        Err(e) => {
            log::warn!(
                "Property '{}' of type '{}' could not be decoded: {}. Rendering it empty.",
                name,
                kind,
                e
            );
            PropertyValue::Unsupported { kind }
        }
    }
}

// --- Main property dispatcher ---

fn convert_page_property(property: PageProperty) -> PropertyValue {
    match property {
        PageProperty::Title { title, .. } => PropertyValue::Title {
            title: convert_rich_text_array(title),
        },
        PageProperty::RichText { rich_text, .. } => PropertyValue::RichText {
            rich_text: convert_rich_text_array(rich_text),
        },
        PageProperty::Number { number, .. } => PropertyValue::Number {
            number: number.and_then(|n| n.as_f64()),
        },
        PageProperty::Checkbox { checkbox, .. } => PropertyValue::Checkbox {
            checkbox: Some(checkbox),
        },
        PageProperty::Url { url, .. } => PropertyValue::Url { url },
        PageProperty::Email { email, .. } => PropertyValue::Email { email },
        PageProperty::PhoneNumber { phone_number, .. } => PropertyValue::PhoneNumber { phone_number },
        PageProperty::Select { select, .. } => PropertyValue::Select {
            select: select.map(convert_select_option),
        },
        PageProperty::MultiSelect { multi_select, .. } => PropertyValue::MultiSelect {
            multi_select: multi_select.into_iter().map(convert_select_option).collect(),
        },
        PageProperty::Status { status, .. } => PropertyValue::Status {
            status: status.map(convert_select_option),
        },
        PageProperty::Date { date, .. } => PropertyValue::Date {
            date: date.map(convert_notion_date),
        },
        PageProperty::People { people, .. } => PropertyValue::People {
            people: people.into_iter().map(convert_user).collect(),
        },
        PageProperty::Files { files, .. } => PropertyValue::Files {
            files: files.into_iter().map(|f| FileRef { name: f.name }).collect(),
        },
        PageProperty::CreatedTime { created_time, .. } => PropertyValue::CreatedTime {
            created_time: Some(created_time),
        },
        PageProperty::CreatedBy { created_by, .. } => PropertyValue::CreatedBy {
            created_by: Some(convert_user(created_by)),
        },
        PageProperty::LastEditedTime {
            last_edited_time, ..
        } => PropertyValue::LastEditedTime { last_edited_time },
        PageProperty::LastEditedBy { last_edited_by, .. } => PropertyValue::LastEditedBy {
            last_edited_by: Some(convert_user(last_edited_by)),
        },
        PageProperty::Relation { relation, .. } => PropertyValue::Relation {
            relation: relation.into_iter().map(|r| r.id).collect(),
        },
        PageProperty::Formula { formula, .. } => PropertyValue::Formula {
            formula: formula.map(convert_formula_value),
        },
        // Rollups are routed to `convert_rollup` before notion-client sees them.
        PageProperty::Rollup { .. } => unsupported("rollup"),
        PageProperty::UniqueID { .. } => unsupported("unique_id"),
        PageProperty::Verification { .. } => unsupported("verification"),
        PageProperty::Button { .. } => unsupported("button"),
    }
}

fn unsupported(kind: &str) -> PropertyValue {
    PropertyValue::Unsupported {
        kind: kind.to_string(),
    }
}

// --- Shared conversion helpers ---

fn convert_rich_text_array(rich_texts: Vec<RichText>) -> Vec<TextSpan> {
    rich_texts.into_iter().map(convert_rich_text).collect()
}

/// Only the plain rendering of a span is kept.
fn convert_rich_text(rich_text: RichText) -> TextSpan {
    let plain_text = match rich_text {
        RichText::Text {
            text, plain_text, ..
        } => plain_text.unwrap_or(text.content),
        RichText::Mention { plain_text, .. } => plain_text,
        RichText::Equation { plain_text, .. } => plain_text,
        _ => String::new(),
    };
    TextSpan { plain_text }
}

fn convert_select_option(s: SelectPropertyValue) -> SelectOption {
    SelectOption {
        id: s.id,
        name: s.name.unwrap_or_default(),
    }
}

fn convert_user(user: notion_client::objects::user::User) -> User {
    User {
        id: user.id,
        name: user.name,
    }
}

/// Date-only values become midnight UTC of that day.
fn resolve_date(dod: DateOrDateTime) -> DateTime<Utc> {
    match dod {
        DateOrDateTime::Date(d) => d.and_time(NaiveTime::MIN).and_utc(),
        DateOrDateTime::DateTime(dt) => dt,
    }
}

fn convert_notion_date(d: DatePropertyValue) -> DateValue {
    DateValue {
        start: d.start.map(resolve_date),
        end: d.end.map(resolve_date),
        time_zone: d.time_zone,
    }
}

fn convert_formula_value(formula: FormulaPropertyValue) -> FormulaResult {
    match formula {
        FormulaPropertyValue::String { string } => FormulaResult::String { string },
        FormulaPropertyValue::Number { number } => FormulaResult::Number {
            number: number.and_then(|n| n.as_f64()),
        },
        FormulaPropertyValue::Boolean { boolean } => FormulaResult::Boolean {
            boolean: Some(boolean),
        },
        FormulaPropertyValue::Date { date } => FormulaResult::Date {
            date: date.map(convert_notion_date),
        },
    }
}

/// Rollup arrays hold full property values, so each element goes back
/// through [`decode_property`].
fn convert_rollup(name: &str, rollup: WireRollup) -> RollupResult {
    match rollup {
        WireRollup::Number { number } => RollupResult::Number { number },
        WireRollup::Date { date } => RollupResult::Date {
            date: date.map(|date| match date {
                WireRollupDate::Range(range) => convert_notion_date(range),
                WireRollupDate::Instant(instant) => DateValue::at(instant),
            }),
        },
        WireRollup::Array { array } => RollupResult::Array {
            array: array
                .into_iter()
                .map(|item| decode_property(name, item))
                .collect(),
        },
        WireRollup::Incomplete => RollupResult::Incomplete,
        WireRollup::Unsupported => RollupResult::Unsupported,
        WireRollup::Unknown => {
            log::debug!("Rollup '{}' has a result type this crate does not know", name);
            RollupResult::Unsupported
        }
    }
}
