//! Flattens typed property values into plain text.
//!
//! [`PropertyNormalizer::stringify`] is total: every kind, and every absent
//! sub-value at any depth, has a defined text form. Kinds a digest cannot
//! show (files, relations, boolean formulas, unknown kinds) become "".

use super::time::ViewerClock;
use crate::types::{DateValue, FormulaResult, PropertyValue, RollupResult, SelectOption, TextSpan, User};

/// Shown for a rollup whose aggregation Notion does not expose.
pub const ROLLUP_UNSUPPORTED: &str = "[Unsupported]";

/// Shown for a rollup Notion has not finished computing.
pub const ROLLUP_INCOMPLETE: &str = "[Incomplete]";

/// Turns one property value into its digest text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyNormalizer {
    clock: ViewerClock,
}

impl PropertyNormalizer {
    pub fn new(clock: ViewerClock) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &ViewerClock {
        &self.clock
    }

    /// Returns the text form of `value`. Never fails.
    pub fn stringify(&self, value: &PropertyValue) -> String {
        use PropertyValue::*;

        match value {
            Title { title } => concat_spans(title),
            RichText { rich_text } => concat_spans(rich_text),
            Number { number } => format_number(*number),
            Select { select } => option_name(select.as_ref()),
            Status { status } => option_name(status.as_ref()),
            MultiSelect { multi_select } => join_option_names(multi_select),
            Date { date } => self.format_date(date.as_ref()),
            People { people } => join_people(people),
            CreatedBy { created_by } => join_people(created_by.as_slice()),
            LastEditedBy { last_edited_by } => join_people(last_edited_by.as_slice()),
            // Attachments and links to other rows have no text form in a digest.
            Files { .. } | Relation { .. } => String::new(),
            Checkbox { checkbox } => checkbox.map(|b| b.to_string()).unwrap_or_default(),
            Url { url } => url.clone().unwrap_or_default(),
            Email { email } => email.clone().unwrap_or_default(),
            PhoneNumber { phone_number } => phone_number.clone().unwrap_or_default(),
            Formula { formula } => formula
                .as_ref()
                .map(|f| self.format_formula(f))
                .unwrap_or_default(),
            Rollup { rollup } => rollup
                .as_ref()
                .map(|r| self.format_rollup(r))
                .unwrap_or_default(),
            CreatedTime { created_time } => self.format_instant(*created_time),
            LastEditedTime { last_edited_time } => self.format_instant(*last_edited_time),
            Unsupported { kind } => {
                log::trace!("No text form for property kind '{}'", kind);
                String::new()
            }
        }
    }

    // --- Dates ---

    /// Date rule: a single point or `"<start> - <end>"` in the viewer's zone;
    /// a value pinned to a zone always shows both ends in that zone.
    pub fn format_date(&self, date: Option<&DateValue>) -> String {
        let Some(date) = date else {
            return String::new();
        };

        match &date.time_zone {
            None => match date.end {
                None => self.format_instant(date.start),
                Some(end) => format!(
                    "{} - {}",
                    self.format_instant(date.start),
                    self.clock.pretty(end)
                ),
            },
            Some(zone) => format!(
                "{} - {}",
                self.format_instant_in(date.start, zone),
                self.format_instant_in(date.end, zone)
            ),
        }
    }

    fn format_instant(&self, instant: Option<chrono::DateTime<chrono::Utc>>) -> String {
        instant.map(|t| self.clock.pretty(t)).unwrap_or_default()
    }

    fn format_instant_in(&self, instant: Option<chrono::DateTime<chrono::Utc>>, zone: &str) -> String {
        instant
            .map(|t| self.clock.pretty_in(t, zone))
            .unwrap_or_default()
    }

    // --- Recursive kinds ---

    fn format_formula(&self, formula: &FormulaResult) -> String {
        match formula {
            FormulaResult::Number { number } => format_number(*number),
            FormulaResult::String { string } => string.clone().unwrap_or_default(),
            FormulaResult::Date { date } => self.format_date(date.as_ref()),
            FormulaResult::Boolean { .. } => String::new(),
        }
    }

    fn format_rollup(&self, rollup: &RollupResult) -> String {
        match rollup {
            RollupResult::Number { number } => format_number(*number),
            RollupResult::Array { array } => array
                .iter()
                .map(|item| self.stringify(item))
                .collect::<Vec<_>>()
                .join(","),
            RollupResult::Date { date } => self.format_date(date.as_ref()),
            RollupResult::Unsupported => ROLLUP_UNSUPPORTED.to_string(),
            RollupResult::Incomplete => ROLLUP_INCOMPLETE.to_string(),
        }
    }
}

// --- Leaf formatters ---

fn concat_spans(spans: &[TextSpan]) -> String {
    spans.iter().map(|s| s.plain_text.as_str()).collect()
}

/// Shortest round-trip decimal; `f64`'s `Display` never uses an exponent.
fn format_number(number: Option<f64>) -> String {
    number.map(|n| n.to_string()).unwrap_or_default()
}

fn option_name(option: Option<&SelectOption>) -> String {
    option.map(|o| o.name.clone()).unwrap_or_default()
}

fn join_option_names(options: &[SelectOption]) -> String {
    options
        .iter()
        .map(|o| o.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_people(people: &[User]) -> String {
    people
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileRef;
    use chrono::{DateTime, TimeZone, Utc};

    fn normalizer() -> PropertyNormalizer {
        PropertyNormalizer::new(ViewerClock::utc())
    }

    fn jan(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    /// Every kind with each optional part left out.
    fn absent_values() -> Vec<PropertyValue> {
        use PropertyValue::*;
        vec![
            Title { title: vec![] },
            RichText { rich_text: vec![] },
            Number { number: None },
            Select { select: None },
            MultiSelect {
                multi_select: vec![],
            },
            Status { status: None },
            Date { date: None },
            Date {
                date: Some(DateValue {
                    start: None,
                    end: None,
                    time_zone: None,
                }),
            },
            People { people: vec![] },
            Files { files: vec![] },
            Checkbox { checkbox: None },
            Url { url: None },
            Email { email: None },
            PhoneNumber { phone_number: None },
            Formula { formula: None },
            Formula {
                formula: Some(FormulaResult::Number { number: None }),
            },
            Formula {
                formula: Some(FormulaResult::String { string: None }),
            },
            Formula {
                formula: Some(FormulaResult::Date { date: None }),
            },
            Formula {
                formula: Some(FormulaResult::Boolean { boolean: None }),
            },
            Relation { relation: vec![] },
            Rollup { rollup: None },
            Rollup {
                rollup: Some(RollupResult::Number { number: None }),
            },
            Rollup {
                rollup: Some(RollupResult::Date { date: None }),
            },
            Rollup {
                rollup: Some(RollupResult::Array { array: vec![] }),
            },
            CreatedTime { created_time: None },
            CreatedBy { created_by: None },
            LastEditedTime {
                last_edited_time: None,
            },
            LastEditedBy {
                last_edited_by: None,
            },
            Unsupported {
                kind: "button".to_string(),
            },
        ]
    }

    #[test]
    fn test_absent_values_are_empty() {
        let n = normalizer();
        for value in absent_values() {
            assert_eq!(n.stringify(&value), "", "kind {}", value.type_name());
        }
    }

    #[test]
    fn test_present_values() {
        use PropertyValue::*;
        let n = normalizer();
        let cases: Vec<(PropertyValue, &str)> = vec![
            (
                Title {
                    title: vec![TextSpan::plain("Hello "), TextSpan::plain("World")],
                },
                "Hello World",
            ),
            (
                RichText {
                    rich_text: vec![TextSpan::plain("a"), TextSpan::plain("b")],
                },
                "ab",
            ),
            (Number { number: Some(3.0) }, "3"),
            (Number { number: Some(2.5) }, "2.5"),
            (Number { number: Some(0.1) }, "0.1"),
            (Number { number: Some(-1250000.0) }, "-1250000"),
            (Number { number: Some(1e21) }, "1000000000000000000000"),
            (
                Select {
                    select: Some(SelectOption::named("Reading")),
                },
                "Reading",
            ),
            (
                Status {
                    status: Some(SelectOption::named("Done")),
                },
                "Done",
            ),
            (
                MultiSelect {
                    multi_select: vec![SelectOption::named("rust"), SelectOption::named("db")],
                },
                "rust, db",
            ),
            (
                Date {
                    date: Some(DateValue::at(jan(15, 12))),
                },
                "Mon, 15 Jan 2024 12:00:00 UTC",
            ),
            (
                People {
                    people: vec![User::named("1", "Ada"), User::named("2", "Grace")],
                },
                "Ada, Grace",
            ),
            (
                Files {
                    files: vec![FileRef {
                        name: "report.pdf".to_string(),
                    }],
                },
                "",
            ),
            (Checkbox { checkbox: Some(true) }, "true"),
            (Checkbox { checkbox: Some(false) }, "false"),
            (
                Url {
                    url: Some("https://example.com".to_string()),
                },
                "https://example.com",
            ),
            (
                Email {
                    email: Some("a@b.c".to_string()),
                },
                "a@b.c",
            ),
            (
                PhoneNumber {
                    phone_number: Some("+1 555".to_string()),
                },
                "+1 555",
            ),
            (
                Relation {
                    relation: vec!["abc".to_string()],
                },
                "",
            ),
            (
                CreatedTime {
                    created_time: Some(jan(2, 8)),
                },
                "Tue, 02 Jan 2024 08:00:00 UTC",
            ),
            (
                LastEditedTime {
                    last_edited_time: Some(jan(3, 9)),
                },
                "Wed, 03 Jan 2024 09:00:00 UTC",
            ),
            (
                CreatedBy {
                    created_by: Some(User::named("1", "Ada")),
                },
                "Ada",
            ),
            (
                LastEditedBy {
                    last_edited_by: Some(User::named("2", "Grace")),
                },
                "Grace",
            ),
        ];

        for (value, expected) in cases {
            assert_eq!(n.stringify(&value), expected, "kind {}", value.type_name());
        }
    }

    #[test]
    fn test_date_range_without_zone() {
        let value = DateValue::range(jan(15, 12), jan(16, 13));
        assert_eq!(
            normalizer().format_date(Some(&value)),
            "Mon, 15 Jan 2024 12:00:00 UTC - Tue, 16 Jan 2024 13:00:00 UTC"
        );
    }

    #[test]
    fn test_date_range_follows_viewer_zone() {
        let n = PropertyNormalizer::new(ViewerClock::from_name("Europe/Berlin").unwrap());
        let value = DateValue::range(jan(15, 12), jan(16, 13));
        assert_eq!(
            n.format_date(Some(&value)),
            "Mon, 15 Jan 2024 13:00:00 CET - Tue, 16 Jan 2024 14:00:00 CET"
        );
    }

    #[test]
    fn test_zoned_date_shows_both_ends_in_that_zone() {
        let n = normalizer();

        let range = DateValue::range(jan(15, 12), jan(16, 13)).in_zone("America/New_York");
        assert_eq!(
            n.format_date(Some(&range)),
            "Mon, 15 Jan 2024 07:00:00 EST - Tue, 16 Jan 2024 08:00:00 EST"
        );

        let point = DateValue::at(jan(15, 12)).in_zone("America/New_York");
        assert_eq!(n.format_date(Some(&point)), "Mon, 15 Jan 2024 07:00:00 EST - ");
    }

    #[test]
    fn test_formula_results() {
        let n = normalizer();
        let formula = |result| PropertyValue::Formula {
            formula: Some(result),
        };

        assert_eq!(
            n.stringify(&formula(FormulaResult::Number { number: Some(42.5) })),
            "42.5"
        );
        assert_eq!(
            n.stringify(&formula(FormulaResult::String {
                string: Some("computed".to_string())
            })),
            "computed"
        );
        assert_eq!(
            n.stringify(&formula(FormulaResult::Date {
                date: Some(DateValue::at(jan(15, 12)))
            })),
            "Mon, 15 Jan 2024 12:00:00 UTC"
        );
        assert_eq!(
            n.stringify(&formula(FormulaResult::Boolean {
                boolean: Some(true)
            })),
            ""
        );
    }

    #[test]
    fn test_rollup_array_joins_with_bare_comma() {
        let n = normalizer();
        let inner = |x: f64| PropertyValue::Rollup {
            rollup: Some(RollupResult::Number { number: Some(x) }),
        };
        let value = PropertyValue::Rollup {
            rollup: Some(RollupResult::Array {
                array: vec![inner(3.0), inner(5.0)],
            }),
        };
        assert_eq!(n.stringify(&value), "3,5");
    }

    #[test]
    fn test_rollup_array_recurses_into_mixed_kinds() {
        let n = normalizer();
        let value = PropertyValue::Rollup {
            rollup: Some(RollupResult::Array {
                array: vec![
                    PropertyValue::Title {
                        title: vec![TextSpan::plain("Alpha")],
                    },
                    PropertyValue::MultiSelect {
                        multi_select: vec![SelectOption::named("x"), SelectOption::named("y")],
                    },
                    PropertyValue::Number { number: None },
                    PropertyValue::Rollup {
                        rollup: Some(RollupResult::Array {
                            array: vec![PropertyValue::Number { number: Some(1.0) }],
                        }),
                    },
                ],
            }),
        };
        assert_eq!(n.stringify(&value), "Alpha,x, y,,1");
    }

    #[test]
    fn test_rollup_markers() {
        let n = normalizer();
        assert_eq!(
            n.stringify(&PropertyValue::Rollup {
                rollup: Some(RollupResult::Unsupported)
            }),
            "[Unsupported]"
        );
        assert_eq!(
            n.stringify(&PropertyValue::Rollup {
                rollup: Some(RollupResult::Incomplete)
            }),
            "[Incomplete]"
        );
        assert_eq!(
            n.stringify(&PropertyValue::Rollup {
                rollup: Some(RollupResult::Number { number: Some(7.0) })
            }),
            "7"
        );
        assert_eq!(
            n.stringify(&PropertyValue::Rollup {
                rollup: Some(RollupResult::Date {
                    date: Some(DateValue::at(jan(15, 12)))
                })
            }),
            "Mon, 15 Jan 2024 12:00:00 UTC"
        );
    }
}
