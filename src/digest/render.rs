use crate::model::{reserved, NormalizedItem};
use crate::normalize::ViewerClock;
use crate::types::Digest;
use handlebars::html_escape;

const LIST_OPEN: &str = "<ol>\n";
const LIST_CLOSE: &str = "</ol>";

/// Renders items as an HTML ordered list, one linked `<li>` per item.
///
/// Titles, URLs and field text are HTML-escaped. An empty slice renders an
/// empty list, never an error.
pub fn render_digest(items: &[NormalizedItem], clock: &ViewerClock) -> Digest {
    let mut html = String::from(LIST_OPEN);
    for item in items {
        render_item(&mut html, item, clock);
    }
    html.push_str(LIST_CLOSE);

    Digest::new(html)
}

/// The link text: the title, or the creation time when there is no title.
pub fn display_text(item: &NormalizedItem, clock: &ViewerClock) -> String {
    if item.title.is_empty() {
        format!("({})", clock.short(item.created_time))
    } else {
        item.title.clone()
    }
}

fn render_item(html: &mut String, item: &NormalizedItem, clock: &ViewerClock) {
    html.push_str(&format!(
        "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
        html_escape(&item.url),
        html_escape(&display_text(item, clock))
    ));

    if let Some(fields) = &item.fields {
        let visible: Vec<_> = fields
            .iter()
            .filter(|(key, _)| !reserved::is_reserved(key))
            .collect();
        if !visible.is_empty() {
            html.push_str("<ul>");
            for (key, value) in visible {
                html.push_str(&format!(
                    "<li><b>{}</b>: {}</li>",
                    html_escape(key),
                    html_escape(value)
                ));
            }
            html.push_str("</ul>");
        }
    }

    html.push_str("</li>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldMap;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn created() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(
            render_digest(&[], &ViewerClock::utc()).as_str(),
            "<ol>\n</ol>"
        );
    }

    #[test]
    fn test_single_item() {
        let items = [NormalizedItem::new("1", "A", "http://x", created())];
        assert_eq!(
            render_digest(&items, &ViewerClock::utc()).as_str(),
            "<ol>\n<li><a href=\"http://x\" target=\"_blank\" rel=\"noopener noreferrer\">A</a></li>\n</ol>"
        );
    }

    #[test]
    fn test_items_keep_input_order() {
        let items = [
            NormalizedItem::new("1", "First", "http://a", created()),
            NormalizedItem::new("2", "Second", "http://b", created()),
        ];
        let html = render_digest(&items, &ViewerClock::utc()).into_string();
        let first = html.find("First").unwrap();
        let second = html.find("Second").unwrap();
        assert!(first < second);
        assert_eq!(html.matches("<li>").count(), 2);
    }

    #[test]
    fn test_title_and_url_are_escaped() {
        let items = [NormalizedItem::new(
            "1",
            "<script>alert(\"x\")</script> & more",
            "http://x/?a=1&b=\"2\"",
            created(),
        )];
        let html = render_digest(&items, &ViewerClock::utc()).into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; more"));
        assert!(html.contains("a&#x3D;1&amp;b&#x3D;&quot;2&quot;"));
    }

    #[test]
    fn test_untitled_item_shows_creation_time() {
        let items = [NormalizedItem::new("1", "", "http://x", created())];
        let html = render_digest(&items, &ViewerClock::utc()).into_string();
        assert!(html.contains(">(15 Jan 24 12:00 UTC)</a>"));
    }

    #[test]
    fn test_field_dump_lists_user_fields_only() {
        let mut fields = FieldMap::new();
        fields.insert("Status".to_string(), "Done".to_string());
        fields.insert("Amount".to_string(), "3 < 4".to_string());
        fields.insert("__id".to_string(), "1".to_string());
        fields.insert("__url".to_string(), "http://x".to_string());
        let items = [NormalizedItem::new("1", "", "http://x", created()).with_fields(fields)];

        let html = render_digest(&items, &ViewerClock::utc()).into_string();
        assert_eq!(
            html,
            "<ol>\n<li><a href=\"http://x\" target=\"_blank\" rel=\"noopener noreferrer\">(15 Jan 24 12:00 UTC)</a>\
             <ul><li><b>Amount</b>: 3 &lt; 4</li><li><b>Status</b>: Done</li></ul></li>\n</ol>"
        );
    }
}
