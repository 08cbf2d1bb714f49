use crate::model::{IgnoreRule, NormalizedItem};

/// Drops every item the rule excludes, keeping the rest in input order.
pub fn filter_items(items: Vec<NormalizedItem>, rule: &IgnoreRule) -> Vec<NormalizedItem> {
    let before = items.len();
    let kept: Vec<NormalizedItem> = items.into_iter().filter(|item| !rule.excludes(item)).collect();

    if kept.len() != before {
        log::debug!("Ignore rule dropped {} of {} items", before - kept.len(), before);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, 0, 0, 0).unwrap()
    }

    fn item(id: &str, created: u32, tags: &[&str]) -> NormalizedItem {
        NormalizedItem::new(id, id, "https://x", day(created)).with_tags(tags.iter().copied())
    }

    fn ids(items: &[NormalizedItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_empty_rule_keeps_everything_in_order() {
        let items = vec![item("c", 3, &[]), item("a", 1, &["x"]), item("b", 2, &[])];
        let kept = filter_items(items, &IgnoreRule::default());
        assert_eq!(ids(&kept), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_tags_and_cutoff_both_apply() {
        let rule = IgnoreRule::new(["gister:ignore", "draft"]).with_cutoff(day(10));
        let items = vec![
            item("old", 9, &[]),
            item("fresh", 10, &["work"]),
            item("ignored", 12, &["work", "gister:ignore"]),
            item("draft", 15, &["draft"]),
            item("newest", 20, &[]),
        ];

        let kept = filter_items(items, &rule);
        assert_eq!(ids(&kept), vec!["fresh", "newest"]);
    }

    #[test]
    fn test_survivors_never_violate_the_rule() {
        let rule = IgnoreRule::new(["skip"]).with_cutoff(day(5));
        let items: Vec<_> = (1..=28)
            .map(|d| {
                let tags: &[&str] = if d % 3 == 0 { &["skip"] } else { &["keep"] };
                item(&format!("i{}", d), d, tags)
            })
            .collect();
        let input_order = ids(&items).into_iter().map(String::from).collect::<Vec<_>>();

        let kept = filter_items(items, &rule);

        for survivor in &kept {
            assert!(survivor.created_time >= day(5));
            assert!(!survivor.tags.contains("skip"));
        }
        let positions: Vec<usize> = kept
            .iter()
            .map(|k| input_order.iter().position(|id| *id == k.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_items(vec![], &IgnoreRule::new(["x"])).is_empty());
    }
}
