//! Read-only aggregates over conversation history, handed to whatever draws
//! the charts. Each function takes any iterator of entries so the same code
//! serves the global view and the per-contact view.

use std::collections::BTreeMap;

use crate::models::{Category, ConversationEntry};

/// Importance at or above which a topic counts as important
pub const IMPORTANT_THRESHOLD: u8 = 4;

/// Sum of importance per category
pub fn importance_by_category<'a>(
    entries: impl IntoIterator<Item = &'a ConversationEntry>,
) -> BTreeMap<Category, u32> {
    let mut totals = BTreeMap::new();
    for entry in entries {
        for (category, note) in &entry.topics {
            *totals.entry(*category).or_insert(0) += u32::from(note.importance.get());
        }
    }
    totals
}

/// Number of entries that discussed each category
pub fn topic_counts<'a>(
    entries: impl IntoIterator<Item = &'a ConversationEntry>,
) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        for category in entry.topics.keys() {
            *counts.entry(*category).or_insert(0) += 1;
        }
    }
    counts
}

/// Details of every topic with importance >= [`IMPORTANT_THRESHOLD`], grouped
/// by category in recording order
pub fn important_details<'a>(
    entries: impl IntoIterator<Item = &'a ConversationEntry>,
) -> BTreeMap<Category, Vec<String>> {
    let mut important: BTreeMap<Category, Vec<String>> = BTreeMap::new();
    for entry in entries {
        for (category, note) in &entry.topics {
            if note.importance.get() >= IMPORTANT_THRESHOLD {
                important
                    .entry(*category)
                    .or_default()
                    .push(note.details.clone());
            }
        }
    }
    important
}

/// Number of entries per date label
pub fn entries_per_date<'a>(
    entries: impl IntoIterator<Item = &'a ConversationEntry>,
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.date.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Importance, TopicNote};

    fn entry(date: &str, topics: &[(Category, u8, &str)]) -> ConversationEntry {
        let topics = topics
            .iter()
            .map(|(c, i, d)| (*c, TopicNote::new(Importance::new(*i).unwrap(), *d)))
            .collect();
        ConversationEntry::new(date, topics)
    }

    fn sample() -> Vec<ConversationEntry> {
        vec![
            entry("2024-09-01", &[(Category::Work, 4, "new manager"), (Category::Hobby, 2, "tennis")]),
            entry("2024-09-01", &[(Category::Work, 5, "promotion")]),
            entry("2024-09-15", &[(Category::Health, 3, "back pain")]),
            entry("2024-09-20", &[]),
        ]
    }

    #[test]
    fn test_importance_by_category() {
        let entries = sample();
        let totals = importance_by_category(&entries);
        assert_eq!(totals.get(&Category::Work), Some(&9));
        assert_eq!(totals.get(&Category::Hobby), Some(&2));
        assert_eq!(totals.get(&Category::Health), Some(&3));
        assert_eq!(totals.get(&Category::Romance), None);
    }

    #[test]
    fn test_topic_counts() {
        let entries = sample();
        let counts = topic_counts(&entries);
        assert_eq!(counts.get(&Category::Work), Some(&2));
        assert_eq!(counts.get(&Category::Hobby), Some(&1));
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn test_important_details() {
        let entries = sample();
        let important = important_details(&entries);
        assert_eq!(
            important.get(&Category::Work),
            Some(&vec!["new manager".to_string(), "promotion".to_string()])
        );
        assert!(!important.contains_key(&Category::Health));
        assert!(!important.contains_key(&Category::Hobby));
    }

    #[test]
    fn test_entries_per_date() {
        let entries = sample();
        let per_date = entries_per_date(&entries);
        assert_eq!(per_date.get("2024-09-01"), Some(&2));
        assert_eq!(per_date.get("2024-09-20"), Some(&1));
        assert_eq!(per_date.len(), 3);
    }

    #[test]
    fn test_empty_history() {
        let entries: Vec<ConversationEntry> = Vec::new();
        assert!(importance_by_category(&entries).is_empty());
        assert!(topic_counts(&entries).is_empty());
        assert!(important_details(&entries).is_empty());
        assert!(entries_per_date(&entries).is_empty());
    }
}
