//! Per-run tracking of vendor contacts already seen.

use std::collections::{HashMap, HashSet};

/// Emails seen during one scrape run and how often each repeated.
/// Dropped with the run; nothing here is persisted.
#[derive(Debug, Default)]
pub struct RunDeduplicator {
    seen: HashSet<String>,
    duplicates: HashMap<String, u32>,
}

impl RunDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when `email` was already seen this run. The first sighting is
    /// recorded and returns `false`. A missing or blank email is never a
    /// duplicate and is not recorded.
    pub fn seen(&mut self, email: Option<&str>) -> bool {
        let Some(email) = email.map(|e| e.trim().to_lowercase()) else {
            return false;
        };
        if email.is_empty() {
            return false;
        }

        if self.seen.contains(&email) {
            *self.duplicates.entry(email).or_insert(0) += 1;
            return true;
        }

        self.seen.insert(email);
        false
    }

    /// Repeat count for `email` (0 when it never repeated).
    pub fn duplicate_count(&self, email: &str) -> u32 {
        self.duplicates
            .get(&email.trim().to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    pub fn unique_count(&self) -> usize {
        self.seen.len()
    }

    /// Up to `limit` repeated emails, most repeats first, ties by address.
    pub fn top_duplicates(&self, limit: usize) -> Vec<(String, u32)> {
        let mut entries: Vec<(String, u32)> = self
            .duplicates
            .iter()
            .map(|(email, count)| (email.clone(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(limit);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sighting_is_not_duplicate() {
        let mut dedup = RunDeduplicator::new();
        assert!(!dedup.seen(Some("hr@vendor.com")));
        assert_eq!(dedup.duplicate_count("hr@vendor.com"), 0);
        assert_eq!(dedup.unique_count(), 1);
    }

    #[test]
    fn test_repeat_is_normalized_and_counted() {
        let mut dedup = RunDeduplicator::new();
        assert!(!dedup.seen(Some("hr@vendor.com")));
        assert!(dedup.seen(Some("  HR@Vendor.com ")));
        assert!(dedup.seen(Some("hr@vendor.com")));
        assert_eq!(dedup.duplicate_count("hr@vendor.com"), 2);
        assert_eq!(dedup.unique_count(), 1);
    }

    #[test]
    fn test_missing_email_never_duplicate() {
        let mut dedup = RunDeduplicator::new();
        assert!(!dedup.seen(None));
        assert!(!dedup.seen(None));
        assert!(!dedup.seen(Some("   ")));
        assert!(!dedup.seen(Some("")));
        assert_eq!(dedup.unique_count(), 0);
        assert!(dedup.top_duplicates(10).is_empty());
    }

    #[test]
    fn test_top_duplicates_ordering() {
        let mut dedup = RunDeduplicator::new();
        for email in ["b@x.com", "a@x.com", "c@x.com"] {
            dedup.seen(Some(email));
        }
        dedup.seen(Some("c@x.com"));
        dedup.seen(Some("c@x.com"));
        dedup.seen(Some("b@x.com"));
        dedup.seen(Some("a@x.com"));

        assert_eq!(
            dedup.top_duplicates(10),
            vec![
                ("c@x.com".to_string(), 2),
                ("a@x.com".to_string(), 1),
                ("b@x.com".to_string(), 1),
            ]
        );
        assert_eq!(dedup.top_duplicates(1).len(), 1);
    }
}
