//! Badge evaluation
//!
//! Pure threshold logic, kept free of storage so it can be tested in
//! isolation and re-run from any call site without side effects.

use std::collections::{BTreeMap, BTreeSet};

use crate::lesson::model::BadgeSpec;

/// Compute the badge set earned at `completed_count`.
///
/// A badge is earned once `completed_count >= threshold`. Evaluation is
/// monotonic-additive: every badge in `current` survives even if the
/// document later lowers its totals, and iterating the threshold table in
/// any order yields the same result.
pub fn evaluate(
    completed_count: usize,
    thresholds: &BTreeMap<String, BadgeSpec>,
    current: &BTreeSet<String>,
) -> BTreeSet<String> {
    let mut earned = current.clone();
    for (key, spec) in thresholds {
        if completed_count >= spec.threshold {
            earned.insert(key.clone());
        }
    }
    earned
}

/// Badges newly earned at `completed_count`, in table order
pub fn newly_earned(
    completed_count: usize,
    thresholds: &BTreeMap<String, BadgeSpec>,
    current: &BTreeSet<String>,
) -> Vec<String> {
    thresholds
        .iter()
        .filter(|(key, spec)| completed_count >= spec.threshold && !current.contains(*key))
        .map(|(key, _)| key.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::model::Accent;

    fn spec(threshold: usize) -> BadgeSpec {
        BadgeSpec {
            label: "Badge".into(),
            icon: "★".into(),
            accent: Accent::Neutral,
            threshold,
        }
    }

    fn table() -> BTreeMap<String, BadgeSpec> {
        BTreeMap::from([
            ("starter".to_string(), spec(3)),
            ("explorer".to_string(), spec(6)),
            ("master".to_string(), spec(8)),
        ])
    }

    #[test]
    fn earns_at_threshold_and_above() {
        let earned = evaluate(3, &table(), &BTreeSet::new());
        assert_eq!(earned, BTreeSet::from(["starter".to_string()]));

        let earned = evaluate(9, &table(), &BTreeSet::new());
        assert_eq!(earned.len(), 3);
    }

    #[test]
    fn below_threshold_earns_nothing() {
        assert!(evaluate(2, &table(), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn already_earned_badges_are_never_removed() {
        let current = BTreeSet::from(["master".to_string()]);
        let earned = evaluate(0, &table(), &current);
        assert!(earned.contains("master"));
    }

    #[test]
    fn unreachable_threshold_simply_never_fires() {
        let mut thresholds = table();
        thresholds.insert("impossible".into(), spec(1000));
        let earned = evaluate(10, &thresholds, &BTreeSet::new());
        assert!(!earned.contains("impossible"));
        assert_eq!(earned.len(), 3);
    }

    #[test]
    fn newly_earned_excludes_current() {
        let current = BTreeSet::from(["starter".to_string()]);
        let fresh = newly_earned(6, &table(), &current);
        assert_eq!(fresh, vec!["explorer".to_string()]);
    }

    proptest::proptest! {
        /// The earned set never shrinks as the completed count moves through
        /// any sequence of values
        #[test]
        fn earned_set_only_grows(counts in proptest::collection::vec(0usize..20, 1..20)) {
            let thresholds = table();
            let mut current = BTreeSet::new();
            for count in counts {
                let next = evaluate(count, &thresholds, &current);
                proptest::prop_assert!(next.is_superset(&current));
                current = next;
            }
        }
    }
}
