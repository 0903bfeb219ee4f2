//! Completing results against a category's expected stats.

use tracing::debug;

use crate::models::{RecognizedStat, StatCategory};

/// One entry per expected stat of `category`, in catalog order.
///
/// Recognized stats are kept as they are; expected stats nobody found become
/// unrecognized placeholders. Stats outside the category are dropped and
/// logged.
pub fn fill_missing_stats(stats: &[RecognizedStat], category: StatCategory) -> Vec<RecognizedStat> {
    let dropped: Vec<&str> = stats
        .iter()
        .filter(|s| !category.expects(&s.name))
        .map(|s| s.name.as_str())
        .collect();
    if !dropped.is_empty() {
        debug!("Dropping stats outside {}: {}", category, dropped.join(", "));
    }

    fill_expected(stats, category.expected_stats())
}

/// Shape `stats` to exactly the `expected` names, in order.
pub fn fill_expected(stats: &[RecognizedStat], expected: &[&str]) -> Vec<RecognizedStat> {
    expected
        .iter()
        .map(|name| {
            stats
                .iter()
                .find(|s| s.name == *name)
                .cloned()
                .unwrap_or_else(|| RecognizedStat::missing(*name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_matches_expected_list() {
        for category in StatCategory::ALL {
            let expected = category.expected_stats();

            // Nothing recognized
            let empty = fill_missing_stats(&[], category);
            assert_eq!(empty.len(), expected.len());
            assert!(empty.iter().all(|s| !s.is_recognized && s.value.is_empty()));

            // Everything recognized, in reverse order
            let all: Vec<RecognizedStat> = expected
                .iter()
                .rev()
                .map(|n| RecognizedStat::recognized(*n, "1", false))
                .collect();
            let full = fill_missing_stats(&all, category);
            let names: Vec<&str> = full.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, expected);
            assert!(full.iter().all(|s| s.is_recognized));
        }
    }

    #[test]
    fn test_out_of_category_stats_dropped() {
        let stats = vec![
            RecognizedStat::recognized("공격력", "1000", false),
            RecognizedStat::recognized("PVP 명중", "300", false),
        ];

        let filled = fill_missing_stats(&stats, StatCategory::Basic);
        assert!(filled.iter().all(|s| s.name != "PVP 명중"));
        assert_eq!(filled[0].value, "1000");
        assert_eq!(filled.iter().filter(|s| s.is_recognized).count(), 1);
    }
}
