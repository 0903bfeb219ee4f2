//! Multi-scale majority voting.

use tracing::debug;

use crate::models::{MultiScaleOcrResult, RecognizedStat};

/// Merge per-scale results by plurality vote.
///
/// For every stat name in the union of all scales (first-appearance order),
/// each scale contributes its first non-empty value for that name. The most
/// frequent value wins; ties go to the value seen first, so with results in
/// scale order the lowest scale breaks ties. The merged entry is a
/// percentage if any contributing scale said so.
pub fn merge_by_majority(results: &[MultiScaleOcrResult]) -> Vec<RecognizedStat> {
    let mut names: Vec<&str> = Vec::new();
    for result in results {
        for stat in &result.stats {
            if !names.contains(&stat.name.as_str()) {
                names.push(&stat.name);
            }
        }
    }

    let mut merged = Vec::with_capacity(names.len());

    for name in names {
        let mut tally: Vec<(&str, usize)> = Vec::new();
        let mut is_percentage = false;

        for result in results {
            let Some(stat) = result.stats.iter().find(|s| s.name == name && s.has_value()) else {
                continue;
            };
            is_percentage |= stat.is_percentage;
            match tally.iter_mut().find(|(v, _)| *v == stat.value) {
                Some((_, count)) => *count += 1,
                None => tally.push((&stat.value, 1)),
            }
        }

        let mut winner: Option<(&str, usize)> = None;
        for &(value, count) in &tally {
            if winner.is_none_or(|(_, best)| count > best) {
                winner = Some((value, count));
            }
        }

        let Some((value, votes)) = winner else {
            continue;
        };
        if tally.len() > 1 {
            debug!("Scales disagree on {}: {:?}, picked {} ({} votes)", name, tally, value, votes);
        }

        merged.push(RecognizedStat::recognized(name, value, is_percentage));
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scale(scale: u32, stats: &[(&str, &str)]) -> MultiScaleOcrResult {
        MultiScaleOcrResult {
            scale,
            stats: stats
                .iter()
                .map(|(n, v)| RecognizedStat::recognized(*n, *v, v.ends_with('%')))
                .collect(),
            raw_text: String::new(),
        }
    }

    fn votes(values: [&str; 4]) -> String {
        let results: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, v)| scale(i as u32 + 1, &[("공격력", v)]))
            .collect();
        merge_by_majority(&results)[0].value.clone()
    }

    #[test]
    fn test_majority_wins() {
        assert_eq!(votes(["100", "100", "101", "102"]), "100");
        assert_eq!(votes(["101", "100", "102", "100"]), "100");
    }

    #[test]
    fn test_tie_goes_to_first_scale() {
        assert_eq!(votes(["100", "101", "102", "103"]), "100");
        assert_eq!(votes(["101", "100", "100", "101"]), "101");
    }

    #[test]
    fn test_union_of_names_in_first_appearance_order() {
        let results = vec![
            scale(1, &[("공격력", "100")]),
            scale(2, &[("방어력", "90"), ("공격력", "100")]),
            scale(3, &[]),
            scale(4, &[("명중", "50")]),
        ];

        let names: Vec<String> = merge_by_majority(&results).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["공격력", "방어력", "명중"]);
    }

    #[test]
    fn test_percentage_if_any_scale_marked() {
        let results = vec![
            scale(1, &[("전투 속도", "24.2")]),
            scale(2, &[("전투 속도", "24.2%")]),
            scale(3, &[("전투 속도", "24.2")]),
        ];

        let merged = merge_by_majority(&results);
        assert_eq!(merged[0].value, "24.2");
        assert!(merged[0].is_percentage);
        assert!(merged[0].is_recognized);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_by_majority(&[]).is_empty());
    }
}
