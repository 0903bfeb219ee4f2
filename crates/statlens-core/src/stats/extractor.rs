//! Stat extraction from raw OCR text.

use tracing::{debug, trace};

use crate::models::config::ExtractionConfig;
use crate::models::RecognizedStat;

use super::normalize::normalize_value;
use super::patterns::STAT_PATTERNS;

/// One extracted stat with its location in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct StatMatch {
    /// The normalized stat.
    pub stat: RecognizedStat,
    /// Byte range of the match in the source text.
    pub position: (usize, usize),
    /// Matched source text.
    pub source: String,
}

/// Extracts catalog stats from OCR text.
///
/// Names are tried longest first, canonical spelling before aliases. Every
/// accepted match is blanked out of a working copy of the text so no span is
/// counted twice. Results come back in on-image order.
#[derive(Debug, Clone)]
pub struct StatExtractor {
    shift_families: Vec<String>,
}

impl StatExtractor {
    /// Create an extractor with the default decimal-shift families.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            shift_families: config.decimal_shift_families.clone(),
        }
    }

    /// Replace the decimal-shift families.
    pub fn with_shift_families<I, S>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shift_families = families.into_iter().map(Into::into).collect();
        self
    }

    /// Name fragments that trigger the decimal shift.
    pub fn shift_families(&self) -> &[String] {
        &self.shift_families
    }

    /// Extract stats in on-image order.
    pub fn extract(&self, text: &str) -> Vec<RecognizedStat> {
        self.extract_matches(text)
            .into_iter()
            .map(|m| m.stat)
            .collect()
    }

    /// Extract stats with their positions, in on-image order.
    pub fn extract_matches(&self, text: &str) -> Vec<StatMatch> {
        let mut working = text.to_string();
        let mut matches: Vec<StatMatch> = Vec::new();

        for entry in STAT_PATTERNS.iter() {
            for regex in &entry.patterns {
                let mut from = 0;
                while let Some(caps) = regex.captures_at(&working, from) {
                    let (Some(full), Some(raw)) = (caps.get(0), caps.get(2)) else {
                        break;
                    };

                    let Some((value, is_percentage)) =
                        normalize_value(entry.name, raw.as_str().trim(), &self.shift_families)
                    else {
                        trace!("Skipping degenerate value {:?} for {}", raw.as_str(), entry.name);
                        from = full.end();
                        continue;
                    };

                    let (start, end) = (full.start(), full.end());
                    trace!("Matched {} = {} at {}", entry.name, value, start);

                    matches.push(StatMatch {
                        stat: RecognizedStat::recognized(entry.name, value, is_percentage),
                        position: (start, end),
                        source: full.as_str().to_string(),
                    });

                    // Same byte length keeps every recorded offset valid
                    working.replace_range(start..end, &" ".repeat(end - start));
                    from = 0;
                }
            }
        }

        matches.sort_by_key(|m| m.position.0);
        debug!("Extracted {} stats from {} chars", matches.len(), text.chars().count());
        matches
    }
}

impl Default for StatExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(stats: &[RecognizedStat]) -> Vec<(&str, &str)> {
        stats.iter().map(|s| (s.name.as_str(), s.value.as_str())).collect()
    }

    #[test]
    fn test_longer_name_wins_span() {
        let stats = StatExtractor::new().extract("치명타 저항: 123");
        assert_eq!(pairs(&stats), vec![("치명타 저항", "123")]);
    }

    #[test]
    fn test_alias_reports_canonical_name() {
        let stats = StatExtractor::new().extract("명증 1,300");
        assert_eq!(pairs(&stats), vec![("명중", "1300")]);
        assert!(stats[0].is_recognized);
    }

    #[test]
    fn test_on_image_order() {
        let text = "공격력 1,234 방어력 987\n명중 1300 회피 1200\n치명타 800 치명타 저항 400";
        let stats = StatExtractor::new().extract(text);

        assert_eq!(
            pairs(&stats),
            vec![
                ("공격력", "1234"),
                ("방어력", "987"),
                ("명중", "1300"),
                ("회피", "1200"),
                ("치명타", "800"),
                ("치명타 저항", "400"),
            ]
        );
    }

    #[test]
    fn test_percentages_and_decimal_shift() {
        let stats = StatExtractor::new().extract("전투 속도 242%\n이동 속도 24.2 %");
        assert_eq!(pairs(&stats), vec![("전투 속도", "24.2%"), ("이동 속도", "24.2%")]);
        assert!(stats.iter().all(|s| s.is_percentage));
    }

    #[test]
    fn test_custom_shift_families() {
        let extractor = StatExtractor::new().with_shift_families(Vec::<String>::new());
        let stats = extractor.extract("전투 속도 242%");
        assert_eq!(pairs(&stats), vec![("전투 속도", "242%")]);
    }

    #[test]
    fn test_degenerate_value_skipped_and_scanning_continues() {
        // The first "공격력" has only a separator comma; the second is real
        let stats = StatExtractor::new().extract("공격력 , 공격력 500");
        assert_eq!(pairs(&stats), vec![("공격력", "500")]);
    }

    #[test]
    fn test_noise_between_label_and_value() {
        let stats = StatExtractor::new().extract("후방 방어력 ..... : 2,048");
        assert_eq!(pairs(&stats), vec![("후방 방어력", "2048")]);
    }

    #[test]
    fn test_no_known_names() {
        assert!(StatExtractor::new().extract("random text 123").is_empty());
        assert!(StatExtractor::new().extract("").is_empty());
    }

    #[test]
    fn test_match_positions() {
        let matches = StatExtractor::new().extract_matches("xx 회피 10");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].position.0, 3);
        assert_eq!(matches[0].source, "회피 10");
    }
}
