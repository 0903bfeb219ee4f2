//! Compiled stat-name patterns.

use lazy_static::lazy_static;
use regex::Regex;

use super::catalog::{aliases, KNOWN_STAT_NAMES};

/// Noise OCR inserts between the characters of a label.
const NAME_NOISE: &str = r"[\s._|\[\]]*";

/// Skip separators (anything but digits, Hangul and `-`), then capture a number.
const VALUE_TAIL: &str = r"[^0-9가-힣\-]*?(-?[0-9,]+\.?[0-9]*\s*%?)";

/// Patterns for one canonical stat.
#[derive(Debug)]
pub struct StatPattern {
    /// Canonical name reported for every match.
    pub name: &'static str,
    /// One pattern per literal: the canonical spelling first, then aliases.
    pub patterns: Vec<Regex>,
}

lazy_static! {
    /// All catalog patterns, longest canonical name first.
    ///
    /// The sort is stable, so names of equal length keep catalog order.
    pub static ref STAT_PATTERNS: Vec<StatPattern> = {
        let mut names: Vec<&'static str> = KNOWN_STAT_NAMES.to_vec();
        names.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        names
            .into_iter()
            .map(|name| StatPattern {
                name,
                patterns: std::iter::once(name)
                    .chain(aliases(name).iter().copied())
                    .map(|literal| build_pattern(literal).unwrap())
                    .collect(),
            })
            .collect()
    };
}

/// Tolerant pattern for a label literal.
///
/// Whitespace in the literal is dropped and any run of [`NAME_NOISE`] is
/// allowed between the remaining characters. Group 1 is the label, group 2
/// the raw value.
pub fn build_pattern(literal: &str) -> Result<Regex, regex::Error> {
    let name = literal
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| regex::escape(&c.to_string()))
        .collect::<Vec<_>>()
        .join(NAME_NOISE);

    Regex::new(&format!("({}){}", name, VALUE_TAIL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_names_first() {
        let lengths: Vec<usize> = STAT_PATTERNS.iter().map(|p| p.name.chars().count()).collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));

        let pos = |name: &str| STAT_PATTERNS.iter().position(|p| p.name == name).unwrap();
        assert!(pos("치명타 저항") < pos("치명타"));
        assert!(pos("PVP 치명타 저항") < pos("치명타 저항"));
    }

    #[test]
    fn test_canonical_spelling_first() {
        let pattern = STAT_PATTERNS.iter().find(|p| p.name == "명중").unwrap();
        assert_eq!(pattern.patterns.len(), 1 + aliases("명중").len());
        assert!(pattern.patterns[0].is_match("명중 1300"));
    }

    #[test]
    fn test_pattern_tolerates_noise() {
        let regex = build_pattern("치명타 저항").unwrap();

        let caps = regex.captures("치 명.타|저항 : 123").unwrap();
        assert_eq!(&caps[2], "123");

        let caps = regex.captures("치명타저항 24.5 %").unwrap();
        assert_eq!(&caps[2], "24.5 %");
    }

    #[test]
    fn test_pattern_stops_at_hangul() {
        // A value must not be borrowed across another label
        let regex = build_pattern("막기").unwrap();
        assert!(regex.captures("막기 관통 12").is_none());
    }

    #[test]
    fn test_alias_with_metacharacters() {
        let regex = build_pattern("PVP X|HEF XE").unwrap();
        assert!(regex.is_match("PVP X|HEF XE 15"));
        assert!(!regex.is_match("PVP X 15"));
    }
}
