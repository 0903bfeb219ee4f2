//! Stat sheets: per-category scan results under review.
//!
//! A sheet holds one slot per category. Slots are filled by scans, corrected
//! by hand, and finally flattened into a snapshot for the persistence
//! collaborator (an upsert keyed by character, outside this crate).

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::stats::gap_fill::fill_expected;
use crate::stats::normalize_value;

use super::category::StatCategory;
use super::stat::{MultiScaleOcrResult, RecognizedStat};

/// Result of scanning one category's screenshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotResult {
    /// One entry per expected stat, in catalog order.
    pub stats: Vec<RecognizedStat>,

    /// Raw OCR text kept for diagnostics.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw_text: String,

    /// Per-scale breakdown kept for diagnostics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub per_scale: Vec<MultiScaleOcrResult>,

    /// When the slot was last scanned or edited.
    pub updated_at: Option<DateTime<Utc>>,
}

impl SlotResult {
    /// A slot with every expected stat unrecognized.
    pub fn empty(category: StatCategory) -> Self {
        Self {
            stats: fill_expected(&[], category.expected_stats()),
            raw_text: String::new(),
            per_scale: Vec::new(),
            updated_at: None,
        }
    }
}

/// Per-category results for one character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatSheet {
    slots: BTreeMap<StatCategory, SlotResult>,
}

impl StatSheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a sheet from a saved snapshot.
    ///
    /// Every category gets its full expected shape; stats absent from the
    /// snapshot come back as unrecognized placeholders.
    pub fn from_snapshot(snapshot: &StatSnapshot) -> Self {
        let mut sheet = Self::new();
        for category in StatCategory::ALL {
            let stats = fill_expected(&snapshot.stats, category.expected_stats());
            sheet.slots.insert(
                category,
                SlotResult {
                    stats,
                    raw_text: String::new(),
                    per_scale: Vec::new(),
                    updated_at: Some(snapshot.captured_at),
                },
            );
        }
        sheet
    }

    /// Store a scan result for a category, replacing the previous one.
    pub fn set_slot(&mut self, category: StatCategory, mut result: SlotResult) {
        if result.updated_at.is_none() {
            result.updated_at = Some(Utc::now());
        }
        self.slots.insert(category, result);
    }

    /// Remove a category's result.
    pub fn clear_slot(&mut self, category: StatCategory) -> Option<SlotResult> {
        self.slots.remove(&category)
    }

    /// Result for a category, if scanned.
    pub fn slot(&self, category: StatCategory) -> Option<&SlotResult> {
        self.slots.get(&category)
    }

    /// Manually correct one stat.
    ///
    /// The value is stored in the same normalized form as recognized values
    /// ("1,234" becomes "1234"). A non-empty value marks the entry
    /// recognized; clearing it turns the entry back into a placeholder.
    pub fn edit(
        &mut self,
        category: StatCategory,
        name: &str,
        value: &str,
    ) -> Result<&RecognizedStat, ExtractionError> {
        if !category.expects(name) {
            return Err(ExtractionError::UnknownStat(name.to_string()));
        }

        let value: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        let value = if value.is_empty() {
            value
        } else {
            let normalized = parse_number(&value)
                .and_then(|_| normalize_value(name, &value, &[] as &[&str]));
            match normalized {
                Some((normalized, _)) => normalized,
                None => return Err(ExtractionError::InvalidValue { name: name.to_string(), value }),
            }
        };

        let slot = self
            .slots
            .entry(category)
            .or_insert_with(|| SlotResult::empty(category));
        slot.updated_at = Some(Utc::now());

        let index = match slot.stats.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                slot.stats.push(RecognizedStat::missing(name));
                slot.stats.len() - 1
            }
        };

        let stat = &mut slot.stats[index];
        stat.is_percentage = value.ends_with('%');
        stat.is_recognized = !value.is_empty();
        stat.value = value;

        Ok(&slot.stats[index])
    }

    /// All stats across categories, in panel order.
    pub fn all_stats(&self) -> Vec<RecognizedStat> {
        self.slots
            .values()
            .flat_map(|slot| slot.stats.iter().cloned())
            .collect()
    }

    /// Number of entries with a value.
    pub fn recognized_count(&self) -> usize {
        self.slots
            .values()
            .flat_map(|slot| slot.stats.iter())
            .filter(|s| s.is_recognized && s.has_value())
            .count()
    }

    /// Categories that have at least one stat.
    pub fn completed_slots(&self) -> usize {
        self.slots.values().filter(|s| !s.stats.is_empty()).count()
    }

    /// Flatten into the persistence hand-off shape, keeping only entries with a value.
    pub fn to_snapshot(&self) -> StatSnapshot {
        StatSnapshot {
            captured_at: Utc::now(),
            stats: self.all_stats().into_iter().filter(|s| s.has_value()).collect(),
        }
    }
}

/// Reviewed stats ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSnapshot {
    /// When the snapshot was taken.
    pub captured_at: DateTime<Utc>,

    /// Stats with a value.
    pub stats: Vec<RecognizedStat>,
}

impl StatSnapshot {
    /// Value of a stat, or an empty string.
    pub fn value_of(&self, name: &str) -> &str {
        self.stats
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.value.as_str())
            .unwrap_or("")
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save the snapshot as JSON.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

/// Direction of change against a previous snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Same,
    /// No previous value.
    New,
}

/// One stat compared with its previous value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatDelta {
    pub name: String,
    pub value: String,
    pub previous: String,
    pub trend: Trend,
}

/// Compare current stats with a previous snapshot.
pub fn compare(current: &[RecognizedStat], previous: &StatSnapshot) -> Vec<StatDelta> {
    current
        .iter()
        .map(|stat| {
            let old = previous.value_of(&stat.name);
            StatDelta {
                name: stat.name.clone(),
                value: stat.value.clone(),
                previous: old.to_string(),
                trend: trend(&stat.value, old),
            }
        })
        .collect()
}

/// Full expected shape of every category, filled from a saved snapshot.
pub fn expand_snapshot(snapshot: &StatSnapshot) -> Vec<RecognizedStat> {
    StatSheet::from_snapshot(snapshot).all_stats()
}

/// Classify a value change. Unparseable values count as zero.
pub fn trend(new_value: &str, old_value: &str) -> Trend {
    if old_value.trim().is_empty() {
        return Trend::New;
    }
    if new_value.trim().is_empty() {
        return Trend::Same;
    }

    let new_num = parse_number(new_value).unwrap_or(Decimal::ZERO);
    let old_num = parse_number(old_value).unwrap_or(Decimal::ZERO);

    match new_num.cmp(&old_num) {
        std::cmp::Ordering::Greater => Trend::Up,
        std::cmp::Ordering::Less => Trend::Down,
        std::cmp::Ordering::Equal => Trend::Same,
    }
}

/// Parse a stat value, ignoring thousands separators, `%` and whitespace.
fn parse_number(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, ',' | '%') && !c.is_whitespace())
        .collect();
    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot(stats: &[(&str, &str)]) -> StatSnapshot {
        StatSnapshot {
            captured_at: Utc::now(),
            stats: stats
                .iter()
                .map(|(n, v)| RecognizedStat::recognized(*n, *v, v.ends_with('%')))
                .collect(),
        }
    }

    #[test]
    fn test_trend() {
        assert_eq!(trend("1,200", "1,100"), Trend::Up);
        assert_eq!(trend("24.2%", "25.0%"), Trend::Down);
        assert_eq!(trend("100", "100"), Trend::Same);
        assert_eq!(trend("100", ""), Trend::New);
        assert_eq!(trend("", "100"), Trend::Same);
    }

    #[test]
    fn test_compare_against_snapshot() {
        let previous = snapshot(&[("공격력", "1000"), ("방어력", "900")]);
        let current = vec![
            RecognizedStat::recognized("공격력", "1050", false),
            RecognizedStat::recognized("방어력", "900", false),
            RecognizedStat::recognized("명중", "1300", false),
        ];

        let trends: Vec<Trend> = compare(&current, &previous).into_iter().map(|d| d.trend).collect();
        assert_eq!(trends, vec![Trend::Up, Trend::Same, Trend::New]);
    }

    #[test]
    fn test_edit_marks_recognized() {
        let mut sheet = StatSheet::new();
        let stat = sheet.edit(StatCategory::Basic, "전투 속도", "24.2 %").unwrap().clone();

        assert_eq!(stat.value, "24.2%");
        assert!(stat.is_recognized);
        assert!(stat.is_percentage);

        // Untouched entries stay placeholders
        let slot = sheet.slot(StatCategory::Basic).unwrap();
        assert_eq!(slot.stats.len(), StatCategory::Basic.expected_stats().len());
        assert_eq!(sheet.recognized_count(), 1);
    }

    #[test]
    fn test_edit_normalizes_like_recognized_values() {
        let mut sheet = StatSheet::new();

        let stat = sheet.edit(StatCategory::Basic, "공격력", "1,234").unwrap();
        assert_eq!(stat.value, "1234");
        assert!(!stat.is_percentage);

        let stat = sheet.edit(StatCategory::Basic, "치명타", "12,5%").unwrap();
        assert_eq!(stat.value, "12.5%");
        assert!(stat.is_percentage);

        // No decimal shift for hand-entered values
        let stat = sheet.edit(StatCategory::Basic, "전투 속도", "242%").unwrap();
        assert_eq!(stat.value, "242%");

        let snap = sheet.to_snapshot();
        assert_eq!(snap.value_of("공격력"), "1234");
    }

    #[test]
    fn test_edit_clear_restores_placeholder() {
        let mut sheet = StatSheet::new();
        sheet.edit(StatCategory::Basic, "공격력", "1000").unwrap();
        let stat = sheet.edit(StatCategory::Basic, "공격력", "").unwrap();

        assert!(!stat.is_recognized);
        assert!(stat.value.is_empty());
    }

    #[test]
    fn test_edit_rejects_foreign_stat_and_garbage() {
        let mut sheet = StatSheet::new();
        assert_eq!(
            sheet.edit(StatCategory::Basic, "PVP 명중", "10"),
            Err(ExtractionError::UnknownStat("PVP 명중".to_string()))
        );
        assert!(matches!(
            sheet.edit(StatCategory::Basic, "명중", "abc"),
            Err(ExtractionError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_snapshot_keeps_only_values() {
        let mut sheet = StatSheet::new();
        sheet.edit(StatCategory::Basic, "공격력", "1000").unwrap();
        sheet.edit(StatCategory::Special, "행동력", "120").unwrap();

        let snap = sheet.to_snapshot();
        let names: Vec<&str> = snap.stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["공격력", "행동력"]);
    }

    #[test]
    fn test_from_snapshot_restores_full_shape() {
        let snap = snapshot(&[("공격력", "1000"), ("PVP 회피", "300")]);
        let sheet = StatSheet::from_snapshot(&snap);

        let total: usize = StatCategory::ALL.iter().map(|c| c.expected_stats().len()).sum();
        assert_eq!(sheet.all_stats().len(), total);
        assert_eq!(sheet.recognized_count(), 2);
        assert_eq!(sheet.completed_slots(), 4);
        assert_eq!(expand_snapshot(&snap).len(), total);
    }

    #[test]
    fn test_snapshot_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let snap = snapshot(&[("공격력", "1000")]);
        snap.save(&path).unwrap();
        assert_eq!(StatSnapshot::from_file(&path).unwrap(), snap);
    }
}
