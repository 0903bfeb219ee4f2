//! Canonical stat names and known OCR misreadings.

/// Every stat the extractor recognizes, in panel order.
pub const KNOWN_STAT_NAMES: &[&str] = &[
    "공격력", "방어력", "명중", "회피", "치명타", "치명타 저항",
    "생명력", "정신력", "전투 속도", "이동 속도",
    "관통", "봉혼석 추가 피해", "치명타 공격력", "치명타 방어력",
    "후방 공격력", "후방 방어력", "피해 증폭", "피해 내성",
    "무기 피해 증폭", "무기 피해 내성", "치명타 피해 증폭", "치명타 피해 내성",
    "후방 피해 증폭", "후방 피해 내성",
    "다단 히트 적중", "다단 히트 저항", "후방 치명타", "후방 치명타 저항",
    "막기 관통", "막기", "철벽 관통", "철벽", "재생 관통", "재생",
    "완벽", "완벽 저항", "강타", "강타 저항",
    "PVP 공격력", "PVP 방어력", "PVP 피해 증폭", "PVP 피해 내성",
    "PVP 명중", "PVP 회피", "PVP 치명타", "PVP 치명타 저항",
    "PVE 공격력", "PVE 방어력", "PVE 피해 증폭", "PVE 피해 내성",
    "PVE 명중", "PVE 회피",
    "보스 공격력", "보스 방어력", "보스 피해 증폭", "보스 피해 내성",
    "질주 속도", "비행 속도", "탑승물 지상 이동 속도", "탑승물 질주 행동력 소모",
    "치유 증폭", "받는 치유량", "재사용 시간", "적대치 획득량",
    "행동력", "비행력",
    "전투 생명력 자연 회복", "비전투 생명력 자연 회복", "생명력 물약 회복 증가", "생명력 물약 회복",
    "전투 정신력 자연 회복", "비전투 정신력 자연 회복", "정신력 소모량", "정신력 획득 증가",
    "전투 행동력 자연 회복", "비전투 행동력 자연 회복",
    "전투 비행력 자연 회복", "비전투 비행력 자연 회복",
];

/// Misreadings observed in real screenshots, keyed by canonical name.
///
/// Whitespace inside an alias is ignored by the matcher, so spaced and
/// unspaced spellings are listed only where the source text differs in
/// other ways.
pub const STAT_ALIASES: &[(&str, &[&str])] = &[
    ("명중", &["명증", "멍중", "영중", "몀중", "명 중", "띵중", "명:중", "[ [그", "[[그", "[ [ 그", "[- [그", "[-[그", "[―[그"]),
    ("치명타", &["치면타", "치멍타", "차명타", "치영타", "치 1 명타", "치:명타", "치명", "XIE", "xie"]),
    ("공격력", &["공걱력", "공격럭"]),
    ("방어력", &["방어럭", "방이력"]),
    ("회피", &["회 피", "화피", "회:피"]),
    ("생명력", &["생명럭", "상명력"]),
    ("정신력", &["정신럭", "점신력"]),
    ("전투 속도", &["전투속도", "전투 소도", "전투 쇽도"]),
    ("이동 속도", &["이동속도", "이동 소도"]),
    ("철벽", &["HY", "hy", "H Y", "h y", "철 벽", "Hy", "hY"]),
    ("PVP 회피", &["pvp 2m", "pvp 2 m", "pvp2m"]),
    ("봉혼석 추가 피해", &["BEA", "bea", "BEA 추가 피해", "bea 추가 피해", "BEA추가피해"]),
    ("탑승물 질주 행동력 소모", &["탑승물 질주 행동력 소", "탑승물 질주 행동력 소..."]),
    ("행동력", &["행통력", "행 동 력", "행 통 력"]),
    ("전투 행동력 자연 회복", &["전투 행통력 자연 회복", "전투 행통력 자연회복"]),
    ("비전투 행동력 자연 회복", &["비전투 행통력 자연 회복", "비전투 행통력 자연회복"]),
    // Read as digits and brackets
    ("강타", &["[2131", "[2137", "[213", "강 타", "2131", "2137", "감타", "강터"]),
    ("강타 저항", &["강타저항", "강타 저향", "강타저향"]),
    ("완벽 저항", &["완벽저항", "완벽 저향", "완벽저향"]),
    ("막기 관통", &["막기관통", "막기 관퉁"]),
    ("재생 관통", &["재생관통", "재생 관퉁", "재생관퉁"]),
    ("철벽 관통", &["철벽관통", "철벽 관퉁"]),
    ("후방 방어력", &["후방방어력"]),
    ("후방 치명타 저항", &["후방치명타저항", "후방 치명타저항", "후방치명타 저항"]),
    ("PVE 피해 내성", &["PVE 피해내성", "PVE피해내성", "PVE피해 내성"]),
    ("PVP 치명타 저항", &["PVP X|HEF XE", "PVP XIHEF XE", "PVP X|HEFXE", "PVPX|HEFXE", "PVP치명타저항"]),
    ("PVP 방어력", &["PVP 방어럭", "PVP방어력"]),
    ("PVE 방어력", &["PVE ¥0jY", "PVE¥0jY", "PVE 방어럭", "PVE방어력"]),
    ("PVE 회피", &["PVE 8a", "PVE8a", "PVE 8A", "PVE8A", "PVE 20|", "PVE20|", "PVE 2이", "PVE2이"]),
    ("보스 방어력", &["보스 방어럭", "보스방어력"]),
    ("보스 피해 내성", &["2A 피해 내성", "2A피해내성", "2A 피해내성", "보스피해내성", "보스 피해내성"]),
];

/// Registered misreadings of `name`, empty if there are none.
pub fn aliases(name: &str) -> &'static [&'static str] {
    STAT_ALIASES
        .iter()
        .find(|(canonical, _)| *canonical == name)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// Whether `name` is a canonical stat name.
pub fn is_known(name: &str) -> bool {
    KNOWN_STAT_NAMES.contains(&name)
}

/// Canonical name for a literal that is either a canonical name or an alias.
pub fn canonical_name(literal: &str) -> Option<&'static str> {
    if let Some(name) = KNOWN_STAT_NAMES.iter().find(|n| **n == literal) {
        return Some(name);
    }
    STAT_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&literal))
        .map(|(canonical, _)| *canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatCategory;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_matches_categories() {
        let known: HashSet<&str> = KNOWN_STAT_NAMES.iter().copied().collect();
        let expected: HashSet<&str> = StatCategory::ALL
            .iter()
            .flat_map(|c| c.expected_stats().iter().copied())
            .collect();

        assert_eq!(KNOWN_STAT_NAMES.len(), 78);
        assert_eq!(known.len(), KNOWN_STAT_NAMES.len());
        assert_eq!(known, expected);
    }

    #[test]
    fn test_aliases_keyed_by_known_names() {
        for (canonical, _) in STAT_ALIASES {
            assert!(is_known(canonical), "alias key {} not in catalog", canonical);
        }
    }

    #[test]
    fn test_alias_lookup() {
        assert!(aliases("명중").contains(&"명증"));
        assert!(aliases("관통").is_empty());
        assert_eq!(canonical_name("명증"), Some("명중"));
        assert_eq!(canonical_name("치명타 저항"), Some("치명타 저항"));
        assert_eq!(canonical_name("없음"), None);
    }
}
