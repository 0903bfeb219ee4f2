//! Stat categories and their expected stat lists.
//!
//! Each category corresponds to one screenshot of the in-game stat panel.
//! The expected list is the contract for gap filling and never changes at
//! runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

const BASIC_STATS: &[&str] = &[
    "공격력", "방어력",
    "명중", "회피",
    "치명타", "치명타 저항",
    "생명력", "정신력",
    "전투 속도", "이동 속도",
];

const COMBAT_STATS: &[&str] = &[
    // 전투
    "관통", "봉혼석 추가 피해",
    "치명타 공격력", "치명타 방어력",
    "후방 공격력", "후방 방어력",
    "피해 증폭", "피해 내성",
    "무기 피해 증폭", "무기 피해 내성",
    "치명타 피해 증폭", "치명타 피해 내성",
    "후방 피해 증폭", "후방 피해 내성",
    // 판정
    "다단 히트 적중", "다단 히트 저항",
    "후방 치명타", "후방 치명타 저항",
    "막기 관통", "막기",
    "철벽 관통", "철벽",
    "재생 관통", "재생",
    "완벽", "완벽 저항",
    "강타", "강타 저항",
];

const PVP_PVE_STATS: &[&str] = &[
    "PVP 공격력", "PVP 방어력",
    "PVP 피해 증폭", "PVP 피해 내성",
    "PVP 명중", "PVP 회피",
    "PVP 치명타", "PVP 치명타 저항",
    "PVE 공격력", "PVE 방어력",
    "PVE 명중", "PVE 회피",
    "PVE 피해 증폭", "PVE 피해 내성",
    "보스 공격력", "보스 방어력",
    "보스 피해 증폭", "보스 피해 내성",
];

const SPECIAL_STATS: &[&str] = &[
    // 특수
    "질주 속도", "비행 속도",
    "탑승물 지상 이동 속도", "탑승물 질주 행동력 소모",
    "치유 증폭", "받는 치유량",
    "재사용 시간", "적대치 획득량",
    // 자원
    "행동력", "비행력",
    "전투 생명력 자연 회복", "비전투 생명력 자연 회복",
    "생명력 물약 회복", "생명력 물약 회복 증가",
    "전투 정신력 자연 회복", "비전투 정신력 자연 회복",
    "정신력 소모량", "정신력 획득 증가",
    "전투 행동력 자연 회복", "비전투 행동력 자연 회복",
    "전투 비행력 자연 회복", "비전투 비행력 자연 회복",
];

/// A named region of the stat panel with its own screenshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatCategory {
    /// 주요능력치: attack, defense, accuracy, speeds.
    #[serde(rename = "basic")]
    Basic,
    /// 전투/판정: penetration, amplification, judgement stats.
    #[serde(rename = "combat")]
    Combat,
    /// PVP/PVE and boss stats.
    #[serde(rename = "pvpPve")]
    PvpPve,
    /// 특수/자원: mount, healing, resource regeneration.
    #[serde(rename = "special")]
    Special,
}

impl StatCategory {
    /// All categories in panel order.
    pub const ALL: [StatCategory; 4] = [
        StatCategory::Basic,
        StatCategory::Combat,
        StatCategory::PvpPve,
        StatCategory::Special,
    ];

    /// Stable identifier used in configs, CLI flags and JSON.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Combat => "combat",
            Self::PvpPve => "pvpPve",
            Self::Special => "special",
        }
    }

    /// Display label as shown in the game UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Basic => "주요능력치",
            Self::Combat => "전투/판정",
            Self::PvpPve => "PVP/PVE",
            Self::Special => "특수/자원",
        }
    }

    /// Short hint of what the screenshot should contain.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Basic => "공격력, 방어력, 명중 등",
            Self::Combat => "관통, 피해 증폭, 다단 히트 등",
            Self::PvpPve => "PVP, PVE, 보스 피해 등",
            Self::Special => "행동력, 비행력, 회복 등",
        }
    }

    /// Ordered list of stats expected in this category's screenshot.
    pub fn expected_stats(&self) -> &'static [&'static str] {
        match self {
            Self::Basic => BASIC_STATS,
            Self::Combat => COMBAT_STATS,
            Self::PvpPve => PVP_PVE_STATS,
            Self::Special => SPECIAL_STATS,
        }
    }

    /// Whether `name` belongs to this category.
    pub fn expects(&self, name: &str) -> bool {
        self.expected_stats().contains(&name)
    }

    /// Look up a category by identifier.
    ///
    /// Accepts the canonical id and the kebab/snake spellings used on the
    /// command line (`pvp-pve`, `pvp_pve`).
    pub fn from_id(id: &str) -> Result<Self, ExtractionError> {
        match id.trim() {
            "basic" => Ok(Self::Basic),
            "combat" => Ok(Self::Combat),
            "pvpPve" | "pvp-pve" | "pvp_pve" | "pvppve" => Ok(Self::PvpPve),
            "special" => Ok(Self::Special),
            other => Err(ExtractionError::UnknownCategory(other.to_string())),
        }
    }

    /// Category whose expected list contains `name`.
    pub fn category_of(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.expects(name))
    }
}

impl fmt::Display for StatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StatCategory {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}
