// src/config/codes.rs
//
// User-facing code tables of the search form. Both tables are shown to users
// and sent verbatim to the remote service, so entries must not be reordered
// or renamed.

use chrono::{Days, Months, NaiveDate};

/// `bidType` codes (公告类型).
pub const BID_TYPES: [(u8, &str); 13] = [
    (0, "所有"),
    (1, "公开招标"),
    (2, "询价公告"),
    (3, "竞争性谈判"),
    (4, "单一来源"),
    (5, "资格预审"),
    (6, "邀请公告"),
    (7, "中标公告"),
    (8, "更正公告"),
    (9, "其他公告"),
    (10, "竞争性磋商"),
    (11, "成交公告"),
    (12, "废标公告"),
];

pub const UNKNOWN_BID_TYPE: &str = "未知类型";

/// `zoneId` codes (区域). 全国 sends an empty zone.
pub const ZONES: [(&str, &str); 32] = [
    ("全国", ""),
    ("北京", "11"), ("天津", "12"), ("河北", "13"), ("山西", "14"), ("内蒙古", "15"),
    ("辽宁", "21"), ("吉林", "22"), ("黑龙江", "23"),
    ("上海", "31"), ("江苏", "32"), ("浙江", "33"), ("安徽", "34"), ("福建", "35"),
    ("江西", "36"), ("山东", "37"),
    ("河南", "41"), ("湖北", "42"), ("湖南", "43"), ("广东", "44"), ("广西", "45"),
    ("海南", "46"),
    ("重庆", "50"), ("四川", "51"), ("贵州", "52"), ("云南", "53"), ("西藏", "54"),
    ("陕西", "61"), ("甘肃", "62"), ("青海", "63"), ("宁夏", "64"), ("新疆", "65"),
];

pub fn bid_type_name(code: u8) -> &'static str {
    BID_TYPES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_BID_TYPE)
}

/// Accepts either the numeric code ("7") or the label ("中标公告").
pub fn parse_bid_type(s: &str) -> Option<u8> {
    let s = s.trim();
    if let Ok(code) = s.parse::<u8>() {
        return BID_TYPES.iter().any(|(c, _)| *c == code).then_some(code);
    }
    BID_TYPES.iter().find(|(_, name)| *name == s).map(|(c, _)| *c)
}

/// Accepts a province name ("广西") or its code ("45").
pub fn parse_zone(s: &str) -> Option<&'static str> {
    let s = s.trim();
    ZONES
        .iter()
        .find(|(name, code)| *name == s || (!code.is_empty() && *code == s))
        .map(|(_, code)| *code)
}

pub fn zone_name(code: &str) -> Option<&'static str> {
    ZONES.iter().find(|(_, c)| *c == code).map(|(name, _)| *name)
}

/// `timeType` codes understood by the search endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeType {
    Today,
    ThreeDays,
    OneWeek,
    OneMonth,
    ThreeMonths,
    HalfYear,
    Custom,
}

impl TimeType {
    pub fn code(self) -> u8 {
        match self {
            TimeType::Today => 0,
            TimeType::ThreeDays => 1,
            TimeType::OneWeek => 2,
            TimeType::OneMonth => 3,
            TimeType::ThreeMonths => 4,
            TimeType::HalfYear => 5,
            TimeType::Custom => 6,
        }
    }
}

/// Date-range shortcuts offered next to the custom date pickers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimePreset {
    Today,
    ThreeDays,
    OneWeek,
    TwoWeeks,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl TimePreset {
    pub const ALL: [(TimePreset, &'static str); 8] = [
        (TimePreset::Today, "today"),
        (TimePreset::ThreeDays, "3days"),
        (TimePreset::OneWeek, "1week"),
        (TimePreset::TwoWeeks, "2weeks"),
        (TimePreset::OneMonth, "1month"),
        (TimePreset::ThreeMonths, "3months"),
        (TimePreset::SixMonths, "6months"),
        (TimePreset::OneYear, "1year"),
    ];

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.iter().find(|(_, key)| *key == s).map(|(p, _)| *p)
    }

    /// Inclusive `(start, end)` ending on `today`.
    /// Month arithmetic clamps to the last valid day (Mar 31 − 1 month = Feb 28/29).
    pub fn range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            TimePreset::Today => Some(today),
            TimePreset::ThreeDays => today.checked_sub_days(Days::new(3)),
            TimePreset::OneWeek => today.checked_sub_days(Days::new(7)),
            TimePreset::TwoWeeks => today.checked_sub_days(Days::new(14)),
            TimePreset::OneMonth => today.checked_sub_months(Months::new(1)),
            TimePreset::ThreeMonths => today.checked_sub_months(Months::new(3)),
            TimePreset::SixMonths => today.checked_sub_months(Months::new(6)),
            TimePreset::OneYear => today.checked_sub_months(Months::new(12)),
        };
        (start.unwrap_or(today), today)
    }
}
