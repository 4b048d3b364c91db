// src/specs/record.rs
//
// Metadata string → Record fields.
//
// Input shape (whitespace already stripped):
//   2024.05.1710:32:11|采购人：某某大学|代理机构：某某招标公司|广西
// The first 10 characters are the date; the rest is marker-labelled and
// `|`-separated, but any part may be missing.

use thiserror::Error;

use crate::engine::types::{ RawFragment, Record, SearchFilter };

pub const BUYER_MARK: &str = "采购人：";
pub const AGENT_MARK: &str = "代理机构：";

/// Why a listing item produced no record.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SkipReason {
    #[error("item has no title link")]
    MissingAnchor,
    #[error("item has no summary")]
    MissingSummary,
    #[error("item has no metadata span")]
    MissingMeta,
    #[error("title is empty")]
    EmptyTitle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extraction {
    Parsed(Record),
    Skipped(SkipReason),
}

/// Fields split out of one metadata string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetaFields {
    pub date: String,
    pub buyer: String,
    pub agent: String,
    pub region: String,
}

pub fn split_meta(meta: &str) -> MetaFields {
    let cut = meta.char_indices().nth(10).map_or(meta.len(), |(i, _)| i);
    let (date, rest) = meta.split_at(cut);

    let buyer_pos = rest.find(BUYER_MARK);
    let agent_pos = rest.find(AGENT_MARK);

    let buyer = buyer_pos.map_or_else(String::new, |pos| {
        let start = pos + BUYER_MARK.len();
        let end = match rest[start..].find('|') {
            Some(sep) => start + sep,
            None => agent_pos.filter(|&a| a >= start).unwrap_or(rest.len()),
        };
        rest[start..end].trim().to_string()
    });

    let agent = agent_pos.map_or_else(String::new, |pos| {
        let start = pos + AGENT_MARK.len();
        let end = rest[start..].find('|').map_or(rest.len(), |sep| start + sep);
        rest[start..end].trim().to_string()
    });

    let region = rest
        .rfind('|')
        .map(|i| rest[i + 1..].trim())
        .filter(|tail| !tail.contains(BUYER_MARK) && !tail.contains(AGENT_MARK))
        .map(str::to_string)
        .unwrap_or_default();

    MetaFields { date: date.to_string(), buyer, agent, region }
}

/// Per-crawl constants stamped on every record.
#[derive(Clone, Debug)]
pub struct RecordExtractor {
    keyword: String,
    notice_type: String,
}

impl RecordExtractor {
    pub fn new(keyword: impl Into<String>, notice_type: impl Into<String>) -> Self {
        Self { keyword: keyword.into(), notice_type: notice_type.into() }
    }

    pub fn for_filter(filter: &SearchFilter) -> Self {
        Self::new(filter.keyword(), filter.bid_type_name())
    }

    pub fn extract(&self, frag: &RawFragment, seq: usize) -> Extraction {
        if frag.title.trim().is_empty() {
            return Extraction::Skipped(SkipReason::EmptyTitle);
        }
        let MetaFields { date, buyer, agent, region } = split_meta(&frag.meta);
        Extraction::Parsed(Record {
            seq,
            keyword: self.keyword.clone(),
            title: frag.title.trim().to_string(),
            date,
            buyer,
            agent,
            region,
            notice_type: self.notice_type.clone(),
            url: frag.href.clone(),
            summary: frag.summary.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_meta_is_all_date() {
        let m = split_meta("2024.05");
        assert_eq!(m.date, "2024.05");
        assert_eq!(m, MetaFields { date: s!("2024.05"), ..Default::default() });
    }

    #[test]
    fn buyer_without_pipe_stops_at_agent() {
        let m = split_meta("2024.05.17采购人：甲单位代理机构：乙公司");
        assert_eq!(m.buyer, "甲单位");
        assert_eq!(m.agent, "乙公司");
        assert_eq!(m.region, "");
    }

    #[test]
    fn agent_before_buyer_leaves_buyer_to_end() {
        let m = split_meta("2024.05.17代理机构：乙公司采购人：甲单位");
        assert_eq!(m.buyer, "甲单位");
        assert_eq!(m.agent, "乙公司采购人：甲单位");
    }

    #[test]
    fn empty_title_skips() {
        let ex = RecordExtractor::new("公告", "所有");
        let frag = RawFragment { title: s!("  "), ..Default::default() };
        assert_eq!(ex.extract(&frag, 1), Extraction::Skipped(SkipReason::EmptyTitle));
    }
}
