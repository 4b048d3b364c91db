// src/engine/types.rs
use std::fmt;

use chrono::NaiveDate;

use crate::config::codes::{ self, TimeType };
use crate::config::consts::{ DEFAULT_BID_TYPE, DEFAULT_KEYWORD, DEFAULT_ZONE, LEGACY_TYPE_TAG };
use crate::config::options::HeaderLayout;
use crate::error::{ Result, ScrapeError };

/// `YYYY:MM:DD`, the only date form the search endpoint accepts.
pub fn format_date(d: NaiveDate) -> String {
    d.format("%Y:%m:%d").to_string()
}

/* ---------------- Input ---------------- */

/// One crawl's search. Immutable once built; use [`SearchFilter::builder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchFilter {
    keyword: String,
    buyer: String,
    agent: String,
    bid_type: u8,
    zone: String,
    start: NaiveDate,
    end: NaiveDate,
    time_type: TimeType,
}

impl SearchFilter {
    pub fn builder(start: NaiveDate, end: NaiveDate) -> SearchFilterBuilder {
        SearchFilterBuilder {
            keyword: s!(DEFAULT_KEYWORD),
            buyer: s!(),
            agent: s!(),
            bid_type: DEFAULT_BID_TYPE,
            zone: s!(DEFAULT_ZONE),
            start,
            end,
            time_type: TimeType::Custom,
        }
    }

    pub fn keyword(&self) -> &str { &self.keyword }
    pub fn buyer(&self) -> &str { &self.buyer }
    pub fn agent(&self) -> &str { &self.agent }
    pub fn bid_type(&self) -> u8 { self.bid_type }
    pub fn bid_type_name(&self) -> &'static str { codes::bid_type_name(self.bid_type) }
    pub fn zone(&self) -> &str { &self.zone }
    pub fn start(&self) -> NaiveDate { self.start }
    pub fn end(&self) -> NaiveDate { self.end }
    pub fn time_type(&self) -> TimeType { self.time_type }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zone = codes::zone_name(&self.zone).unwrap_or(self.zone.as_str());
        write!(
            f,
            "kw='{}' type={} zone={} {}..{}",
            self.keyword,
            self.bid_type_name(),
            zone,
            self.start,
            self.end
        )?;
        if !self.buyer.is_empty() { write!(f, " buyer='{}'", self.buyer)?; }
        if !self.agent.is_empty() { write!(f, " agent='{}'", self.agent)?; }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct SearchFilterBuilder {
    keyword: String,
    buyer: String,
    agent: String,
    bid_type: u8,
    zone: String,
    start: NaiveDate,
    end: NaiveDate,
    time_type: TimeType,
}

impl SearchFilterBuilder {
    pub fn keyword(mut self, kw: impl Into<String>) -> Self { self.keyword = kw.into(); self }
    pub fn buyer(mut self, name: impl Into<String>) -> Self { self.buyer = name.into(); self }
    pub fn agent(mut self, name: impl Into<String>) -> Self { self.agent = name.into(); self }
    pub fn bid_type(mut self, code: u8) -> Self { self.bid_type = code; self }
    pub fn zone(mut self, code: impl Into<String>) -> Self { self.zone = code.into(); self }
    pub fn time_type(mut self, t: TimeType) -> Self { self.time_type = t; self }

    pub fn build(self) -> Result<SearchFilter> {
        if self.start > self.end {
            return Err(ScrapeError::InvalidFilter(format!(
                "start date {} is after end date {}", self.start, self.end
            )));
        }
        if !codes::BID_TYPES.iter().any(|(c, _)| *c == self.bid_type) {
            return Err(ScrapeError::InvalidFilter(format!("unknown bid type {}", self.bid_type)));
        }
        if codes::zone_name(&self.zone).is_none() {
            return Err(ScrapeError::InvalidFilter(format!("unknown zone '{}'", self.zone)));
        }
        Ok(SearchFilter {
            keyword: self.keyword.trim().to_string(),
            buyer: self.buyer.trim().to_string(),
            agent: self.agent.trim().to_string(),
            bid_type: self.bid_type,
            zone: self.zone,
            start: self.start,
            end: self.end,
            time_type: self.time_type,
        })
    }
}

/* ---------------- Per-run state ---------------- */

/// Transient state threaded through one crawl's requests.
#[derive(Clone, Debug)]
pub struct FetchContext {
    pub page_index: u32,
    /// Resolved URL of the previous response; next request's Referer.
    pub referer: Option<String>,
    /// Sequence number the next parsed record gets.
    pub next_seq: usize,
}

impl FetchContext {
    pub fn new(already_accumulated: usize) -> Self {
        Self { page_index: 1, referer: None, next_seq: already_accumulated + 1 }
    }
}

/* ---------------- Page data ---------------- */

/// One listing entry before extraction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawFragment {
    pub title: String,
    pub href: String,
    pub summary: String,
    /// Date + `|`-separated buyer/agent/region text, whitespace stripped.
    pub meta: String,
}

/// One output row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub seq: usize,
    pub keyword: String,
    pub title: String,
    /// 10-character token as published; not validated as a date.
    pub date: String,
    pub buyer: String,
    pub agent: String,
    pub region: String,
    pub notice_type: String,
    pub url: String,
    pub summary: String,
}

impl Record {
    pub fn to_row(&self, layout: HeaderLayout) -> Vec<String> {
        let (tag, col6) = match layout {
            HeaderLayout::Keyword => (self.keyword.clone(), self.notice_type.clone()),
            HeaderLayout::Legacy => (s!(LEGACY_TYPE_TAG), self.region.clone()),
        };
        vec![
            self.seq.to_string(),
            tag,
            self.title.clone(),
            self.date.clone(),
            self.buyer.clone(),
            self.agent.clone(),
            col6,
            self.url.clone(),
            self.summary.clone(),
        ]
    }
}

/* ---------------- Outcome ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    Fetching(u32),
    ParsingTotal,
    NoResults,
    Paginating { pages: u32 },
    Extracting(u32),
    Done,
    Stopped,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    /// Transport failure after page 1; records so far are kept.
    PageFailed { page: u32, error: String },
    /// The worker unwound mid-crawl.
    Panicked(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Cancelled => write!(f, "cancelled"),
            StopReason::PageFailed { page, error } => write!(f, "page {page} failed: {error}"),
            StopReason::Panicked(msg) => write!(f, "crawl aborted: {msg}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Stopped(StopReason),
}

#[derive(Clone, Debug)]
pub struct CrawlReport {
    pub outcome: Outcome,
    /// Result count reported by page 1 (0 when absent).
    pub total: u32,
    pub pages: u32,
    pub pages_fetched: u32,
    pub skipped: usize,
    pub records: Vec<Record>,
}

impl CrawlReport {
    pub fn is_partial(&self) -> bool {
        matches!(self.outcome, Outcome::Stopped(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn builder_rejects_reversed_range() {
        let err = SearchFilter::builder(d(2024, 2, 1), d(2024, 1, 1)).build().unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidFilter(_)));
    }

    #[test]
    fn builder_rejects_unknown_codes() {
        assert!(SearchFilter::builder(d(2024, 1, 1), d(2024, 1, 1)).bid_type(13).build().is_err());
        assert!(SearchFilter::builder(d(2024, 1, 1), d(2024, 1, 1)).zone("99").build().is_err());
        assert!(SearchFilter::builder(d(2024, 1, 1), d(2024, 1, 1)).zone("").build().is_ok());
    }

    #[test]
    fn context_numbers_after_existing_records() {
        assert_eq!(FetchContext::new(0).next_seq, 1);
        let ctx = FetchContext::new(3);
        assert_eq!((ctx.page_index, ctx.next_seq), (1, 4));
        assert!(ctx.referer.is_none());
    }

    #[test]
    fn dates_use_colon_form() {
        assert_eq!(format_date(d(2024, 3, 5)), "2024:03:05");
    }

    #[test]
    fn legacy_row_swaps_tag_and_region() {
        let r = Record {
            seq: 3,
            keyword: s!("公告"),
            title: s!("T"),
            region: s!("广西"),
            notice_type: s!("中标公告"),
            ..Default::default()
        };
        let row = r.to_row(HeaderLayout::Keyword);
        assert_eq!(row[0], "3");
        assert_eq!(row[6], "中标公告");
        let row = r.to_row(HeaderLayout::Legacy);
        assert_eq!(row[1], LEGACY_TYPE_TAG);
        assert_eq!(row[6], "广西");
    }
}
