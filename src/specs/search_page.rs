// src/specs/search_page.rs
//
// Listing page of `/bxsearch`.
//
// Layout (positional, no ids or classes worth trusting):
//   body > div[5] > div[1] > div > p[1] > span[2]          total hit count
//   body > div[5] > div[2] > div > div > div[1] > ul > li  one announcement each
//
// Per <li>: first child <a> = title + detail href, first child <p> = summary,
// first child <span> = "date | 采购人：… | 代理机构：… | region" with layout
// whitespace.

use scraper::{ ElementRef, Html, Selector };

use crate::config::consts::PAGE_SIZE;
use crate::core::sanitize::strip_layout_ws;
use crate::engine::types::RawFragment;
use crate::error::{ Result, ScrapeError };
use crate::specs::record::SkipReason;

const TOTAL_SEL: &str =
    "body > div:nth-of-type(5) > div:nth-of-type(1) > div > p:nth-of-type(1) > span:nth-of-type(2)";
const ITEM_SEL: &str =
    "body > div:nth-of-type(5) > div:nth-of-type(2) > div > div > div:nth-of-type(1) > ul > li";

/// Pages needed for `total` hits at the fixed server page size.
pub fn page_count(total: u32) -> u32 {
    total.div_ceil(PAGE_SIZE)
}

pub struct SearchPageParser {
    total: Selector,
    items: Selector,
}

impl SearchPageParser {
    pub fn new() -> Result<Self> {
        Ok(Self { total: selector(TOTAL_SEL)?, items: selector(ITEM_SEL)? })
    }

    /// Hit count shown on the page; 0 when the node is missing or not a number.
    pub fn parse_total(&self, html: &str) -> u32 {
        let doc = Html::parse_document(html);
        doc.select(&self.total)
            .next()
            .map(|el| el.text().collect::<String>())
            .and_then(|t| t.trim().parse::<u32>().ok())
            .unwrap_or(0)
    }

    /// One entry per listing item, in page order.
    pub fn parse_fragments(&self, html: &str) -> Vec<std::result::Result<RawFragment, SkipReason>> {
        let doc = Html::parse_document(html);
        doc.select(&self.items).map(fragment).collect()
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{css}: {e}")))
}

fn first_child<'a>(li: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    li.children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name().eq_ignore_ascii_case(tag))
}

fn fragment(li: ElementRef<'_>) -> std::result::Result<RawFragment, SkipReason> {
    let a = first_child(li, "a").ok_or(SkipReason::MissingAnchor)?;
    let p = first_child(li, "p").ok_or(SkipReason::MissingSummary)?;
    let span = first_child(li, "span").ok_or(SkipReason::MissingMeta)?;

    Ok(RawFragment {
        title: a.text().collect::<String>().trim().to_string(),
        href: a.value().attr("href").unwrap_or_default().trim().to_string(),
        summary: p.text().collect::<String>().trim().to_string(),
        meta: strip_layout_ws(&span.text().collect::<String>()),
    })
}
