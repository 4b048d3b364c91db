// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{ Arc, Mutex };

use chrono::NaiveDate;

use ccgp_scrape::core::net::{ HeaderSet, ParamSet, Response, Transport };
use ccgp_scrape::core::CancelToken;
use ccgp_scrape::engine::types::{ Record, SearchFilter };
use ccgp_scrape::error::{ Result, ScrapeError };
use ccgp_scrape::progress::Progress;

/* ---------------- Fake transport ---------------- */

#[derive(Clone, Debug)]
pub enum Reply {
    Page { status: u16, body: String },
    Fail(String),
}

#[derive(Clone, Debug)]
pub struct Call {
    pub url: String,
    pub params: ParamSet,
    pub headers: HeaderSet,
}

impl Call {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }
    pub fn page(&self) -> u32 {
        self.param("page_index").and_then(|v| v.parse().ok()).unwrap_or(0)
    }
}

/// Canned replies keyed by `page_index`; every call is logged.
/// Clones share the script and the log.
#[derive(Clone, Default)]
pub struct FakeTransport {
    replies: Arc<Mutex<HashMap<u32, Reply>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, n: u32, body: String) -> Self {
        self.status(n, 200, body)
    }

    pub fn status(self, n: u32, status: u16, body: String) -> Self {
        self.replies.lock().unwrap().insert(n, Reply::Page { status, body });
        self
    }

    pub fn fail(self, n: u32, msg: &str) -> Self {
        self.replies.lock().unwrap().insert(n, Reply::Fail(msg.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn pages_requested(&self) -> Vec<u32> {
        self.calls().iter().map(Call::page).collect()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str, params: &ParamSet, headers: &HeaderSet) -> Result<Response> {
        let call = Call { url: url.to_string(), params: params.clone(), headers: headers.clone() };
        let page = call.page();
        self.calls.lock().unwrap().push(call);

        match self.replies.lock().unwrap().get(&page).cloned() {
            Some(Reply::Page { status, body }) => Ok(Response {
                status,
                url: format!("{url}page_index={page}"),
                body,
            }),
            Some(Reply::Fail(msg)) => Err(ScrapeError::transport(url, msg)),
            None => Ok(Response { status: 404, url: url.to_string(), body: String::new() }),
        }
    }
}

/* ---------------- Fixture pages ---------------- */

pub struct Item {
    pub title: String,
    pub href: String,
    pub summary: String,
    /// Raw span content, whitespace and all.
    pub meta: String,
}

pub fn item(i: usize) -> Item {
    Item {
        title: format!("项目{i}采购公告"),
        href: format!("http://www.ccgp.gov.cn/cggg/dfgg/{i}.htm"),
        summary: format!("项目{i}概况"),
        meta: format!(
            "\n      2024.05.17 10:32:11\n      | 采购人：采购单位{i}\n      | 代理机构：代理公司{i}\n      | 广西\n    "
        ),
    }
}

pub fn li(it: &Item) -> String {
    format!(
        "<li>\n  <a href=\"{}\" target=\"_blank\">\n    {}\n  </a>\n  <p>{}</p>\n  <span>{}</span>\n</li>\n",
        it.href, it.title, it.summary, it.meta
    )
}

/// Search result page shaped like the live site: total in
/// body>div[5]>div[1]>div>p[1]>span[2], items in body>div[5]>div[2]>div>div>div[1]>ul.
pub fn page_html(total: Option<&str>, items_html: &str) -> String {
    let total_block = match total {
        Some(t) => format!("<p>共找到 <span>公告</span><span>{t}</span> 条</p><p>第二段</p>"),
        None => s("<p>没有统计</p>"),
    };
    format!(
        "<!DOCTYPE html>\n<html><head><title>search</title></head><body>\n\
         <div class=\"top\">t</div>\n<div class=\"nav\">n</div>\n<div class=\"search\">s</div>\n<div class=\"tabs\">b</div>\n\
         <div class=\"main\">\n\
           <div class=\"count\"><div>{total_block}</div></div>\n\
           <div class=\"list\"><div><div>\n\
             <div class=\"vT-srch-result-list\"><ul class=\"vT-srch-result-list-bid\">\n{items_html}</ul></div>\n\
             <div class=\"pager\">p</div>\n\
           </div></div></div>\n\
         </div>\n<div class=\"footer\">f</div>\n</body></html>\n"
    )
}

/// Page with numbered items `range` and the given total.
pub fn listing(total: u32, range: std::ops::Range<usize>) -> String {
    let items: String = range.map(|i| li(&item(i))).collect();
    page_html(Some(&total.to_string()), &items)
}

fn s(v: &str) -> String {
    v.to_string()
}

/* ---------------- Misc ---------------- */

pub fn filter() -> SearchFilter {
    let d = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
    SearchFilter::builder(d, d).keyword("公告").zone("45").build().unwrap()
}

#[derive(Default)]
pub struct Recorder {
    pub begun: Option<u32>,
    pub started: Vec<(u32, u32)>,
    pub done: Vec<(u32, u32)>,
    pub seqs: Vec<usize>,
    pub lines: Vec<String>,
    pub finished: bool,
    /// Cancel this token once the given page is done.
    pub cancel_after: Option<(u32, CancelToken)>,
}

impl Progress for Recorder {
    fn begin(&mut self, pages: u32) { self.begun = Some(pages); }
    fn log(&mut self, msg: &str) { self.lines.push(msg.to_string()); }
    fn page_started(&mut self, page: u32, pages: u32) { self.started.push((page, pages)); }
    fn page_done(&mut self, page: u32, pages: u32) {
        self.done.push((page, pages));
        if let Some((after, token)) = &self.cancel_after {
            if *after == page {
                token.cancel();
            }
        }
    }
    fn record(&mut self, rec: &Record) { self.seqs.push(rec.seq); }
    fn finish(&mut self) { self.finished = true; }
}
