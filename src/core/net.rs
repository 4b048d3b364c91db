// src/core/net.rs

// Request identity, the search query schema, and the throttled GET path.

use std::time::Duration;

use rand::Rng;

use crate::config::consts::{ HOST, PORTAL_ROOT };
use crate::config::options::CrawlOptions;
use crate::core::cancel::CancelToken;
use crate::engine::types::{ format_date, SearchFilter };
use crate::error::{ Result, ScrapeError };

pub const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/101.0.4951.64 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:100.0) Gecko/20100101 Firefox/100.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/101.0.4951.64 Safari/537.36",
];

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/* ---------------- Headers / params ---------------- */

/// Ordered request headers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderSet(Vec<(&'static str, String)>);

impl HeaderSet {
    pub fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.0.push((name, value.into()));
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

/// Ordered query pairs; the endpoint sees them in this order.
pub type ParamSet = Vec<(&'static str, String)>;

pub type AgentPicker = Box<dyn Fn(&[&'static str]) -> &'static str + Send + Sync>;

fn random_agent(pool: &[&'static str]) -> &'static str {
    pool[rand::rng().random_range(0..pool.len())]
}

pub struct RequestBuilder {
    pick_agent: AgentPicker,
}

impl Default for RequestBuilder {
    fn default() -> Self { Self::new() }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self { pick_agent: Box::new(random_agent) }
    }

    /// Replace the uniform User-Agent choice, e.g. to pin it in tests.
    pub fn with_agent_picker<F>(picker: F) -> Self
    where
        F: Fn(&[&'static str]) -> &'static str + Send + Sync + 'static,
    {
        Self { pick_agent: Box::new(picker) }
    }

    pub fn headers(&self, referer: Option<&str>) -> HeaderSet {
        let mut h = HeaderSet::default();
        h.push("User-Agent", (self.pick_agent)(&USER_AGENTS[..]));
        h.push("Host", HOST);
        h.push("Referer", referer.unwrap_or(PORTAL_ROOT));
        h.push("Accept", ACCEPT);
        h.push("Accept-Encoding", "gzip, deflate");
        h.push("Accept-Language", "zh-CN,zh;q=0.9");
        h.push("Connection", "keep-alive");
        h.push("Upgrade-Insecure-Requests", "1");
        h
    }

    pub fn params(filter: &SearchFilter, page: u32) -> ParamSet {
        vec![
            ("searchtype", s!("1")),
            ("page_index", page.to_string()),
            ("bidSort", s!("0")),
            ("buyerName", s!(filter.buyer())),
            ("projectId", s!()),
            ("pinMu", s!("0")),
            ("bidType", filter.bid_type().to_string()),
            ("dbselect", s!("bidx")),
            ("kw", s!(filter.keyword())),
            ("start_time", format_date(filter.start())),
            ("end_time", format_date(filter.end())),
            ("timeType", filter.time_type().code().to_string()),
            ("displayZone", s!()),
            ("zoneId", s!(filter.zone())),
            ("pppStatus", s!("0")),
            ("agentName", s!(filter.agent())),
        ]
    }
}

/* ---------------- Transport ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// Final URL after redirects.
    pub url: String,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One GET. Only connection-level failures are errors; any HTTP status
/// comes back as a `Response`.
pub trait Transport: Send {
    fn get(&self, url: &str, params: &ParamSet, headers: &HeaderSet) -> Result<Response>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(opts: &CrawlOptions) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(opts.timeout())
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(|e| ScrapeError::transport(&opts.search_url, e))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, params: &ParamSet, headers: &HeaderSet) -> Result<Response> {
        let mut req = self.client.get(url).query(params);
        for (name, value) in headers.iter() {
            req = req.header(name, value);
        }
        let resp = req.send().map_err(|e| ScrapeError::transport(url, e))?;
        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let bytes = resp.bytes().map_err(|e| ScrapeError::transport(&final_url, e))?;
        Ok(Response {
            status,
            url: final_url,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/* ---------------- Fetcher ---------------- */

#[derive(Debug)]
pub enum Fetched {
    Page(Response),
    Cancelled,
}

pub struct PageFetcher<T: Transport> {
    transport: T,
    min_delay: u64,
    max_delay: u64,
    cancel: CancelToken,
}

impl<T: Transport> PageFetcher<T> {
    pub fn new(transport: T, opts: &CrawlOptions, cancel: CancelToken) -> Self {
        Self {
            transport,
            min_delay: opts.min_delay_secs,
            max_delay: opts.max_delay_secs.max(opts.min_delay_secs),
            cancel,
        }
    }

    /// Whole seconds, uniform over `[min, max]`.
    pub fn next_delay(&self) -> Duration {
        if self.max_delay == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs(rand::rng().random_range(self.min_delay..=self.max_delay))
    }

    pub fn fetch(&self, url: &str, params: &ParamSet, headers: &HeaderSet) -> Result<Fetched> {
        self.fetch_after(self.next_delay(), url, params, headers)
    }

    /// Wait `delay` on the cancel token, then GET. A cancel during the wait
    /// returns `Cancelled` without touching the network.
    pub fn fetch_after(
        &self,
        delay: Duration,
        url: &str,
        params: &ParamSet,
        headers: &HeaderSet,
    ) -> Result<Fetched> {
        if self.cancel.sleep(delay) {
            logd!("Fetch: cancelled during {}s wait", delay.as_secs());
            return Ok(Fetched::Cancelled);
        }
        let resp = self.transport.get(url, params, headers)?;
        if !resp.is_success() {
            logw!("Fetch: HTTP {} from {}", resp.status, resp.url);
        }
        Ok(Fetched::Page(resp))
    }
}
