// src/engine/crawl.rs
//
// One crawl, start to finish: page 1 → total → pages 2..=N, extracting every
// listing item on the way. Strictly sequential; the only waits are the
// throttle sleeps inside the fetcher.

use crate::config::options::CrawlOptions;
use crate::core::cancel::CancelToken;
use crate::core::net::{ Fetched, PageFetcher, RequestBuilder, Response, Transport };
use crate::engine::types::*;
use crate::error::Result;
use crate::progress::{ NullProgress, Progress };
use crate::specs::record::{ Extraction, RecordExtractor };
use crate::specs::search_page::{ page_count, SearchPageParser };

pub struct Crawler<T: Transport> {
    filter: SearchFilter,
    url: String,
    fetcher: PageFetcher<T>,
    requests: RequestBuilder,
    parser: SearchPageParser,
    extractor: RecordExtractor,
    cancel: CancelToken,
    /// Seed records first, then this crawl's records in page order.
    records: Vec<Record>,
    state: CrawlState,
    skipped: usize,
    total: u32,
    pages: u32,
    fetched: u32,
}

impl<T: Transport> Crawler<T> {
    pub fn new(filter: SearchFilter, transport: T, opts: &CrawlOptions, cancel: CancelToken) -> Result<Self> {
        opts.validate()?;
        Ok(Self {
            extractor: RecordExtractor::for_filter(&filter),
            url: opts.search_url.clone(),
            fetcher: PageFetcher::new(transport, opts, cancel.clone()),
            requests: RequestBuilder::new(),
            parser: SearchPageParser::new()?,
            filter,
            cancel,
            records: Vec::new(),
            state: CrawlState::Idle,
            skipped: 0,
            total: 0,
            pages: 0,
            fetched: 0,
        })
    }

    /// Start from an existing list; numbering continues after it.
    pub fn with_seed(mut self, seed: Vec<Record>) -> Self {
        self.records = seed;
        self
    }

    /// Replace the header source, e.g. to pin the User-Agent.
    pub fn with_request_builder(mut self, requests: RequestBuilder) -> Self {
        self.requests = requests;
        self
    }

    pub fn state(&self) -> CrawlState { self.state }
    pub fn records(&self) -> &[Record] { &self.records }

    /// Only a page-1 transport failure is an `Err`. Cancellation and later
    /// page failures end the crawl with `Outcome::Stopped` and keep what
    /// was collected.
    pub fn run(&mut self, progress: Option<&mut dyn Progress>) -> Result<CrawlReport> {
        let mut null = NullProgress;
        let p: &mut dyn Progress = match progress {
            Some(p) => p,
            None => &mut null,
        };
        let report = self.crawl(p);
        p.finish();
        report
    }

    /// Close out a crawl whose `run` never returned (it unwound). Whatever
    /// was collected up to that point is kept.
    pub fn abandon(&mut self, reason: StopReason) -> CrawlReport {
        self.state = CrawlState::Stopped;
        logw!("Crawl: abandoned ({reason}) with {} record(s)", self.records.len());
        self.report(Outcome::Stopped(reason))
    }

    fn crawl(&mut self, p: &mut dyn Progress) -> Result<CrawlReport> {
        logf!("Crawl: {}", self.filter);
        p.log(&format!("Searching: {}", self.filter));

        let mut ctx = FetchContext::new(self.records.len());
        (self.total, self.pages, self.fetched) = (0, 0, 0);
        self.state = CrawlState::Fetching(1);
        let first = match self.fetch_page(&mut ctx, p) {
            Ok(Fetched::Page(resp)) => resp,
            Ok(Fetched::Cancelled) => return Ok(self.stopped(StopReason::Cancelled, p)),
            Err(e) => {
                self.state = CrawlState::Failed;
                loge!("Crawl: first page failed: {e}");
                p.log(&format!("First page failed: {e}"));
                return Err(e);
            }
        };

        self.fetched = 1;
        self.state = CrawlState::ParsingTotal;
        let total = self.parser.parse_total(&first.body);
        if total == 0 {
            self.state = CrawlState::NoResults;
            logf!("Crawl: no results");
            p.log("No matching announcements");
            return Ok(self.report(Outcome::Done));
        }

        let pages = page_count(total);
        (self.total, self.pages) = (total, pages);
        self.state = CrawlState::Paginating { pages };
        logf!("Crawl: {total} results over {pages} page(s)");
        p.log(&format!("Found {total} results, {pages} page(s)"));
        p.begin(pages);

        let mut body = first.body;
        for page in 1..=pages {
            if page > 1 && self.cancel.is_cancelled() {
                return Ok(self.stopped(StopReason::Cancelled, p));
            }
            p.page_started(page, pages);
            if page > 1 {
                ctx.page_index = page;
                self.state = CrawlState::Fetching(page);
                match self.fetch_page(&mut ctx, p) {
                    Ok(Fetched::Page(resp)) => body = resp.body,
                    Ok(Fetched::Cancelled) => return Ok(self.stopped(StopReason::Cancelled, p)),
                    Err(e) => {
                        loge!("Crawl: page {page} failed: {e}");
                        let reason = StopReason::PageFailed { page, error: e.to_string() };
                        return Ok(self.stopped(reason, p));
                    }
                }
                self.fetched += 1;
            }

            self.state = CrawlState::Extracting(page);
            if !self.extract_page(&mut ctx, &body, p) {
                return Ok(self.stopped(StopReason::Cancelled, p));
            }
            p.page_done(page, pages);
        }

        self.state = CrawlState::Done;
        logf!("Crawl: done, {} record(s), {} skipped", self.records.len(), self.skipped);
        Ok(self.report(Outcome::Done))
    }

    /// Returns `false` when cancelled partway through the page.
    fn extract_page(&mut self, ctx: &mut FetchContext, body: &str, p: &mut dyn Progress) -> bool {
        for item in self.parser.parse_fragments(body) {
            if self.cancel.is_cancelled() {
                return false;
            }
            let frag = match item {
                Ok(frag) => frag,
                Err(reason) => {
                    self.skipped += 1;
                    logd!("Extract: skipped item ({reason})");
                    continue;
                }
            };
            match self.extractor.extract(&frag, ctx.next_seq) {
                Extraction::Parsed(rec) => {
                    p.record(&rec);
                    self.records.push(rec);
                    ctx.next_seq += 1;
                }
                Extraction::Skipped(reason) => {
                    self.skipped += 1;
                    logw!("Extract: skipped '{}' ({reason})", frag.href);
                    p.log(&format!("Skipped an item: {reason}"));
                }
            }
        }
        true
    }

    fn fetch_page(&self, ctx: &mut FetchContext, p: &mut dyn Progress) -> Result<Fetched> {
        let params = RequestBuilder::params(&self.filter, ctx.page_index);
        let headers = self.requests.headers(ctx.referer.as_deref());
        let delay = self.fetcher.next_delay();
        logd!("Fetch: page {} after {}s", ctx.page_index, delay.as_secs());
        p.log(&format!("Waiting {}s before page {}", delay.as_secs(), ctx.page_index));

        let fetched = self.fetcher.fetch_after(delay, &self.url, &params, &headers)?;
        if let Fetched::Page(Response { status, url, .. }) = &fetched {
            if !(200..300).contains(status) {
                p.log(&format!("Request failed: HTTP {status}"));
            }
            ctx.referer = Some(url.clone());
        }
        Ok(fetched)
    }

    fn stopped(&mut self, reason: StopReason, p: &mut dyn Progress) -> CrawlReport {
        self.state = CrawlState::Stopped;
        logw!("Crawl: stopped ({reason}) with {} record(s)", self.records.len());
        p.log(&format!("Stopped: {reason}"));
        self.report(Outcome::Stopped(reason))
    }

    fn report(&self, outcome: Outcome) -> CrawlReport {
        CrawlReport {
            outcome,
            total: self.total,
            pages: self.pages,
            pages_fetched: self.fetched,
            skipped: self.skipped,
            records: self.records.clone(),
        }
    }
}
