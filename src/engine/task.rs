// src/engine/task.rs
//
// Background worker owning one crawl. The frontend keeps the task, polls
// `events()` and may call `cancel()` at any time; the worker never blocks on
// the frontend.

use std::any::Any;
use std::panic::{ self, AssertUnwindSafe };
use std::sync::mpsc::{ self, Receiver, Sender };
use std::thread::{ self, JoinHandle };

use crate::config::options::CrawlOptions;
use crate::core::cancel::CancelToken;
use crate::core::net::Transport;
use crate::engine::crawl::Crawler;
use crate::engine::types::{ CrawlReport, Record, SearchFilter, StopReason };
use crate::error::{ Result, ScrapeError };
use crate::progress::Progress;

#[derive(Debug)]
pub enum CrawlEvent {
    Status(String),
    Progress { page: u32, pages: u32 },
    Record(Record),
    /// Also sent when the crawl panicked; records collected before it are kept.
    Finished(CrawlReport),
    /// Page 1 could not be fetched; nothing was collected.
    Failed(String),
}

/// Forwards progress as events. Send errors mean the frontend went away;
/// the crawl carries on regardless.
struct ChannelProgress {
    tx: Sender<CrawlEvent>,
}

impl Progress for ChannelProgress {
    fn log(&mut self, msg: &str) {
        let _ = self.tx.send(CrawlEvent::Status(s!(msg)));
    }
    fn page_started(&mut self, page: u32, pages: u32) {
        let _ = self.tx.send(CrawlEvent::Progress { page, pages });
    }
    fn record(&mut self, rec: &Record) {
        let _ = self.tx.send(CrawlEvent::Record(rec.clone()));
    }
}

pub struct CrawlTask {
    cancel: CancelToken,
    events: Receiver<CrawlEvent>,
    handle: Option<JoinHandle<()>>,
}

impl CrawlTask {
    pub fn spawn<T>(filter: SearchFilter, transport: T, opts: CrawlOptions) -> Result<Self>
    where
        T: Transport + 'static,
    {
        Self::spawn_seeded(filter, transport, opts, Vec::new())
    }

    /// As [`CrawlTask::spawn`], continuing numbering after `seed`.
    pub fn spawn_seeded<T>(
        filter: SearchFilter,
        transport: T,
        opts: CrawlOptions,
        seed: Vec<Record>,
    ) -> Result<Self>
    where
        T: Transport + 'static,
    {
        opts.validate()?;
        let cancel = CancelToken::new();
        let (tx, rx) = mpsc::channel();
        let token = cancel.clone();

        let handle = thread::Builder::new()
            .name(s!("ccgp-crawl"))
            .spawn(move || {
                let mut crawler = match Crawler::new(filter, transport, &opts, token) {
                    Ok(c) => c.with_seed(seed),
                    Err(e) => {
                        let _ = tx.send(CrawlEvent::Failed(e.to_string()));
                        return;
                    }
                };
                let mut progress = ChannelProgress { tx: tx.clone() };
                let result = panic::catch_unwind(AssertUnwindSafe(|| crawler.run(Some(&mut progress))));
                let event = match result {
                    Ok(Ok(report)) => CrawlEvent::Finished(report),
                    Ok(Err(e)) => CrawlEvent::Failed(e.to_string()),
                    Err(payload) => {
                        let msg = panic_message(payload.as_ref());
                        loge!("Crawl: worker panicked: {msg}");
                        CrawlEvent::Finished(crawler.abandon(StopReason::Panicked(msg)))
                    }
                };
                let _ = tx.send(event);
            })
            .map_err(ScrapeError::Io)?;

        Ok(Self { cancel, events: rx, handle: Some(handle) })
    }

    /// Request a stop. The crawl ends at its next check point, at the latest
    /// after the current throttle wait or HTTP request.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn events(&self) -> &Receiver<CrawlEvent> {
        &self.events
    }

    /// Block until the final event and return the outcome.
    /// Intermediate events are dropped; drain `events()` first to see them.
    pub fn wait(mut self) -> Result<CrawlReport> {
        let mut last = None;
        for ev in self.events.iter() {
            match ev {
                CrawlEvent::Finished(report) => last = Some(Ok(report)),
                CrawlEvent::Failed(msg) => last = Some(Err(msg)),
                _ => {}
            }
        }
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
        match last {
            Some(Ok(report)) => Ok(report),
            Some(Err(msg)) => Err(ScrapeError::Crawl(msg)),
            None => Err(ScrapeError::Crawl(s!("worker exited without a result"))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s!(*s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        s!("unknown panic")
    }
}

/// Dropping a running task cancels it; the worker winds down on its own.
impl Drop for CrawlTask {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel.cancel();
        }
    }
}
