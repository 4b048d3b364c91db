// src/progress.rs
use crate::engine::types::Record;

/// Progress reporting for one crawl.
/// Frontends implement this to surface status to users; every method has a
/// no-op default.
pub trait Progress {
    /// Called once the page count is known.
    fn begin(&mut self, _pages: u32) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    fn page_started(&mut self, _page: u32, _pages: u32) {}

    /// All items of `page` have been handled.
    fn page_done(&mut self, _page: u32, _pages: u32) {}

    fn record(&mut self, _rec: &Record) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
