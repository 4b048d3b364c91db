// src/specs/mod.rs
//! # Page specs
//!
//! Knowledge of the ccgp search result page: *where the data lives in the
//! HTML* and *how to turn it into records*.
//!
//! ## What lives here
//! - **`search_page`**: total-hit count and the raw listing items of one
//!   `/bxsearch` response. Positional CSS selectors, since the page carries no
//!   stable ids.
//! - **`record`**: splitting an item's metadata string
//!   (`date | 采购人：… | 代理机构：… | region`) into fields and stamping the
//!   per-crawl keyword and type label on the result.
//!
//! ## What does **not** live here
//! - **Fetching, throttling, cancellation**: `core::net` and `engine`.
//! - **Dedupe, export, notification**: `dedupe`, `file`, `notify`, `runner`.
//!
//! ## Conventions
//! - Pure functions of the input text; no I/O, no global state.
//! - One broken item never fails a page. Items that cannot be used come back
//!   as a [`record::SkipReason`] and the caller counts them.
//! - Whitespace handling mirrors what the site renders: layout whitespace
//!   (space, CR, LF, TAB) is removed from metadata only; titles and summaries
//!   are trimmed.
//!
//! ## Testing notes
//! Everything here is testable offline against fixture HTML (`tests/common`).
pub mod record;
pub mod search_page;
