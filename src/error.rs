// src/error.rs
use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// DNS, connect, timeout or body-read failure. Fatal on page 1 only.
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("invalid search filter: {0}")]
    InvalidFilter(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("selector error: {0}")]
    Selector(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("notification failed: {0}")]
    Notify(String),

    /// A background crawl ended without a report.
    #[error("crawl failed: {0}")]
    Crawl(String),
}

impl ScrapeError {
    pub fn transport(url: impl Into<String>, message: impl ToString) -> Self {
        ScrapeError::Transport { url: url.into(), message: message.to_string() }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ScrapeError::Transport { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
