// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod specs;

pub mod dedupe;
pub mod error;
pub mod file;
pub mod logging;
pub mod notify;
pub mod progress;
pub mod runner;
pub mod store;

pub use error::{Result, ScrapeError};
