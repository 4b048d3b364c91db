// src/engine/mod.rs

pub mod crawl;
pub mod task;
pub mod types;

pub use crawl::Crawler;
pub use task::{ CrawlEvent, CrawlTask };
pub use types::*;
