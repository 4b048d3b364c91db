// src/logging.rs
use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Install the process-wide logger.
///
/// `RUST_LOG` wins over `level` when set, so `RUST_LOG=ccgp_scrape=debug`
/// still works for one-off digging. Safe to call more than once; later calls
/// are ignored.
pub fn init(level: LevelFilter) {
    let env = Env::default().default_filter_or(level.as_str());
    let _ = Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init();
}

/// Map `-v` repetitions to a level (0 = info).
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
