// src/runner.rs
//
// What happens to a finished crawl: dedupe → write → notify → summary.
// Sink failures are logged and reported in the summary; records are never
// dropped because a sink failed.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Local;

use crate::{
    config::consts::{ INTERRUPTED_PREFIX, NOTIFY_SUBJECT, STAMP_FORMAT },
    config::options::AppOptions,
    dedupe,
    engine::types::{ CrawlReport, Outcome, Record },
    file::{ write_records, TabularWriter },
    notify::{ render_body, Notifier },
    progress::{ NullProgress, Progress },
    store,
};

/// Output ends of one run. `notifier` is `None` when notifications are off.
pub struct Sinks<'a> {
    pub writer: &'a dyn TabularWriter,
    pub notifier: Option<&'a dyn Notifier>,
}

/// Summary of what was produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Records the crawl returned.
    pub fetched: usize,
    /// Records left after the history filter; `None` for a stopped run,
    /// which is saved unfiltered.
    pub new_records: Option<usize>,
    pub written: Option<PathBuf>,
    pub notified: bool,
    pub interrupted: bool,
}

/// Titles from the configured history file. Read problems are logged and
/// yield an empty history, so every record counts as new.
pub fn known_titles(opts: &AppOptions) -> HashSet<String> {
    let Some(path) = &opts.export.history else {
        return HashSet::new();
    };
    match store::load_titles_or_empty(path) {
        Ok(t) => t,
        Err(e) => {
            logw!("History: could not read {}: {e}", path.display());
            HashSet::new()
        }
    }
}

pub fn finish_run(
    report: &CrawlReport,
    opts: &AppOptions,
    known: &HashSet<String>,
    sinks: Sinks<'_>,
    progress: Option<&mut dyn Progress>,
) -> RunSummary {
    let mut null = NullProgress;
    let p: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };
    let stamp = Local::now().format(STAMP_FORMAT).to_string();
    let mut summary = RunSummary { fetched: report.records.len(), ..Default::default() };

    if let Outcome::Stopped(reason) = &report.outcome {
        summary.interrupted = true;
        if report.records.is_empty() {
            p.log("Stopped; nothing to save");
            return summary;
        }
        p.log(&format!("Stopped ({reason}); saving {} collected record(s)", report.records.len()));
        summary.written = save(sinks.writer, opts, INTERRUPTED_PREFIX, &stamp, &report.records, p);
        return summary;
    }

    let fresh = dedupe::filter_new(&report.records, known);
    summary.new_records = Some(fresh.len());
    p.log(&format!(
        "Fetched {} record(s), {} new after history filter",
        report.records.len(),
        fresh.len()
    ));

    if fresh.is_empty() {
        p.log("No new announcements");
        return summary;
    }

    if let Some(notifier) = sinks.notifier {
        if let Some(body) = render_body(&fresh, opts.export.layout) {
            match notifier.send(NOTIFY_SUBJECT, &body) {
                Ok(()) => summary.notified = true,
                Err(e) => {
                    loge!("Notify: {e}");
                    p.log(&format!("Notification failed: {e}"));
                }
            }
        }
    }

    if opts.export.auto_save {
        summary.written = save(sinks.writer, opts, &opts.export.prefix, &stamp, &fresh, p);
    }
    summary
}

fn save(
    writer: &dyn TabularWriter,
    opts: &AppOptions,
    prefix: &str,
    stamp: &str,
    records: &[Record],
    p: &mut dyn Progress,
) -> Option<PathBuf> {
    match write_records(writer, &opts.export, prefix, stamp, records) {
        Ok(path) => {
            p.log(&format!("Saved {} record(s) to {}", records.len(), path.display()));
            Some(path)
        }
        Err(e) => {
            loge!("Export: {e}");
            p.log(&format!("Saving failed: {e}"));
            None
        }
    }
}
