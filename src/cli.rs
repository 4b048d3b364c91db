// src/cli.rs
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;

use chrono::{ Local, NaiveDate };
use clap::{ Parser, ValueEnum };
use color_eyre::eyre::{ bail, eyre, Result, WrapErr };

use crate::config::codes::{ self, TimePreset, BID_TYPES, ZONES };
use crate::config::consts::*;
use crate::config::options::{ AppOptions, CrawlOptions, ExportFormat, ExportOptions, HeaderLayout, NotifyOptions };
use crate::core::net::HttpTransport;
use crate::core::CancelToken;
use crate::engine::{ CrawlEvent, CrawlTask, Outcome, SearchFilter };
use crate::file::CsvTableWriter;
use crate::logging;
use crate::notify::{ LogNotifier, Notifier, OutboxNotifier };
use crate::progress::Progress;
use crate::runner::{ self, Sinks };

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Csv,
    Tsv,
}

/// Search ccgp.gov.cn announcements and save the ones not seen before.
#[derive(Debug, Parser)]
#[command(name = "ccgp_scrape", version, about)]
struct Args {
    /// Search keyword
    #[arg(short, long, default_value = DEFAULT_KEYWORD)]
    keyword: String,

    /// Buyer (采购人) name filter
    #[arg(long, default_value = "")]
    buyer: String,

    /// Agency (代理机构) name filter
    #[arg(long, default_value = "")]
    agent: String,

    /// Announcement type, by code (0-12) or name, e.g. 7 or 中标公告
    #[arg(short = 't', long, value_name = "TYPE", default_value = "0")]
    bid_type: String,

    /// Province, by name or code; 全国 for nationwide
    #[arg(short, long, default_value = DEFAULT_ZONE)]
    zone: String,

    /// Date range ending today: today, 3days, 1week, 2weeks, 1month, 3months, 6months, 1year
    #[arg(short, long, value_name = "PRESET", conflicts_with_all = ["start", "end"])]
    preset: Option<String>,

    /// First day, YYYY-MM-DD
    #[arg(long, value_name = "DATE")]
    start: Option<NaiveDate>,

    /// Last day, YYYY-MM-DD (default: today)
    #[arg(long, value_name = "DATE")]
    end: Option<NaiveDate>,

    /// Minimum pause before each request, seconds
    #[arg(long, value_name = "SECS", default_value_t = MIN_DELAY_SECS)]
    min_delay: u64,

    /// Maximum pause before each request, seconds
    #[arg(long, value_name = "SECS", default_value_t = MAX_DELAY_SECS)]
    max_delay: u64,

    /// Per-request timeout, seconds
    #[arg(long, value_name = "SECS", default_value_t = REQUEST_TIMEOUT_SECS)]
    timeout: u64,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUT_DIR)]
    out_dir: PathBuf,

    /// Output file name prefix
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    format: FormatArg,

    /// Use the 类型/招标人/区域 column layout
    #[arg(long)]
    legacy_header: bool,

    /// Earlier output (.xlsx/.xls/.csv/.tsv); titles found there are dropped
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Do not write the result file
    #[arg(long)]
    no_save: bool,

    /// Send a notification when new announcements are found
    #[arg(long)]
    notify: bool,

    /// Write notifications as .html files here instead of only logging them
    #[arg(long, value_name = "DIR", requires = "notify")]
    outbox: Option<PathBuf>,

    /// Print the province table and exit
    #[arg(long)]
    list_zones: bool,

    /// Print the announcement type table and exit
    #[arg(long)]
    list_bid_types: bool,

    /// -v debug, -vv trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    logging::init(logging::level_for(args.verbose));

    if args.list_zones {
        for (name, code) in ZONES {
            println!("{code}\t{name}");
        }
        return Ok(());
    }
    if args.list_bid_types {
        for (code, name) in BID_TYPES {
            println!("{code}\t{name}");
        }
        return Ok(());
    }

    let filter = build_filter(&args, Local::now().date_naive())?;
    let opts = build_options(&args);
    opts.validate()?;

    let known = runner::known_titles(&opts);
    let transport = HttpTransport::new(&opts.crawl)?;
    let task = CrawlTask::spawn(filter, transport, opts.crawl.clone())?;
    watch_interrupt(task.cancel_token())?;
    watch_stdin(task.cancel_token());
    println!("Crawling… press Ctrl+C or Enter to stop and keep what was collected.");

    let mut console = Console;
    let mut report = None;
    for ev in task.events().iter() {
        match ev {
            CrawlEvent::Status(msg) => console.log(&msg),
            CrawlEvent::Progress { page, pages } => println!("[{page}/{pages}]"),
            CrawlEvent::Record(rec) => println!("  #{} {} {}", rec.seq, rec.date, rec.title),
            CrawlEvent::Finished(r) => report = Some(r),
            CrawlEvent::Failed(msg) => bail!("crawl failed: {msg}"),
        }
    }
    let report = report.ok_or_else(|| eyre!("crawl worker exited without a report"))?;

    let writer = CsvTableWriter::new(opts.export.format);
    let outbox = opts.notify.outbox.as_ref().map(|dir| OutboxNotifier::new(dir.clone()));
    let notifier: Option<&dyn Notifier> = match (opts.notify.enabled, &outbox) {
        (false, _) => None,
        (true, Some(o)) => Some(o),
        (true, None) => Some(&LogNotifier),
    };

    let summary = runner::finish_run(
        &report,
        &opts,
        &known,
        Sinks { writer: &writer, notifier },
        Some(&mut console),
    );

    match &report.outcome {
        Outcome::Done => println!("Done."),
        Outcome::Stopped(reason) => println!("Stopped: {reason}"),
    }
    println!("Fetched:  {}", summary.fetched);
    if let Some(n) = summary.new_records {
        println!("New:      {n}");
    }
    if let Some(p) = &summary.written {
        println!("Saved to: {}", p.display());
    }
    Ok(())
}

struct Console;

impl Progress for Console {
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
}

/// Ctrl+C cancels the crawl instead of killing the process, so the records
/// so far still reach the interrupted file. A second Ctrl+C exits at once.
fn watch_interrupt(token: CancelToken) -> Result<()> {
    ctrlc::set_handler(move || {
        if !on_interrupt(&token) {
            std::process::exit(130);
        }
    })
    .wrap_err("could not install the Ctrl+C handler")
}

/// `false` when a stop was already requested and the process should quit.
fn on_interrupt(token: &CancelToken) -> bool {
    if token.is_cancelled() {
        return false;
    }
    println!("Interrupted; saving what was collected…");
    token.cancel();
    true
}

/// Any line on stdin ("", "q", "quit", …) requests a stop.
fn watch_stdin(token: CancelToken) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) > 0 {
            println!("Stopping after the current step…");
            token.cancel();
        }
    });
}

fn build_filter(args: &Args, today: NaiveDate) -> Result<SearchFilter> {
    let bid_type = codes::parse_bid_type(&args.bid_type)
        .ok_or_else(|| eyre!("unknown announcement type '{}' (see --list-bid-types)", args.bid_type))?;
    let zone = codes::parse_zone(&args.zone)
        .ok_or_else(|| eyre!("unknown zone '{}' (see --list-zones)", args.zone))?;

    let (start, end) = match (&args.preset, args.start) {
        (Some(p), _) => TimePreset::parse(p)
            .ok_or_else(|| eyre!("unknown preset '{p}'"))?
            .range(today),
        (None, Some(start)) => (start, args.end.unwrap_or(today)),
        (None, None) => match args.end {
            Some(end) => (end, end),
            None => TimePreset::ThreeDays.range(today),
        },
    };

    SearchFilter::builder(start, end)
        .keyword(args.keyword.as_str())
        .buyer(args.buyer.as_str())
        .agent(args.agent.as_str())
        .bid_type(bid_type)
        .zone(zone)
        .build()
        .wrap_err("invalid search")
}

fn build_options(args: &Args) -> AppOptions {
    AppOptions {
        crawl: CrawlOptions {
            min_delay_secs: args.min_delay,
            max_delay_secs: args.max_delay,
            timeout_secs: args.timeout,
            ..Default::default()
        },
        export: ExportOptions {
            format: match args.format {
                FormatArg::Csv => ExportFormat::Csv,
                FormatArg::Tsv => ExportFormat::Tsv,
            },
            layout: if args.legacy_header { HeaderLayout::Legacy } else { HeaderLayout::Keyword },
            dir: args.out_dir.clone(),
            prefix: args.prefix.clone(),
            auto_save: !args.no_save,
            history: args.history.clone(),
        },
        notify: NotifyOptions { enabled: args.notify, outbox: args.outbox.clone() },
    }
}
