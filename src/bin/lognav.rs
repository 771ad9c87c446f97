// src/bin/lognav.rs

//! Command-line driver: page through and search a text log file, printing
//! JSON results that carry the marks needed to resume.

use ::anyhow::Context;
use ::clap::{Parser, Subcommand};
use ::serde::Serialize;

use ::lognavlib::data::cursor::Mark;
use ::lognavlib::data::entry::LogEntriesResult;
use ::lognavlib::readers::navigator::LogNavigator;
use ::lognavlib::readers::scanner::RegexScanner;
use ::lognavlib::readers::source::{FileLogSource, LogSource};

use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "lognav",
    version,
    about = "Page through and search append-only logs with resumable cursors"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read one page of entries; positive COUNT pages forward from the
    /// mark, negative pages backward (no mark: the tail)
    Page {
        /// Path of the log file
        log: String,
        /// Mark to start from, as returned by a previous call
        #[arg(long)]
        mark: Option<String>,
        /// Signed entry count selecting direction and page size
        #[arg(long, default_value_t = 10, allow_hyphen_values = true)]
        count: i64,
    },
    /// Read a random-access window centered on a mark
    Window {
        /// Path of the log file
        log: String,
        /// Mark to center on; without one the window starts at the log head
        #[arg(long)]
        mark: Option<String>,
    },
    /// Search for a pattern, incrementally; re-run with the returned mark
    /// to continue an unfinished search
    Search {
        /// Path of the log file
        log: String,
        /// Regular expression matched against each entry
        pattern: String,
        /// Mark to resume from
        #[arg(long)]
        mark: Option<String>,
        /// Signed entry count: direction of the scan and size of the page
        /// returned on a match
        #[arg(long, default_value_t = 10, allow_hyphen_values = true)]
        count: i64,
        /// Wall-clock budget of this round, milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

/// Page output: the entries plus the mark continuing past them.
#[derive(Serialize)]
struct PageOutput {
    #[serde(flatten)]
    result: LogEntriesResult,
    next_mark: Option<Mark>,
}

fn main() -> ::anyhow::Result<()> {
    let cli = Cli::parse();
    let source = FileLogSource::new();
    match cli.command {
        Command::Page { log, mark, count } => {
            let log = source.log(&log)?;
            let access = source.access(&log)?;
            let navigator = LogNavigator::new(source.reader(), access.as_ref());
            let result = navigator.entries(mark.as_deref(), count)?;
            let next_mark: Option<Mark> = result
                .entries()
                .last()
                .map(|entry| access.to_mark(entry.end_offset()));
            print_json(&PageOutput { result, next_mark })?;
        }
        Command::Window { log, mark } => {
            let log = source.log(&log)?;
            let access = source.access(&log)?;
            let navigator = LogNavigator::new(source.reader(), access.as_ref());
            let result = navigator.random_access_entries(mark.as_deref())?;
            let next_mark: Option<Mark> = result
                .entries()
                .last()
                .map(|entry| access.to_mark(entry.end_offset()));
            print_json(&PageOutput { result, next_mark })?;
        }
        Command::Search {
            log,
            pattern,
            mark,
            count,
            timeout_ms,
        } => {
            let scanner = RegexScanner::new(&pattern)?;
            let log = source.log(&log)?;
            let access = source.access(&log)?;
            let navigator = LogNavigator::new(source.reader(), access.as_ref());
            let result = match timeout_ms {
                Some(ms) => navigator.search_with_timeout(
                    &scanner,
                    mark.as_deref(),
                    count,
                    Duration::from_millis(ms),
                )?,
                None => navigator.search(&scanner, mark.as_deref(), count)?,
            };
            print_json(&result)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> ::anyhow::Result<()> {
    let rendered = ::serde_json::to_string_pretty(value).context("serializing result")?;
    println!("{}", rendered);
    Ok(())
}
