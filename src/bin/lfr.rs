// src/bin/lfr.rs

//! Driver program _lfr_ drives the [_lfrlib_].
//!
//! Processes user-passed command-line arguments into a [`ReaderConfig`].
//! Then reads records from a [`PacedLogReader`] and prints each record to
//! STDOUT, optionally prefixed per a [`PrefixTransform`].
//!
//! A record without a parseable timestamp (when passed `--use-timestamps`)
//! is skipped; the reader already printed a warning. Any other error ends
//! processing.
//!
//! Ctrl-C stops the reader promptly, including during a pacing sleep or
//! while tailing.
//!
//! If passed CLI option `--summary`, prints a [`Summary`] to STDERR after
//! processing.
//!
//! [_lfrlib_]: lfrlib
//! [`ReaderConfig`]: lfrlib::readers::pacedlogreader::ReaderConfig
//! [`PacedLogReader`]: lfrlib::readers::pacedlogreader::PacedLogReader
//! [`PrefixTransform`]: lfrlib::transforms::prefix::PrefixTransform
//! [`Summary`]: lfrlib::readers::summary::Summary

#![allow(non_camel_case_types)]

use std::io::Write; // for `stdout.write_all`
use std::process::ExitCode;
use std::time::Duration;

use ::anyhow::Context; // for `context`
use ::clap::Parser;
use ::const_format::concatcp;
#[allow(unused_imports)]
use ::si_trace_print::stack::stack_offset_set;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use ::lfrlib::common::{Count, FPath, Record, ResultS3};
use ::lfrlib::data::datetime::{dt_pattern_validate, DATE_FORMAT};
use ::lfrlib::debug::printers::{de_err, e_err};
use ::lfrlib::readers::pacedlogreader::{PacedLogReader, ReaderConfig};
use ::lfrlib::readers::stopsignal::StopSignal;
use ::lfrlib::readers::summary::Summary;
use ::lfrlib::transforms::prefix::{PrefixTransform, PREFIX_SEP_DEFAULT};

// --------------------
// command-line parsing

/// `--retry-interval` default as a `str` for clap.
const CLI_RETRY_INTERVAL_DEFAULT: &str = "0.1";

#[cfg(test)]
const CLI_HELP_AFTER_NOTE_TEST: &str = "\nTEST BUILD";
#[cfg(not(test))]
const CLI_HELP_AFTER_NOTE_TEST: &str = "";

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
Files matching FILEBASE followed by any suffix are read in sorted order as one
stream of records, e.g. FILEBASE \"/var/log/ship.log\" reads
\"/var/log/ship.log\", \"/var/log/ship.log.1\", \"/var/log/ship.log.2\".
If FILEBASE is not passed then records are read from STDIN.

With --use-timestamps, each record must begin with a timestamp followed by a
single space, e.g.
    2020-01-01T00:00:00.000000Z hello
The default --date-format is \"",
    DATE_FORMAT,
    "\".
Records without a parseable timestamp are skipped with a warning.
",
    CLI_HELP_AFTER_NOTE_TEST,
);

/// clap command-line arguments build-time definitions.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "lfr",
    // write expanded information for the `--version` output
    version = concatcp!(
        "(Log File Reader)\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
        "Author: ", env!("CARGO_PKG_AUTHORS"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Base path of log files. Files with this path followed by any
    /// suffix are read. If not passed then read STDIN.
    #[clap(
        required = false,
        verbatim_doc_comment,
    )]
    filebase: Option<FPath>,

    /// At the end of the last file, wait for more records to be appended.
    #[clap(
        short = 't',
        long,
        verbatim_doc_comment,
    )]
    tail: bool,

    /// At the end of the last file, wait for new files matching FILEBASE.
    #[clap(
        short = 'r',
        long,
        verbatim_doc_comment,
    )]
    refresh: bool,

    /// With --tail or --refresh, seconds between looking for new records or
    /// new files.
    #[clap(
        long,
        verbatim_doc_comment,
        value_parser = cli_parse_seconds,
        default_value = CLI_RETRY_INTERVAL_DEFAULT,
    )]
    retry_interval: Duration,

    /// Fixed minimum seconds between printed records.
    /// Can not be passed with --use-timestamps.
    #[clap(
        short = 'i',
        long,
        verbatim_doc_comment,
        value_parser = cli_parse_seconds,
    )]
    interval: Option<Duration>,

    /// Replay records with their original pacing, per the timestamp leading
    /// each record.
    #[clap(
        short = 'u',
        long,
        verbatim_doc_comment,
    )]
    use_timestamps: bool,

    /// strftime format of the timestamp leading each record.
    #[clap(
        short = 'd',
        long,
        verbatim_doc_comment,
        value_parser = cli_parse_date_format,
        default_value = DATE_FORMAT,
    )]
    date_format: String,

    /// Prepend this string to each printed record.
    #[clap(
        short = 'p',
        long,
        verbatim_doc_comment,
    )]
    prefix: Option<String>,

    /// Separator between --prefix and the record.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value = PREFIX_SEP_DEFAULT,
    )]
    prefix_sep: String,

    /// Print a summary of reading activity to STDERR after processing.
    #[clap(
        short = 's',
        long,
        verbatim_doc_comment,
    )]
    summary: bool,
}

/// `clap` argument parser for seconds, e.g. `"2"` or `"0.25"`.
fn cli_parse_seconds(seconds: &str) -> std::result::Result<Duration, String> {
    defñ!("cli_parse_seconds({:?})", seconds);
    let secs: f64 = match seconds.parse::<f64>() {
        Ok(val) => val,
        Err(err) => return Err(format!("Unable to parse seconds {:?}; {}", seconds, err)),
    };
    match Duration::try_from_secs_f64(secs) {
        Ok(val) => Ok(val),
        Err(err) => Err(format!("Unusable seconds {:?}; {}", seconds, err)),
    }
}

/// `clap` argument validator for `--date-format`.
fn cli_parse_date_format(date_format: &str) -> std::result::Result<String, String> {
    defñ!("cli_parse_date_format({:?})", date_format);
    dt_pattern_validate(date_format)?;

    Ok(String::from(date_format))
}

/// Process the user-passed command-line arguments.
fn cli_process_args() -> (ReaderConfig, Option<PrefixTransform>, bool) {
    let args = CLI_Args::parse();
    defo!("args {:?}", args);

    let config = ReaderConfig {
        filebase: args.filebase,
        tail: args.tail,
        refresh: args.refresh,
        retry_interval: args.retry_interval,
        interval: args.interval.unwrap_or(Duration::ZERO),
        use_timestamps: args.use_timestamps,
        date_format: args.date_format,
    };
    let prefix: Option<PrefixTransform> = args
        .prefix
        .map(|prefix| PrefixTransform::new_with_sep(prefix.as_str(), args.prefix_sep.as_str()));

    (config, prefix, args.summary)
}

// --------------------
// processing

/// Set a process signal handler that stops the reader.
fn set_signal_handler(stop: StopSignal) -> anyhow::Result<()> {
    defn!();
    ctrlc::set_handler(move || {
        defñ!("signal handler; stop");
        stop.stop();
    })
    .context("failed to set the Ctrl-C handler")?;
    defx!();

    Ok(())
}

/// Write the `buffer` to stdout followed by a newline.
fn write_stdout(buffer: &[u8]) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut stdout_lock = stdout.lock();
    stdout_lock.write_all(buffer)?;
    stdout_lock.write_all(b"\n")?;
    // flush per record so tailed records are seen promptly
    stdout_lock.flush()
}

/// Read and print all records.
///
/// Returns the first fatal error, as a `String`.
fn processing_loop(
    reader: &mut PacedLogReader,
    prefix: &Option<PrefixTransform>,
) -> Option<String> {
    defn!();
    let mut printed: Count = 0;
    loop {
        let record: Record = match reader.read() {
            ResultS3::Found(record) => record,
            ResultS3::Done => break,
            ResultS3::Err(err) if err.is_record_format() => {
                // already printed by the reader
                continue;
            }
            ResultS3::Err(err) => {
                e_err!("{}", err);
                defx!("printed {}; error {}", printed, err);
                return Some(err.to_string());
            }
        };
        let record: Record = match prefix {
            Some(prefix_) => match prefix_.transform(Some(record.as_str())) {
                Some(val) => val,
                None => record,
            },
            None => record,
        };
        if let Err(err) = write_stdout(record.as_bytes()) {
            // e.g. stdout closed early by `head`
            de_err!("write_stdout error {}", err);
            reader.stop_signal().stop();
            defx!("printed {}; stdout error {}", printed, err);
            return None;
        }
        printed += 1;
    }
    defx!("printed {}", printed);

    None
}

/// Process the user-passed command-line arguments.
/// Start function `processing_loop`.
/// Determine a process return code.
pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();

    let (config, prefix, cli_opt_summary) = cli_process_args();

    let mut reader: PacedLogReader = match PacedLogReader::new(config) {
        Ok(val) => val,
        Err(err) => {
            e_err!("{}", err);
            defx!("PacedLogReader::new error; exitcode FAILURE");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = set_signal_handler(reader.stop_signal()) {
        e_err!("{:?}", err);
        return ExitCode::FAILURE;
    }

    let error: Option<String> = processing_loop(&mut reader, &prefix);

    if cli_opt_summary {
        let summary = Summary::new(
            reader.summary(),
            Some(reader.summary_filesequencer()),
            error.clone(),
        );
        eprintln!("\nSummary:\n{}", summary);
    }

    let exitcode = match error {
        Some(_) => ExitCode::FAILURE,
        None => ExitCode::SUCCESS,
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}

// --------------------
// tests
