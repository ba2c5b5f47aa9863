use std::{
    error::Error,
    fs,
    io::{self, BufWriter, Read, Write},
    process,
};

use clap::{command, Parser, ValueHint};
use log::{debug, error, info, LevelFilter};
use serde::Serialize;

use tonearm::{
    config::{self, Config, Kind},
    protocol::{CommandOutcome, Directory, Entry, Music, PlaylistFile, Record, Response},
};

/// Profile to display when not built in release mode.
#[cfg(debug_assertions)]
const BUILD_PROFILE: &str = "debug";
/// Profile to display when not built release mode.
#[cfg(not(debug_assertions))]
const BUILD_PROFILE: &str = "release";

/// Group name for mutually exclusive logging options.
const ARGS_GROUP_LOGGING: &str = "logging";

/// Command line arguments as parsed by `clap`.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    ///
    /// Settings in this file are overridden by command line arguments. A
    /// missing file is not an error.
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath, default_value_t = String::from(config::DEFAULT_FILE))]
    config: String,

    /// Captured server reply to read
    ///
    /// The reply must include its terminating `OK` or `ACK` line.
    ///
    /// [default: standard input]
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    input: Option<String>,

    /// Records to read: entries, music, directories or playlists
    #[arg(short, long)]
    kind: Option<Kind>,

    /// Print records from last to first
    #[arg(short, long, default_value_t = false)]
    reverse: bool,

    /// Print only the record at this index
    #[arg(long, value_name = "N", conflicts_with = "count")]
    index: Option<usize>,

    /// Print only the number of records
    #[arg(long, default_value_t = false)]
    count: bool,

    /// Pretty-print JSON output
    #[arg(short, long, default_value_t = false)]
    pretty: bool,

    /// Suppresses all output except warnings and errors.
    #[arg(short, long, default_value_t = false, group = ARGS_GROUP_LOGGING)]
    quiet: bool,

    /// Enable verbose logging
    ///
    /// Specify twice for trace logging.
    #[arg(short, long, action = clap::ArgAction::Count, group = ARGS_GROUP_LOGGING)]
    verbose: u8,
}

/// Initializes the logger facade.
///
/// The logging level is determined as follows, in order of precedence from
/// highest to lowest:
/// 1. Command line arguments
/// 2. `RUST_LOG` environment variable
/// 3. Hard coded default
///
/// # Panics
///
/// Panics when a logger facade is already initialized.
fn init_logger(config: &Args) {
    let mut logger = env_logger::Builder::from_env(
        // Note: if you change the default logging level here, then you should
        // probably also change the verbosity levels below.
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    if config.quiet || config.verbose > 0 {
        let level = match config.verbose {
            0 => {
                // Quiet and verbose are mutually exclusive, and `verbose` is 0
                // by default. So this arm means: quiet mode.
                LevelFilter::Warn
            }
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        // Filter log messages of external crates.
        logger.filter_module("tonearm", level);
    }

    // Records go to standard output; keep logging on standard error.
    logger.target(env_logger::Target::Stderr);
    logger.init();
}

/// Reads the captured reply from a file, or from standard input.
fn read_input(input: Option<&str>) -> io::Result<String> {
    match input {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut reply = String::new();
            io::stdin().lock().read_to_string(&mut reply)?;
            Ok(reply)
        }
    }
}

/// Writes one record as a line of JSON.
fn write_record<W, T>(out: &mut W, record: &T, pretty: bool) -> tonearm::error::Result<()>
where
    W: Write,
    T: Serialize,
{
    if pretty {
        serde_json::to_writer_pretty(&mut *out, record)?;
    } else {
        serde_json::to_writer(&mut *out, record)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Reads the reply as records of type `T` and prints them.
fn print<T>(outcome: &CommandOutcome, args: &Args, config: &Config) -> tonearm::error::Result<()>
where
    T: Record + Serialize,
{
    let response = Response::<T>::new(outcome)?;
    info!("read {} records as {}", response.size(), config.kind);

    let mut out = BufWriter::new(io::stdout().lock());

    if args.count {
        writeln!(out, "{}", response.size())?;
    } else if let Some(index) = args.index {
        write_record(&mut out, &response.get(index)?, config.pretty)?;
    } else if config.reverse {
        for record in response.iter_rev() {
            write_record(&mut out, &record, config.pretty)?;
        }
    } else {
        for record in &response {
            write_record(&mut out, &record, config.pretty)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Main application logic.
///
/// # Errors
///
/// This function returns an error when the configuration or the input
/// cannot be read, when the server reply is a failure, or when a requested
/// index is out of range.
fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load_or_default(&args.config)?;
    if let Some(kind) = args.kind {
        config.kind = kind;
    }
    config.reverse |= args.reverse;
    config.pretty |= args.pretty;
    debug!("{config:#?}");

    let reply = read_input(args.input.as_deref())?;
    let outcome = CommandOutcome::from_reply(&reply);
    if let Some(e) = outcome.failure() {
        return Err(format!("command failed: {e}").into());
    }

    match config.kind {
        Kind::Entries => print::<Entry>(&outcome, args, &config)?,
        Kind::Music => print::<Music>(&outcome, args, &config)?,
        Kind::Directories => print::<Directory>(&outcome, args, &config)?,
        Kind::Playlists => print::<PlaylistFile>(&outcome, args, &config)?,
    }

    Ok(())
}

/// Main entry point of the application.
///
/// This function initializes the logger facade, parses the command line
/// arguments, and prints the records of the captured reply.
fn main() {
    // `clap` handles our command line arguments and help text.
    let args = Args::parse();
    init_logger(&args);

    // Dump command line arguments before we do anything more.
    // This aids in debugging of whatever comes next.
    debug!("Command {:#?}", args);

    let cmd = command!();
    let name = cmd.get_name().to_string();
    let version = cmd.get_version().unwrap_or("UNKNOWN").to_string();

    debug!("starting {name}/{version}; {BUILD_PROFILE}");

    if let Err(e) = run(&args) {
        error!("{e}");
        process::exit(1);
    }
}
