//! Process setup shared by the binaries.
use clap::Parser;
use std::{fmt::Display, io, process};
use tracing_subscriber::EnvFilter;

/// Installs a stderr `tracing` subscriber.
///
/// Filtered by `RUST_LOG`, everything is off when it is unset so stdout and
/// stderr only carry the oracle output.
pub fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::OFF.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Parses the command line as `name`, exiting on failure.
///
/// Usage errors exit with code 1 instead of clap's 2. `--help` and
/// `--version` print to stdout and exit with 0.
pub fn parse_or_exit<T: Parser>(name: &'static str) -> T {
    let parsed = T::command()
        .name(name)
        .try_get_matches()
        .and_then(|matches| T::from_arg_matches(&matches));

    match parsed {
        Ok(cmd) => cmd,
        Err(err) => {
            let _ = err.print();
            process::exit(if err.use_stderr() { 1 } else { 0 })
        }
    }
}

/// Prints the error to stderr and exits with code 1.
pub fn exit_on_error<E: Display>(result: Result<(), E>) {
    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(1);
    }
}
