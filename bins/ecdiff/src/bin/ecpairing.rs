//! Runs ecPairing (0x08) on the hex input given as the only argument.
use ecdiff::{
    cli::{exit_on_error, init_tracing, parse_or_exit},
    cmd::ecpairing::Cmd,
};

fn main() {
    init_tracing();

    let cmd: Cmd = parse_or_exit("ecpairing");
    exit_on_error(cmd.run(&mut std::io::stdout().lock()));
}
