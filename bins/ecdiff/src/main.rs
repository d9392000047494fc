//! `ecdiff`: the three precompile commands and the input generator in one binary.
use ecdiff::{
    cli::{exit_on_error, init_tracing, parse_or_exit},
    cmd::MainCmd,
};

fn main() {
    init_tracing();

    let cmd: MainCmd = parse_or_exit("ecdiff");
    exit_on_error(cmd.run(&mut std::io::stdout().lock()));
}
