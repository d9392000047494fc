//! Runs ecAdd (0x06) on the hex input given as the only argument.
use ecdiff::{
    cli::{exit_on_error, init_tracing, parse_or_exit},
    cmd::ecadd::Cmd,
};

fn main() {
    init_tracing();

    let cmd: Cmd = parse_or_exit("ecadd");
    exit_on_error(cmd.run(&mut std::io::stdout().lock()));
}
