use std::io::Write;
use std::process::exit;

use clap::Parser;

use seekers::cli::Args;
use seekers::run_program;

fn main() {
    let args = Args::parse();
    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level))
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .init();

    if let Err(err) = run_program(&args) {
        log::error!("{err}");
        exit(1);
    }
}
