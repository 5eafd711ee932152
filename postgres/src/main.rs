use std::process::ExitCode;

use clap::Parser;
use common::{BenchArgs, Config, Runner};
use log::error;
use postgres_bench::PgConnector;

/// Insert benchmark for Citus over the sync `postgres` client.
#[derive(Debug, Parser)]
#[command(name = "postgres_bench", version, about)]
struct Cli {
  #[command(flatten)]
  bench: BenchArgs,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  common::logging::init();

  let config = match Config::load(cli.bench.env_file.as_deref()) {
    Ok(config) => config,
    Err(err) => {
      error!("{err}");
      return ExitCode::FAILURE;
    }
  };

  let runner = Runner::new(PgConnector, config);
  return match runner.run(cli.bench.mode()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(_) => ExitCode::FAILURE,
  };
}
