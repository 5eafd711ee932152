use std::process::ExitCode;

use clap::Parser;
use common::{BenchArgs, Config};
use log::error;
use tokio_postgres_bench::AsyncRunner;

/// Insert benchmark for Citus over the async `tokio-postgres` client.
#[derive(Debug, Parser)]
#[command(name = "tokio_postgres_bench", version, about)]
struct Cli {
  #[command(flatten)]
  bench: BenchArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  common::logging::init();

  let config = match Config::load(cli.bench.env_file.as_deref()) {
    Ok(config) => config,
    Err(err) => {
      error!("{err}");
      return ExitCode::FAILURE;
    }
  };

  let runner = AsyncRunner::new(config);
  return match runner.run(cli.bench.mode()).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(_) => ExitCode::FAILURE,
  };
}
