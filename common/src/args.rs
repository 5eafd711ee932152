use std::path::PathBuf;

use clap::Args;

use crate::{DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE, N};

/// Command line shared by every binding.
#[derive(Debug, Clone, Args)]
pub struct BenchArgs {
  /// Report the server version and whether Citus is installed
  #[arg(long, conflicts_with_all = ["cleanup", "batch"])]
  pub test: bool,

  /// Truncate the users table and restart its id sequence
  #[arg(long, conflicts_with = "batch")]
  pub cleanup: bool,

  /// Insert with multi-row statements instead of one row at a time
  #[arg(long)]
  pub batch: bool,

  /// Number of rows to insert
  #[arg(long, default_value_t = N, value_parser = clap::value_parser!(i32).range(0..))]
  pub count: i32,

  /// Rows per insert statement in batch mode
  #[arg(
    long,
    default_value_t = DEFAULT_BATCH_SIZE,
    value_parser = clap::value_parser!(u32).range(1..=MAX_BATCH_SIZE as i64)
  )]
  pub batch_size: u32,

  /// Read connection settings from this file instead of `.env`
  #[arg(long, value_name = "PATH")]
  pub env_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Test,
  Cleanup,
  RowByRow { count: i32 },
  Batch { count: i32, batch_size: usize },
}

impl BenchArgs {
  pub fn mode(&self) -> Mode {
    if self.test {
      return Mode::Test;
    }
    if self.cleanup {
      return Mode::Cleanup;
    }
    if self.batch {
      return Mode::Batch {
        count: self.count,
        batch_size: self.batch_size as usize,
      };
    }
    return Mode::RowByRow { count: self.count };
  }
}
