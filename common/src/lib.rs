mod args;
mod config;
mod error;
mod lease;
pub mod logging;
mod report;
mod runner;
mod user;

pub use args::{BenchArgs, Mode};
pub use config::Config;
pub use error::{BoxError, Error};
pub use lease::Lease;
pub use report::Report;
pub use runner::{log_failure, Connector, Runner, ServerInfo, Session};
pub use user::{batches, users, Batcher, User};

/// Default number of rows inserted by a run.
pub const N: i32 = 100000;

pub const DEFAULT_BATCH_SIZE: u32 = 1000;

/// Each row binds three parameters and a statement may carry at most 65535.
pub const MAX_BATCH_SIZE: u32 = 65535 / 3;

/// Progress is printed every this many rows in row-by-row mode.
pub const PROGRESS_INTERVAL: i32 = 1000;

pub const EXTENSION_NAME: &str = "citus";

pub const CREATE_TABLE_QUERY: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
      id         SERIAL PRIMARY KEY,
      name       TEXT NOT NULL,
      email      TEXT NOT NULL UNIQUE
    )
"#;

pub const BENCHMARK_QUERY: &str = "INSERT INTO users (id, name, email) VALUES ($1, $2, $3)";

pub const TRUNCATE_QUERY: &str = "TRUNCATE TABLE users RESTART IDENTITY";

pub const VERSION_QUERY: &str = "SELECT version()";

pub const EXTENSION_QUERY: &str = "SELECT 1 FROM pg_extension WHERE extname = $1";

pub const COUNT_QUERY: &str = "SELECT COUNT(*) FROM users";

/// Builds a multi-row insert with placeholders for `rows` users.
pub fn batch_insert_query(rows: usize) -> String {
  let values: Vec<String> = (0..rows)
    .map(|row| {
      let base = row * 3;
      format!("(${}, ${}, ${})", base + 1, base + 2, base + 3)
    })
    .collect();

  return format!(
    "INSERT INTO users (id, name, email) VALUES {}",
    values.join(", ")
  );
}
