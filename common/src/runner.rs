//! The insert benchmark, written once against the `Session` seam.
//!
//! Every operation leases its own connection. Insert procedures return their
//! error instead of unwinding, and the caller rolls back on that branch.

use std::time::Instant;

use log::{error, warn};

use crate::args::Mode;
use crate::config::Config;
use crate::error::Error;
use crate::lease::Lease;
use crate::report::Report;
use crate::user::{batches, users, User};
use crate::{EXTENSION_NAME, PROGRESS_INTERVAL};

/// One open database connection.
pub trait Session {
  fn server_version(&mut self) -> Result<String, Error>;
  fn has_extension(&mut self, name: &str) -> Result<bool, Error>;

  /// Must be idempotent.
  fn create_table(&mut self) -> Result<(), Error>;

  fn begin(&mut self) -> Result<(), Error>;
  fn commit(&mut self) -> Result<(), Error>;
  fn rollback(&mut self) -> Result<(), Error>;

  fn insert_row(&mut self, user: &User) -> Result<(), Error>;

  /// One multi-row statement covering all of `users`.
  fn insert_batch(&mut self, users: &[User]) -> Result<(), Error>;

  fn truncate(&mut self) -> Result<(), Error>;
  fn count_rows(&mut self) -> Result<i64, Error>;
}

pub trait Connector {
  type Session: Session;

  /// Failures must be reported as `Error::Connection`.
  fn connect(&self, config: &Config) -> Result<Self::Session, Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
  pub version: String,
  pub citus: bool,
}

pub struct Runner<C> {
  connector: C,
  config: Config,
}

impl<C: Connector> Runner<C> {
  pub fn new(connector: C, config: Config) -> Self {
    return Self { connector, config };
  }

  fn open(&self) -> Result<Lease<C::Session>, Error> {
    let session = self.connector.connect(&self.config)?;
    return Ok(Lease::new(session));
  }

  /// Runs `mode`, logging a failure with the operation's context.
  pub fn run(&self, mode: Mode) -> Result<(), Error> {
    let result = match mode {
      Mode::Test => self.test_connection().map(|_| ()),
      Mode::Cleanup => self.cleanup(),
      Mode::RowByRow { count } => self.insert_row_by_row(count).map(|_| ()),
      Mode::Batch { count, batch_size } => self.insert_batched(count, batch_size).map(|_| ()),
    };

    if let Err(ref err) = result {
      log_failure(mode, err);
    }
    return result;
  }

  pub fn test_connection(&self) -> Result<ServerInfo, Error> {
    let mut conn = self.open()?;

    let version = conn.server_version()?;
    println!("PostgreSQL Version: {version}");

    let citus = conn.has_extension(EXTENSION_NAME)?;
    if citus {
      println!("Citus extension is installed and active");
    } else {
      println!("Citus extension not found");
    }

    return Ok(ServerInfo { version, citus });
  }

  pub fn insert_row_by_row(&self, count: i32) -> Result<Report, Error> {
    let mut conn = self.open()?;
    conn.create_table()?;
    println!("Users table ready...");

    let start = Instant::now();
    println!("Starting insert benchmark...");

    conn.begin()?;
    if let Err(err) = insert_rows(&mut *conn, count) {
      rollback(&mut *conn);
      return Err(err);
    }
    conn.commit()?;

    let report = Report::new(u64::try_from(count).unwrap_or(0), start.elapsed());
    println!("Insert completed successfully!");
    println!("{report}");
    return Ok(report);
  }

  pub fn insert_batched(&self, count: i32, batch_size: usize) -> Result<Report, Error> {
    let mut conn = self.open()?;
    conn.create_table()?;
    println!("Users table ready...");

    let start = Instant::now();
    println!("Starting batch insert benchmark...");

    conn.begin()?;
    if let Err(err) = insert_batches(&mut *conn, count, batch_size) {
      rollback(&mut *conn);
      return Err(err);
    }
    conn.commit()?;

    let report = Report::new(u64::try_from(count).unwrap_or(0), start.elapsed());
    println!("Batch insert completed successfully!");
    println!("{report}");
    return Ok(report);
  }

  pub fn cleanup(&self) -> Result<(), Error> {
    let mut conn = self.open()?;
    conn.truncate()?;
    println!("Users table truncated successfully");
    return Ok(());
  }

  pub fn count_rows(&self) -> Result<i64, Error> {
    let mut conn = self.open()?;
    return conn.count_rows();
  }
}

fn insert_rows(session: &mut impl Session, count: i32) -> Result<(), Error> {
  for user in users(count) {
    session.insert_row(&user)?;

    if user.id % PROGRESS_INTERVAL == 0 {
      println!("Inserted: {}", user.id);
    }
  }
  return Ok(());
}

fn insert_batches(session: &mut impl Session, count: i32, batch_size: usize) -> Result<(), Error> {
  let mut inserted = 0;
  for batch in batches(count, batch_size) {
    session.insert_batch(&batch)?;
    inserted += batch.len();
    println!("Inserted: {inserted}");
  }
  return Ok(());
}

pub fn log_failure(mode: Mode, err: &Error) {
  if err.is_fatal() {
    error!("{err}");
    return;
  }

  let context = match mode {
    Mode::Test => "Error testing connection",
    Mode::Cleanup => "Error during cleanup",
    Mode::RowByRow { .. } => "Error during insert",
    Mode::Batch { .. } => "Error during batch insert",
  };
  error!("{context}: {err}");
}

/// The insert error is what gets reported, a failed rollback is only logged.
fn rollback(session: &mut impl Session) {
  if let Err(err) = session.rollback() {
    warn!("Rollback failed: {err}");
  }
}
