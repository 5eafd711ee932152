//! Error types shared by the benchmark bindings.

use std::error::Error as _;
use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
  /// Establishing the connection failed. Fatal for the run.
  #[error("Connection failed: {}", describe(.0))]
  Connection(#[source] BoxError),

  /// A statement failed. Aborts the current operation only.
  #[error("{}", describe(.0))]
  Query(#[source] BoxError),

  #[error("Invalid value {value:?} for {key}")]
  Config { key: &'static str, value: String },

  #[error("Failed to read {path:?}: {source}")]
  EnvFile {
    path: PathBuf,
    #[source]
    source: dotenvy::Error,
  },
}

impl Error {
  pub fn connection(err: impl Into<BoxError>) -> Self {
    return Error::Connection(err.into());
  }

  pub fn query(err: impl Into<BoxError>) -> Self {
    return Error::Query(err.into());
  }

  /// Fatal errors end the run instead of a single operation.
  pub fn is_fatal(&self) -> bool {
    return !matches!(self, Error::Query(_));
  }
}

/// Renders `err` followed by its sources.
///
/// tokio-postgres displays a server error as just "db error" and keeps the
/// SQLSTATE message in the source.
fn describe(err: &BoxError) -> String {
  let mut message = err.to_string();
  let mut source = err.source();
  while let Some(cause) = source {
    let text = cause.to_string();
    if !message.contains(&text) {
      message.push_str(": ");
      message.push_str(&text);
    }
    source = cause.source();
  }
  return message;
}

impl From<tokio_postgres::Error> for Error {
  fn from(err: tokio_postgres::Error) -> Self {
    return Error::Query(Box::new(err));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_query_errors_are_recoverable() {
    assert!(!Error::query("duplicate key").is_fatal());
    assert!(Error::connection("refused").is_fatal());
    assert!(Error::Config {
      key: "PGPORT",
      value: "abc".to_string()
    }
    .is_fatal());
  }

  #[derive(Debug)]
  struct Server;

  impl std::fmt::Display for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(
        f,
        "ERROR: duplicate key value violates unique constraint \"users_pkey\""
      )
    }
  }

  impl std::error::Error for Server {}

  #[derive(Debug)]
  struct Driver(Server);

  impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "db error")
    }
  }

  impl std::error::Error for Driver {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
      Some(&self.0)
    }
  }

  #[test]
  fn server_message_is_part_of_the_error() {
    let err = Error::query(Driver(Server));
    assert_eq!(
      err.to_string(),
      "db error: ERROR: duplicate key value violates unique constraint \"users_pkey\""
    );
    assert!(err.to_string().contains("duplicate key"));

    let err = Error::connection(Driver(Server));
    assert!(err
      .to_string()
      .starts_with("Connection failed: db error: ERROR: duplicate key"));
  }

  #[test]
  fn sources_already_in_the_message_are_not_repeated() {
    #[derive(Debug)]
    struct Verbose(Server);

    impl std::fmt::Display for Verbose {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "db error: {}", self.0)
      }
    }

    impl std::error::Error for Verbose {
      fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
      }
    }

    let err = Error::query(Verbose(Server));
    assert_eq!(err.to_string().matches("duplicate key").count(), 1);
  }

  #[test]
  fn messages() {
    assert_eq!(
      Error::connection("refused").to_string(),
      "Connection failed: refused"
    );
    assert_eq!(Error::query("duplicate key").to_string(), "duplicate key");
    assert_eq!(
      Error::Config {
        key: "PGPORT",
        value: "abc".to_string()
      }
      .to_string(),
      "Invalid value \"abc\" for PGPORT"
    );
  }
}
