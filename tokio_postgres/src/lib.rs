//! Async binding over `tokio-postgres`.
//!
//! Same contract as the sync runner, but written directly against the client:
//! each operation owns a `Client` whose connection task is spawned on the
//! current runtime and ends when the client is dropped.

use std::time::Instant;

use common::{
  batch_insert_query, batches, log_failure, users, Config, Error, Lease, Mode, Report, ServerInfo,
  BENCHMARK_QUERY, COUNT_QUERY, CREATE_TABLE_QUERY, EXTENSION_NAME, EXTENSION_QUERY,
  PROGRESS_INTERVAL, TRUNCATE_QUERY, VERSION_QUERY,
};
use log::{error, warn};
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, Statement, Transaction};

const NAME: &str = "tokio_postgres_bench";

pub async fn connect(config: &Config) -> Result<Lease<Client>, Error> {
  let (client, connection) = tokio_postgres::Config::new()
    .host(&config.host)
    .port(config.port)
    .dbname(&config.dbname)
    .user(&config.user)
    .password(&config.password)
    .application_name(NAME)
    .connect(NoTls)
    .await
    .map_err(Error::connection)?;

  tokio::spawn(async move {
    if let Err(err) = connection.await {
      error!("connection error: {err}");
    }
  });

  return Ok(Lease::new(client));
}

pub struct AsyncRunner {
  config: Config,
}

impl AsyncRunner {
  pub fn new(config: Config) -> Self {
    return Self { config };
  }

  pub async fn run(&self, mode: Mode) -> Result<(), Error> {
    let result = match mode {
      Mode::Test => self.test_connection().await.map(|_| ()),
      Mode::Cleanup => self.cleanup().await,
      Mode::RowByRow { count } => self.insert_row_by_row(count).await.map(|_| ()),
      Mode::Batch { count, batch_size } => {
        self.insert_batched(count, batch_size).await.map(|_| ())
      }
    };

    if let Err(ref err) = result {
      log_failure(mode, err);
    }
    return result;
  }

  pub async fn test_connection(&self) -> Result<ServerInfo, Error> {
    let client = connect(&self.config).await?;

    let version: String = client.query_one(VERSION_QUERY, &[]).await?.try_get(0)?;
    println!("PostgreSQL Version: {version}");

    let citus = client
      .query_opt(EXTENSION_QUERY, &[&EXTENSION_NAME])
      .await?
      .is_some();
    if citus {
      println!("Citus extension is installed and active");
    } else {
      println!("Citus extension not found");
    }

    return Ok(ServerInfo { version, citus });
  }

  pub async fn insert_row_by_row(&self, count: i32) -> Result<Report, Error> {
    let mut client = connect(&self.config).await?;
    client.batch_execute(CREATE_TABLE_QUERY).await?;
    println!("Users table ready...");

    let start = Instant::now();
    println!("Starting insert benchmark...");

    let tx = client.transaction().await?;
    if let Err(err) = insert_rows(&tx, count).await {
      rollback(tx).await;
      return Err(err);
    }
    tx.commit().await?;

    let report = Report::new(u64::try_from(count).unwrap_or(0), start.elapsed());
    println!("Insert completed successfully!");
    println!("{report}");
    return Ok(report);
  }

  pub async fn insert_batched(&self, count: i32, batch_size: usize) -> Result<Report, Error> {
    let mut client = connect(&self.config).await?;
    client.batch_execute(CREATE_TABLE_QUERY).await?;
    println!("Users table ready...");

    let start = Instant::now();
    println!("Starting batch insert benchmark...");

    let tx = client.transaction().await?;
    if let Err(err) = insert_batches(&tx, count, batch_size).await {
      rollback(tx).await;
      return Err(err);
    }
    tx.commit().await?;

    let report = Report::new(u64::try_from(count).unwrap_or(0), start.elapsed());
    println!("Batch insert completed successfully!");
    println!("{report}");
    return Ok(report);
  }

  pub async fn cleanup(&self) -> Result<(), Error> {
    let client = connect(&self.config).await?;
    client.batch_execute(TRUNCATE_QUERY).await?;
    println!("Users table truncated successfully");
    return Ok(());
  }

  pub async fn count_rows(&self) -> Result<i64, Error> {
    let client = connect(&self.config).await?;
    return Ok(client.query_one(COUNT_QUERY, &[]).await?.try_get(0)?);
  }
}

async fn insert_rows(tx: &Transaction<'_>, count: i32) -> Result<(), Error> {
  let stmt = tx.prepare(BENCHMARK_QUERY).await?;

  for user in users(count) {
    tx.execute(&stmt, &[&user.id, &user.name, &user.email])
      .await?;

    if user.id % PROGRESS_INTERVAL == 0 {
      println!("Inserted: {}", user.id);
    }
  }
  return Ok(());
}

async fn insert_batches(tx: &Transaction<'_>, count: i32, batch_size: usize) -> Result<(), Error> {
  let mut cached: Option<(usize, Statement)> = None;
  let mut inserted = 0;

  for batch in batches(count, batch_size) {
    let stmt = match cached.take() {
      Some((size, stmt)) if size == batch.len() => stmt,
      _ => tx.prepare(&batch_insert_query(batch.len())).await?,
    };

    let params: Vec<&(dyn ToSql + Sync)> = batch
      .iter()
      .flat_map(|u| [&u.id as &(dyn ToSql + Sync), &u.name, &u.email])
      .collect();
    tx.execute(&stmt, &params).await?;
    cached = Some((batch.len(), stmt));

    inserted += batch.len();
    println!("Inserted: {inserted}");
  }
  return Ok(());
}

async fn rollback(tx: Transaction<'_>) {
  if let Err(err) = tx.rollback().await {
    warn!("Rollback failed: {err}");
  }
}
