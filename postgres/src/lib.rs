//! Sync binding over the `postgres` crate.

use common::{
  batch_insert_query, Config, Connector, Error, Session, User, BENCHMARK_QUERY, COUNT_QUERY,
  CREATE_TABLE_QUERY, EXTENSION_QUERY, TRUNCATE_QUERY, VERSION_QUERY,
};
use postgres::types::ToSql;
use postgres::{Client, NoTls, Statement};

const NAME: &str = "postgres_bench";

pub struct PgConnector;

impl Connector for PgConnector {
  type Session = PgSession;

  fn connect(&self, config: &Config) -> Result<PgSession, Error> {
    let client = postgres::Config::new()
      .host(&config.host)
      .port(config.port)
      .dbname(&config.dbname)
      .user(&config.user)
      .password(&config.password)
      .application_name(NAME)
      .connect(NoTls)
      .map_err(Error::connection)?;

    return Ok(PgSession::new(client));
  }
}

pub struct PgSession {
  client: Client,
  insert: Option<Statement>,
  // Full batches share one statement; only the final partial batch differs.
  batch: Option<(usize, Statement)>,
}

impl PgSession {
  pub fn new(client: Client) -> Self {
    return Self {
      client,
      insert: None,
      batch: None,
    };
  }

  pub fn client(&mut self) -> &mut Client {
    return &mut self.client;
  }

  fn insert_statement(&mut self) -> Result<Statement, Error> {
    if let Some(stmt) = &self.insert {
      return Ok(stmt.clone());
    }
    let stmt = self.client.prepare(BENCHMARK_QUERY)?;
    self.insert = Some(stmt.clone());
    return Ok(stmt);
  }

  fn batch_statement(&mut self, rows: usize) -> Result<Statement, Error> {
    if let Some((size, stmt)) = &self.batch {
      if *size == rows {
        return Ok(stmt.clone());
      }
    }
    let stmt = self.client.prepare(&batch_insert_query(rows))?;
    self.batch = Some((rows, stmt.clone()));
    return Ok(stmt);
  }
}

impl Session for PgSession {
  fn server_version(&mut self) -> Result<String, Error> {
    let row = self.client.query_one(VERSION_QUERY, &[])?;
    return Ok(row.try_get(0)?);
  }

  fn has_extension(&mut self, name: &str) -> Result<bool, Error> {
    let row = self.client.query_opt(EXTENSION_QUERY, &[&name])?;
    return Ok(row.is_some());
  }

  fn create_table(&mut self) -> Result<(), Error> {
    return Ok(self.client.batch_execute(CREATE_TABLE_QUERY)?);
  }

  fn begin(&mut self) -> Result<(), Error> {
    return Ok(self.client.batch_execute("BEGIN")?);
  }

  fn commit(&mut self) -> Result<(), Error> {
    return Ok(self.client.batch_execute("COMMIT")?);
  }

  fn rollback(&mut self) -> Result<(), Error> {
    return Ok(self.client.batch_execute("ROLLBACK")?);
  }

  fn insert_row(&mut self, user: &User) -> Result<(), Error> {
    let stmt = self.insert_statement()?;
    self
      .client
      .execute(&stmt, &[&user.id, &user.name, &user.email])?;
    return Ok(());
  }

  fn insert_batch(&mut self, users: &[User]) -> Result<(), Error> {
    if users.is_empty() {
      return Ok(());
    }

    let stmt = self.batch_statement(users.len())?;
    let params: Vec<&(dyn ToSql + Sync)> = users
      .iter()
      .flat_map(|u| [&u.id as &(dyn ToSql + Sync), &u.name, &u.email])
      .collect();
    self.client.execute(&stmt, &params)?;
    return Ok(());
  }

  fn truncate(&mut self) -> Result<(), Error> {
    return Ok(self.client.batch_execute(TRUNCATE_QUERY)?);
  }

  fn count_rows(&mut self) -> Result<i64, Error> {
    let row = self.client.query_one(COUNT_QUERY, &[])?;
    return Ok(row.try_get(0)?);
  }
}
