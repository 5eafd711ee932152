//! Runs the benchmark against a live server configured through the `PG*`
//! variables (or `.env`). Every test truncates the `users` table.
//!
//!   cargo test -p postgres_bench -- --ignored

use common::{Config, Connector, Runner, Session, User};
use parking_lot::Mutex;
use postgres_bench::{PgConnector, PgSession};

// Tests share the users table.
static LOCK: Mutex<()> = Mutex::new(());

fn config() -> Config {
  Config::load(None).expect("valid PG* settings")
}

fn runner() -> Runner<PgConnector> {
  let runner = Runner::new(PgConnector, config());
  let mut session = connect();
  session.create_table().unwrap();
  runner.cleanup().unwrap();
  runner
}

fn connect() -> PgSession {
  PgConnector.connect(&config()).expect("Failed to connect")
}

fn ids(session: &mut PgSession) -> Vec<i32> {
  session
    .client()
    .query("SELECT id FROM users ORDER BY id", &[])
    .unwrap()
    .iter()
    .map(|row| row.get(0))
    .collect()
}

#[test]
#[ignore = "requires a running PostgreSQL server"]
fn row_by_row_inserts_ids_in_order() {
  let _guard = LOCK.lock();
  let runner = runner();

  let report = runner.insert_row_by_row(2500).unwrap();
  assert_eq!(report.rows, 2500);
  assert_eq!(runner.count_rows().unwrap(), 2500);
  assert_eq!(ids(&mut connect()), (1..=2500).collect::<Vec<_>>());
}

#[test]
#[ignore = "requires a running PostgreSQL server"]
fn batched_inserts_remainder() {
  let _guard = LOCK.lock();
  let runner = runner();

  runner.insert_batched(2500, 1000).unwrap();
  assert_eq!(ids(&mut connect()), (1..=2500).collect::<Vec<_>>());

  let mut session = connect();
  let row = session
    .client()
    .query_one("SELECT name, email FROM users WHERE id = 2500", &[])
    .unwrap();
  let user = User::new(2500);
  assert_eq!(row.get::<_, String>(0), user.name);
  assert_eq!(row.get::<_, String>(1), user.email);
}

#[test]
#[ignore = "requires a running PostgreSQL server"]
fn failed_insert_leaves_no_rows() {
  let _guard = LOCK.lock();
  let runner = runner();

  // Row 42 will collide on the unique email.
  let mut session = connect();
  session
    .client()
    .execute(
      "INSERT INTO users (id, name, email) VALUES (1000000, 'Blocker', 'user42@test.com')",
      &[],
    )
    .unwrap();

  let err = runner.insert_row_by_row(100).unwrap_err();
  assert!(!err.is_fatal());
  assert_eq!(ids(&mut session), vec![1000000]);

  assert!(runner.insert_batched(100, 30).is_err());
  assert_eq!(runner.count_rows().unwrap(), 1);
}

#[test]
#[ignore = "requires a running PostgreSQL server"]
fn cleanup_restarts_identity() {
  let _guard = LOCK.lock();
  let runner = runner();

  let mut session = connect();
  for _ in 0..3 {
    session
      .client()
      .execute("INSERT INTO users (name, email) VALUES ('x', md5(random()::text))", &[])
      .unwrap();
  }

  runner.cleanup().unwrap();
  assert_eq!(runner.count_rows().unwrap(), 0);

  let row = session
    .client()
    .query_one(
      "INSERT INTO users (name, email) VALUES ('first', 'first@test.com') RETURNING id",
      &[],
    )
    .unwrap();
  assert_eq!(row.get::<_, i32>(0), 1);
}

#[test]
#[ignore = "requires a running PostgreSQL server"]
fn create_table_is_idempotent() {
  let _guard = LOCK.lock();
  let _runner = runner();

  let mut session = connect();
  session.create_table().unwrap();
  session.create_table().unwrap();

  let tables: i64 = session
    .client()
    .query_one(
      "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = current_schema() AND table_name = 'users'",
      &[],
    )
    .unwrap()
    .get(0);
  assert_eq!(tables, 1);
}

#[test]
#[ignore = "requires a running PostgreSQL server"]
fn test_connection_reports_server() {
  let _guard = LOCK.lock();
  let runner = runner();

  let info = runner.test_connection().unwrap();
  assert!(info.version.starts_with("PostgreSQL"));
}

#[test]
fn unreachable_server_is_a_connection_error() {
  let config = Config {
    host: "127.0.0.1".to_string(),
    port: 1,
    ..Config::default()
  };

  let err = Runner::new(PgConnector, config)
    .insert_row_by_row(10)
    .unwrap_err();
  assert!(err.is_fatal());
  assert!(err.to_string().starts_with("Connection failed"));
}
