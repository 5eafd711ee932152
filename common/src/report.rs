use std::fmt;
use std::time::Duration;

/// Outcome of a completed insert run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
  pub rows: u64,
  pub elapsed: Duration,
}

impl Report {
  pub fn new(rows: u64, elapsed: Duration) -> Self {
    return Self { rows, elapsed };
  }

  /// Elapsed seconds rounded to two decimals, as printed.
  pub fn seconds(&self) -> f64 {
    return (self.elapsed.as_secs_f64() * 100.0).round() / 100.0;
  }

  /// `None` when the run was too short to measure.
  pub fn rows_per_second(&self) -> Option<f64> {
    let seconds = self.seconds();
    if seconds == 0.0 {
      return None;
    }
    return Some(self.rows as f64 / seconds);
  }
}

impl fmt::Display for Report {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Total time: {:.2} seconds", self.seconds())?;
    match self.rows_per_second() {
      Some(rate) => write!(f, "Records per second: {rate:.2}"),
      None => write!(f, "Records per second: n/a"),
    }
  }
}
