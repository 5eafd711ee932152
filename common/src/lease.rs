use std::ops::{Deref, DerefMut};

use log::info;

/// A connection owned by one benchmark operation.
///
/// Dropping the lease closes the connection, on success and error paths alike.
#[derive(Debug)]
pub struct Lease<T> {
  conn: T,
}

impl<T> Lease<T> {
  pub fn new(conn: T) -> Self {
    info!("Database connection successful...");
    return Self { conn };
  }
}

impl<T> Deref for Lease<T> {
  type Target = T;

  fn deref(&self) -> &T {
    return &self.conn;
  }
}

impl<T> DerefMut for Lease<T> {
  fn deref_mut(&mut self) -> &mut T {
    return &mut self.conn;
  }
}

impl<T> Drop for Lease<T> {
  fn drop(&mut self) {
    info!("Database connection closed...");
  }
}
