/// One synthetic row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub id: i32,
  pub name: String,
  pub email: String,
}

impl User {
  pub fn new(id: i32) -> Self {
    return Self {
      id,
      name: format!("User{id}"),
      email: format!("user{id}@test.com"),
    };
  }
}

/// Rows `1..=count` in ascending id order.
pub fn users(count: i32) -> impl Iterator<Item = User> {
  return (1..=count).map(User::new);
}

/// Buffers rows and hands out full batches.
///
/// `push` returns a batch once `batch_size` rows are buffered. `finish` returns
/// the remainder, or `None` when nothing is left so that no empty statement is
/// ever issued.
#[derive(Debug)]
pub struct Batcher {
  batch_size: usize,
  buf: Vec<User>,
}

impl Batcher {
  pub fn new(batch_size: usize) -> Self {
    let batch_size = batch_size.max(1);
    return Self {
      batch_size,
      buf: Vec::with_capacity(batch_size),
    };
  }

  pub fn push(&mut self, user: User) -> Option<Vec<User>> {
    self.buf.push(user);
    if self.buf.len() < self.batch_size {
      return None;
    }
    return Some(std::mem::replace(
      &mut self.buf,
      Vec::with_capacity(self.batch_size),
    ));
  }

  pub fn finish(self) -> Option<Vec<User>> {
    if self.buf.is_empty() {
      return None;
    }
    return Some(self.buf);
  }
}

/// Rows `1..=count` grouped into flushes of `batch_size`, the last one partial.
pub fn batches(count: i32, batch_size: usize) -> impl Iterator<Item = Vec<User>> {
  let mut rows = users(count);
  let mut batcher = Some(Batcher::new(batch_size));

  return std::iter::from_fn(move || {
    let current = batcher.as_mut()?;
    for user in rows.by_ref() {
      if let Some(batch) = current.push(user) {
        return Some(batch);
      }
    }
    batcher.take()?.finish()
  });
}

#[cfg(test)]
mod tests {
  use super::*;

  fn flush_sizes(count: i32, batch_size: usize) -> Vec<usize> {
    batches(count, batch_size).map(|batch| batch.len()).collect()
  }

  #[test]
  fn synthetic_rows() {
    let user = User::new(42);
    assert_eq!(user.id, 42);
    assert_eq!(user.name, "User42");
    assert_eq!(user.email, "user42@test.com");
  }

  #[test]
  fn ids_are_ascending_and_complete() {
    let ids: Vec<i32> = users(5).map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(users(0).count(), 0);
  }

  #[test]
  fn partial_final_batch() {
    assert_eq!(flush_sizes(2500, 1000), vec![1000, 1000, 500]);
  }

  #[test]
  fn exact_multiple_has_no_empty_flush() {
    assert_eq!(flush_sizes(2000, 1000), vec![1000, 1000]);
    assert_eq!(flush_sizes(0, 1000), Vec::<usize>::new());
  }

  #[test]
  fn batch_larger_than_count() {
    assert_eq!(flush_sizes(7, 1000), vec![7]);
    assert_eq!(flush_sizes(3, 1), vec![1, 1, 1]);
  }

  #[test]
  fn batches_keep_order() {
    let ids: Vec<i32> = batches(5, 2).flatten().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
  }

  #[test]
  fn batcher_hands_out_full_buffers() {
    let mut batcher = Batcher::new(2);
    let mut ids = Vec::new();
    for user in users(5) {
      if let Some(batch) = batcher.push(user) {
        ids.extend(batch.into_iter().map(|u| u.id));
      }
    }
    ids.extend(batcher.finish().unwrap().into_iter().map(|u| u.id));
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
  }
}
