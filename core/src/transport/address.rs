use std::fmt::{Display, Formatter};

use uuid::Uuid;

/// Opaque identity of a group member endpoint.
///
/// A message destination of `None` means "send to all group members", so
/// destinations are compared with [`Address::matches`] rather than plain
/// equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
  id: Uuid,
}

impl Address {
  pub fn new() -> Self {
    Self { id: Uuid::new_v4() }
  }

  /// Null-safe destination match: two absent addresses (broadcast) match,
  /// two present addresses match iff they identify the same endpoint, and
  /// a broadcast never matches a concrete endpoint.
  pub fn matches(lhs: Option<&Address>, rhs: Option<&Address>) -> bool {
    match (lhs, rhs) {
      (None, None) => true,
      (Some(l), Some(r)) => l == r,
      _ => false,
    }
  }
}

impl Default for Address {
  fn default() -> Self {
    Self::new()
  }
}

impl From<Uuid> for Address {
  fn from(id: Uuid) -> Self {
    Self { id }
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.id)
  }
}
