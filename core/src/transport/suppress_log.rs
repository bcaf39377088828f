use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::time::Instant;

#[cfg(test)]
mod tests;

/// Outcome of a [`SuppressLog::check`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressDecision {
  /// Emit the log line now. `suppressed` is how many occurrences for the
  /// same key were swallowed since the previous emission.
  Log { suppressed: u64 },
  /// Count the occurrence but stay quiet.
  Suppress,
}

#[derive(Debug)]
struct SuppressEntry {
  last_logged: Instant,
  suppressed: u64,
}

/// Deterministic per-key rate limit for repeated warnings.
///
/// The first occurrence for a key is logged immediately; further
/// occurrences within the window are counted and summarized by the next
/// emission once the window has elapsed. A zero window disables
/// suppression entirely.
#[derive(Debug)]
pub struct SuppressLog<K>
where
  K: Eq + Hash + Debug + Send + Sync + 'static, {
  window: Duration,
  entries: DashMap<K, SuppressEntry>,
}

impl<K> SuppressLog<K>
where
  K: Eq + Hash + Debug + Send + Sync + 'static,
{
  pub fn new(window: Duration) -> Self {
    Self {
      window,
      entries: DashMap::new(),
    }
  }

  pub fn window(&self) -> Duration {
    self.window
  }

  pub fn check(&self, key: K) -> SuppressDecision {
    if self.window.is_zero() {
      return SuppressDecision::Log { suppressed: 0 };
    }
    match self.entries.entry(key) {
      Entry::Vacant(vacant) => {
        vacant.insert(SuppressEntry {
          last_logged: Instant::now(),
          suppressed: 0,
        });
        SuppressDecision::Log { suppressed: 0 }
      }
      Entry::Occupied(mut occupied) => {
        let entry = occupied.get_mut();
        if entry.last_logged.elapsed() >= self.window {
          let suppressed = entry.suppressed;
          entry.last_logged = Instant::now();
          entry.suppressed = 0;
          SuppressDecision::Log { suppressed }
        } else {
          entry.suppressed += 1;
          SuppressDecision::Suppress
        }
      }
    }
  }

  pub fn clear(&self) {
    self.entries.clear();
  }
}
