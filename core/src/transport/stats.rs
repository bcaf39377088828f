use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};


/// Running average with min/max tracking. Recording never fails and is
/// safe to call from any thread; readers only ever observe it through the
/// diagnostic accessors.
#[derive(Debug)]
pub struct AverageMinMax {
  count: AtomicU64,
  sum: AtomicU64,
  min: AtomicU64,
  max: AtomicU64,
}

impl AverageMinMax {
  pub fn new() -> Self {
    Self {
      count: AtomicU64::new(0),
      sum: AtomicU64::new(0),
      min: AtomicU64::new(u64::MAX),
      max: AtomicU64::new(0),
    }
  }

  pub fn add(&self, value: u64) {
    self.count.fetch_add(1, Ordering::SeqCst);
    self.sum.fetch_add(value, Ordering::SeqCst);
    self.min.fetch_min(value, Ordering::SeqCst);
    self.max.fetch_max(value, Ordering::SeqCst);
  }

  pub fn count(&self) -> u64 {
    self.count.load(Ordering::SeqCst)
  }

  pub fn average(&self) -> f64 {
    let count = self.count();
    if count == 0 {
      0.0
    } else {
      self.sum.load(Ordering::SeqCst) as f64 / count as f64
    }
  }

  pub fn min(&self) -> Option<u64> {
    if self.count() == 0 {
      None
    } else {
      Some(self.min.load(Ordering::SeqCst))
    }
  }

  pub fn max(&self) -> Option<u64> {
    if self.count() == 0 {
      None
    } else {
      Some(self.max.load(Ordering::SeqCst))
    }
  }

  pub fn clear(&self) {
    self.count.store(0, Ordering::SeqCst);
    self.sum.store(0, Ordering::SeqCst);
    self.min.store(u64::MAX, Ordering::SeqCst);
    self.max.store(0, Ordering::SeqCst);
  }
}

impl Default for AverageMinMax {
  fn default() -> Self {
    Self::new()
  }
}

impl Display for AverageMinMax {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match (self.min(), self.max()) {
      (Some(min), Some(max)) => write!(
        f,
        "min/avg/max={}/{:.2}/{} (n={})",
        min,
        self.average(),
        max,
        self.count()
      ),
      _ => write!(f, "n/a"),
    }
  }
}

/// Counters kept by the bundler: size of multi-message batches, the number
/// of flushes forced by the size threshold and the accumulated byte count
/// at those moments.
#[derive(Debug, Default)]
pub struct BundlerStats {
  avg_batch_size: AverageMinMax,
  avg_fill_bytes: AverageMinMax,
  sends_because_full: AtomicU64,
}

impl BundlerStats {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records the message count of a multi-message flush.
  pub fn record_batch_size(&self, batch_size: usize) {
    self.avg_batch_size.add(batch_size as u64);
  }

  /// Records a flush forced by the size threshold and the bytes that had
  /// accumulated when it was triggered.
  pub fn record_full_flush(&self, accumulated_bytes: usize) {
    self.sends_because_full.fetch_add(1, Ordering::SeqCst);
    self.avg_fill_bytes.add(accumulated_bytes as u64);
  }

  pub fn avg_batch_size(&self) -> &AverageMinMax {
    &self.avg_batch_size
  }

  pub fn avg_fill_bytes(&self) -> &AverageMinMax {
    &self.avg_fill_bytes
  }

  pub fn sends_because_full(&self) -> u64 {
    self.sends_because_full.load(Ordering::SeqCst)
  }

  /// Clears the counters without touching any in-flight batch state.
  pub fn reset(&self) {
    self.avg_batch_size.clear();
    self.avg_fill_bytes.clear();
    self.sends_because_full.store(0, Ordering::SeqCst);
  }
}
