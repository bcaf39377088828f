use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::transport::config_option::BundlerConfigOption;

#[derive(Debug)]
struct BundlerConfigInner {
  max_batch_bytes: usize,
  queue_capacity: Option<usize>,
  suppress_window: Duration,
  initial_batch_capacity: usize,
}

/// Configuration of a [`crate::transport::bundler::DestinationBundler`].
#[derive(Debug, Clone)]
pub struct BundlerConfig {
  inner: Arc<Mutex<BundlerConfigInner>>,
}

impl Default for BundlerConfig {
  fn default() -> Self {
    Self {
      inner: Arc::new(Mutex::new(BundlerConfigInner {
        max_batch_bytes: 64_000,
        queue_capacity: None,
        suppress_window: Duration::from_secs(60),
        initial_batch_capacity: 256,
      })),
    }
  }
}

impl BundlerConfig {
  pub async fn from(options: impl IntoIterator<Item = BundlerConfigOption>) -> BundlerConfig {
    let mut config = BundlerConfig::default();
    for option in options {
      option.apply(&mut config).await;
    }
    config
  }

  /// Accumulation threshold: a flush happens before a batch would reach
  /// this many bytes.
  pub async fn get_max_batch_bytes(&self) -> usize {
    let mg = self.inner.lock().await;
    mg.max_batch_bytes
  }

  pub async fn set_max_batch_bytes(&mut self, max_batch_bytes: usize) {
    let mut mg = self.inner.lock().await;
    mg.max_batch_bytes = max_batch_bytes;
  }

  /// `None` selects the unbounded queue; `Some(n)` bounds the queue at `n`
  /// messages, making producers block once it fills up.
  pub async fn get_queue_capacity(&self) -> Option<usize> {
    let mg = self.inner.lock().await;
    mg.queue_capacity
  }

  pub async fn set_queue_capacity(&mut self, queue_capacity: Option<usize>) {
    let mut mg = self.inner.lock().await;
    mg.queue_capacity = queue_capacity;
  }

  /// Window for rate-limiting send-failure warnings per destination. A
  /// zero window logs every failure.
  pub async fn get_suppress_window(&self) -> Duration {
    let mg = self.inner.lock().await;
    mg.suppress_window
  }

  pub async fn set_suppress_window(&mut self, suppress_window: Duration) {
    let mut mg = self.inner.lock().await;
    mg.suppress_window = suppress_window;
  }

  pub async fn get_initial_batch_capacity(&self) -> usize {
    let mg = self.inner.lock().await;
    mg.initial_batch_capacity
  }

  pub async fn set_initial_batch_capacity(&mut self, initial_batch_capacity: usize) {
    let mut mg = self.inner.lock().await;
    mg.initial_batch_capacity = initial_batch_capacity;
  }
}
