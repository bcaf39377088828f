use std::time::Duration;

use crate::transport::config::BundlerConfig;

#[derive(Debug, Clone)]
pub enum BundlerConfigOption {
  SetMaxBatchBytes(usize),
  SetQueueCapacity(Option<usize>),
  SetSuppressWindow(Duration),
  SetInitialBatchCapacity(usize),
}

impl BundlerConfigOption {
  pub async fn apply(&self, config: &mut BundlerConfig) {
    match self {
      BundlerConfigOption::SetMaxBatchBytes(max_batch_bytes) => {
        config.set_max_batch_bytes(*max_batch_bytes).await;
      }
      BundlerConfigOption::SetQueueCapacity(queue_capacity) => {
        config.set_queue_capacity(*queue_capacity).await;
      }
      BundlerConfigOption::SetSuppressWindow(suppress_window) => {
        config.set_suppress_window(*suppress_window).await;
      }
      BundlerConfigOption::SetInitialBatchCapacity(initial_batch_capacity) => {
        config.set_initial_batch_capacity(*initial_batch_capacity).await;
      }
    }
  }

  pub fn with_max_batch_bytes(max_batch_bytes: usize) -> BundlerConfigOption {
    BundlerConfigOption::SetMaxBatchBytes(max_batch_bytes)
  }

  pub fn with_queue_capacity(queue_capacity: usize) -> BundlerConfigOption {
    BundlerConfigOption::SetQueueCapacity(Some(queue_capacity))
  }

  pub fn with_unbounded_queue() -> BundlerConfigOption {
    BundlerConfigOption::SetQueueCapacity(None)
  }

  pub fn with_suppress_window(suppress_window: Duration) -> BundlerConfigOption {
    BundlerConfigOption::SetSuppressWindow(suppress_window)
  }

  pub fn with_initial_batch_capacity(initial_batch_capacity: usize) -> BundlerConfigOption {
    BundlerConfigOption::SetInitialBatchCapacity(initial_batch_capacity)
  }
}
