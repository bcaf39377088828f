use std::cmp::Ordering;
use std::fmt::Debug;

use async_trait::async_trait;

use thiserror::Error;

mod mpsc_bounded_channel_queue;
mod mpsc_unbounded_channel_queue;

pub use self::{mpsc_bounded_channel_queue::*, mpsc_unbounded_channel_queue::*};

use crate::collections::element::Element;

/// An error that occurs when a queue operation fails.
#[derive(Error, Debug, PartialEq)]
pub enum QueueError<E> {
  #[error("Failed to offer an element: {0:?}")]
  OfferError(E),
  #[error("Failed to poll an element")]
  PollError,
  #[error("The queue operation was interrupted")]
  InterruptedError,
}

/// The size of a queue.
#[derive(Debug, Clone)]
pub enum QueueSize {
  /// The queue has no capacity limit.
  Limitless,
  /// The queue has a capacity limit.
  Limited(usize),
}

impl QueueSize {
  /// Returns whether the queue has no capacity limit.
  pub fn is_limitless(&self) -> bool {
    matches!(self, QueueSize::Limitless)
  }

  /// Converts to an option type: `None` means limitless.
  pub fn to_option(&self) -> Option<usize> {
    match self {
      QueueSize::Limitless => None,
      QueueSize::Limited(c) => Some(*c),
    }
  }

  /// Converts to a usize, mapping limitless to `usize::MAX`.
  pub fn to_usize(&self) -> usize {
    match self {
      QueueSize::Limitless => usize::MAX,
      QueueSize::Limited(c) => *c,
    }
  }
}

impl PartialEq<Self> for QueueSize {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (QueueSize::Limitless, QueueSize::Limitless) => true,
      (QueueSize::Limited(l), QueueSize::Limited(r)) => l == r,
      _ => false,
    }
  }
}

impl PartialOrd<Self> for QueueSize {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    match (self, other) {
      (QueueSize::Limitless, QueueSize::Limitless) => Some(Ordering::Equal),
      (QueueSize::Limitless, _) => Some(Ordering::Greater),
      (_, QueueSize::Limitless) => Some(Ordering::Less),
      (QueueSize::Limited(l), QueueSize::Limited(r)) => l.partial_cmp(r),
    }
  }
}

/// A trait that defines the behavior of a queue.
#[async_trait]
pub trait QueueBase<E: Element>: Debug + Send + Sync {
  /// Returns whether this queue is empty.
  async fn is_empty(&self) -> bool {
    self.len().await == QueueSize::Limited(0)
  }

  /// Returns whether this queue is non-empty.
  async fn non_empty(&self) -> bool {
    !self.is_empty().await
  }

  /// Returns whether the queue size has reached its capacity.
  async fn is_full(&self) -> bool {
    self.capacity().await == self.len().await
  }

  /// Returns whether the queue size has not reached its capacity.
  async fn non_full(&self) -> bool {
    !self.is_full().await
  }

  /// Returns the length of this queue.
  async fn len(&self) -> QueueSize;

  /// Returns the capacity of this queue.
  async fn capacity(&self) -> QueueSize;
}

#[async_trait]
pub trait QueueWriter<E: Element>: QueueBase<E> {
  /// Inserts the specified element into this queue, if it can be done
  /// immediately without violating the capacity limit.
  async fn offer(&mut self, element: E) -> Result<(), QueueError<E>>;

  /// Inserts all of the specified elements, stopping at the first failure.
  async fn offer_all(&mut self, elements: Vec<E>) -> Result<(), QueueError<E>> {
    for e in elements {
      self.offer(e).await?;
    }
    Ok(())
  }
}

#[async_trait]
pub trait QueueReader<E: Element>: QueueBase<E> {
  /// Retrieves and deletes the head of the queue. Returns `None` if the
  /// queue is empty.
  async fn poll(&mut self) -> Result<Option<E>, QueueError<E>>;

  async fn clean_up(&mut self);
}

/// A queue reader whose take suspends until an element arrives.
#[async_trait]
pub trait BlockingQueueReader<E: Element>: QueueReader<E> {
  /// Retrieves and deletes the head of the queue, suspending until an
  /// element becomes available. Returns `Ok(None)` when the wait was
  /// interrupted before an element arrived.
  async fn take(&mut self) -> Result<Option<E>, QueueError<E>>;

  /// Wakes a suspended [`BlockingQueueReader::take`], making it return
  /// `Ok(None)`.
  async fn interrupt(&self);
}

/// A queue writer whose insertion suspends until capacity is available.
#[async_trait]
pub trait BlockingQueueWriter<E: Element>: QueueWriter<E> {
  /// Inserts the specified element, suspending until space is available.
  async fn put(&mut self, element: E) -> Result<(), QueueError<E>>;
}
