use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::collections::element::Element;
use crate::collections::{BlockingQueueReader, QueueBase, QueueError, QueueReader, QueueSize, QueueWriter};
use async_trait::async_trait;
use tokio::sync::mpsc::error::{SendError, TryRecvError};
use tokio::sync::{mpsc, Mutex, Notify};

#[cfg(test)]
mod tests;

#[derive(Debug)]
struct MpscUnboundedChannelQueueInner<E> {
  receiver: mpsc::UnboundedReceiver<E>,
  count: usize,
  is_closed: bool,
}

/// Unbounded multi-producer queue with a suspending take.
///
/// Producers go through [`QueueWriter::offer`]; the single logical consumer
/// uses [`QueueReader::poll`] for non-blocking drains and
/// [`BlockingQueueReader::take`] to suspend until the next element or an
/// interrupt arrives.
#[derive(Debug, Clone)]
pub struct MpscUnboundedChannelQueue<E> {
  sender: mpsc::UnboundedSender<E>,
  wakeup: Arc<Notify>,
  interrupted: Arc<AtomicBool>,
  inner: Arc<Mutex<MpscUnboundedChannelQueueInner<E>>>,
}

impl<T> MpscUnboundedChannelQueue<T> {
  pub fn new() -> Self {
    let (sender, receiver) = mpsc::unbounded_channel();
    Self {
      sender,
      wakeup: Arc::new(Notify::new()),
      interrupted: Arc::new(AtomicBool::new(false)),
      inner: Arc::new(Mutex::new(MpscUnboundedChannelQueueInner {
        receiver,
        count: 0,
        is_closed: false,
      })),
    }
  }

  async fn try_recv(&self) -> Result<T, TryRecvError> {
    let mut inner_mg = self.inner.lock().await;
    if inner_mg.is_closed {
      return Err(TryRecvError::Disconnected);
    }
    inner_mg.receiver.try_recv()
  }

  async fn send(&self, element: T) -> Result<(), SendError<T>> {
    let inner_mg = self.inner.lock().await;
    if inner_mg.is_closed {
      return Err(SendError(element));
    }
    drop(inner_mg);
    self.sender.send(element)
  }

  async fn increment_count(&self) {
    let mut inner_mg = self.inner.lock().await;
    inner_mg.count += 1;
  }

  async fn decrement_count(&self) {
    let mut inner_mg = self.inner.lock().await;
    inner_mg.count = inner_mg.count.saturating_sub(1);
  }

  /// Discards a pending interrupt that no take consumed, so the next
  /// [`BlockingQueueReader::take`] is not woken spuriously.
  pub fn clear_interrupt(&self) {
    self.interrupted.store(false, Ordering::SeqCst);
  }
}

impl<T> Default for MpscUnboundedChannelQueue<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl<E: Element> QueueBase<E> for MpscUnboundedChannelQueue<E> {
  async fn len(&self) -> QueueSize {
    let inner_mg = self.inner.lock().await;
    QueueSize::Limited(inner_mg.count)
  }

  async fn capacity(&self) -> QueueSize {
    QueueSize::Limitless
  }
}

#[async_trait]
impl<E: Element> QueueWriter<E> for MpscUnboundedChannelQueue<E> {
  async fn offer(&mut self, element: E) -> Result<(), QueueError<E>> {
    match self.send(element).await {
      Ok(_) => {
        self.increment_count().await;
        self.wakeup.notify_one();
        Ok(())
      }
      Err(SendError(err)) => Err(QueueError::OfferError(err)),
    }
  }
}

#[async_trait]
impl<E: Element> QueueReader<E> for MpscUnboundedChannelQueue<E> {
  async fn poll(&mut self) -> Result<Option<E>, QueueError<E>> {
    match self.try_recv().await {
      Ok(element) => {
        self.decrement_count().await;
        Ok(Some(element))
      }
      Err(TryRecvError::Empty) => Ok(None),
      Err(TryRecvError::Disconnected) => Err(QueueError::<E>::PollError),
    }
  }

  async fn clean_up(&mut self) {
    let mut inner_mg = self.inner.lock().await;
    inner_mg.count = 0;
    inner_mg.receiver.close();
    inner_mg.is_closed = true;
    drop(inner_mg);
    self.wakeup.notify_one();
    self.sender.closed().await;
  }
}

#[async_trait]
impl<E: Element> BlockingQueueReader<E> for MpscUnboundedChannelQueue<E> {
  async fn take(&mut self) -> Result<Option<E>, QueueError<E>> {
    loop {
      if self.interrupted.swap(false, Ordering::SeqCst) {
        return Ok(None);
      }
      match self.poll().await? {
        Some(element) => return Ok(Some(element)),
        None => self.wakeup.notified().await,
      }
    }
  }

  async fn interrupt(&self) {
    self.interrupted.store(true, Ordering::SeqCst);
    self.wakeup.notify_one();
  }
}
