use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use groupcast_utils_rs::collections::{
  BlockingQueueReader, BlockingQueueWriter, MpscBoundedChannelQueue, MpscUnboundedChannelQueue, QueueBase, QueueError,
  QueueReader, QueueWriter,
};
use thiserror::Error;
use tokio::sync::Notify;

use crate::transport::address::Address;
use crate::transport::bundler::batch::Batch;
use crate::transport::config::BundlerConfig;
use crate::transport::dispatch::{Dispatcher, DispatcherHandle, Runnable};
use crate::transport::message::OutboundMessage;
use crate::transport::sender::{TransportSender, TransportSenderHandle};
use crate::transport::stats::BundlerStats;
use crate::transport::suppress_log::{SuppressDecision, SuppressLog};

#[derive(Debug, Error)]
pub enum BundlerError {
  #[error("bundler is already running")]
  AlreadyRunning,
  #[error("bundler is not running")]
  NotRunning,
  #[error("failed to enqueue message: {0}")]
  Enqueue(#[source] QueueError<OutboundMessage>),
}

/// The outbound message queue of a bundler, bounded or unbounded per
/// configuration. Producers that hit a bounded queue's capacity wait for
/// space; nothing else ever blocks them.
#[derive(Debug, Clone)]
pub(crate) enum BundlerQueue {
  Unbounded(MpscUnboundedChannelQueue<OutboundMessage>),
  Bounded(MpscBoundedChannelQueue<OutboundMessage>),
}

impl BundlerQueue {
  pub(crate) fn new(capacity: Option<usize>) -> Self {
    match capacity {
      Some(capacity) => BundlerQueue::Bounded(MpscBoundedChannelQueue::new(capacity)),
      None => BundlerQueue::Unbounded(MpscUnboundedChannelQueue::new()),
    }
  }

  pub(crate) async fn enqueue(&mut self, message: OutboundMessage) -> Result<(), QueueError<OutboundMessage>> {
    match self {
      BundlerQueue::Unbounded(queue) => queue.offer(message).await,
      BundlerQueue::Bounded(queue) => queue.put(message).await,
    }
  }

  pub(crate) async fn take(&mut self) -> Result<Option<OutboundMessage>, QueueError<OutboundMessage>> {
    match self {
      BundlerQueue::Unbounded(queue) => queue.take().await,
      BundlerQueue::Bounded(queue) => queue.take().await,
    }
  }

  pub(crate) async fn poll(&mut self) -> Result<Option<OutboundMessage>, QueueError<OutboundMessage>> {
    match self {
      BundlerQueue::Unbounded(queue) => queue.poll().await,
      BundlerQueue::Bounded(queue) => queue.poll().await,
    }
  }

  pub(crate) async fn interrupt(&self) {
    match self {
      BundlerQueue::Unbounded(queue) => queue.interrupt().await,
      BundlerQueue::Bounded(queue) => queue.interrupt().await,
    }
  }

  pub(crate) fn clear_interrupt(&self) {
    match self {
      BundlerQueue::Unbounded(queue) => queue.clear_interrupt(),
      BundlerQueue::Bounded(queue) => queue.clear_interrupt(),
    }
  }

  pub(crate) async fn len(&self) -> usize {
    match self {
      BundlerQueue::Unbounded(queue) => queue.len().await.to_usize(),
      BundlerQueue::Bounded(queue) => queue.len().await.to_usize(),
    }
  }
}

/// Groups contiguous same-destination messages into batches and flushes
/// them as soon as the destination changes, the size threshold would be
/// reached, or the queue runs momentarily empty.
///
/// `A B B C C A` leads to the sends `A, {BB}, {CC}, A`. `None` is a valid
/// destination (send to all group members).
///
/// Cloning produces another handle onto the same bundler. Exactly one
/// drain loop consumes the queue, so batch state needs no locking.
#[derive(Debug, Clone)]
pub struct DestinationBundler {
  queue: BundlerQueue,
  sender: TransportSenderHandle,
  dispatcher: DispatcherHandle,
  running: Arc<AtomicBool>,
  stopped: Arc<Notify>,
  stats: Arc<BundlerStats>,
  max_batch_bytes: usize,
  suppress_window: Duration,
  initial_batch_capacity: usize,
}

impl DestinationBundler {
  pub async fn new(sender: TransportSenderHandle, dispatcher: DispatcherHandle, config: &BundlerConfig) -> Self {
    Self {
      queue: BundlerQueue::new(config.get_queue_capacity().await),
      sender,
      dispatcher,
      running: Arc::new(AtomicBool::new(false)),
      stopped: Arc::new(Notify::new()),
      stats: Arc::new(BundlerStats::new()),
      max_batch_bytes: config.get_max_batch_bytes().await,
      suppress_window: config.get_suppress_window().await,
      initial_batch_capacity: config.get_initial_batch_capacity().await,
    }
  }

  /// Schedules the drain loop on the dispatcher. Messages enqueued before
  /// the start are drained once the loop is up.
  pub async fn start(&self) -> Result<(), BundlerError> {
    if self
      .running
      .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
      .is_err()
    {
      return Err(BundlerError::AlreadyRunning);
    }
    // a stop that landed while the previous loop was mid-iteration leaves
    // its interrupt pending; discard it so the new loop's first take does
    // not return spuriously
    self.queue.clear_interrupt();
    let drain = DrainLoop::new(
      self.queue.clone(),
      self.sender.clone(),
      self.running.clone(),
      self.stats.clone(),
      self.max_batch_bytes,
      self.suppress_window,
      self.initial_batch_capacity,
    );
    let stopped = self.stopped.clone();
    self.dispatcher.schedule(Runnable::new(move || drain.run(stopped))).await;
    Ok(())
  }

  /// Stops the drain loop: wakes a blocked take and waits for the loop to
  /// exit. Messages still queued or batched at this point are not
  /// guaranteed to be sent; the queue itself survives, so a later
  /// [`DestinationBundler::start`] picks up what remained.
  pub async fn stop(&self) -> Result<(), BundlerError> {
    if self
      .running
      .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
      .is_err()
    {
      return Err(BundlerError::NotRunning);
    }
    self.queue.interrupt().await;
    self.stopped.notified().await;
    Ok(())
  }

  /// Fire-and-forget producer entry point. Send failures are never
  /// surfaced here; an error means the message could not be queued at all.
  pub async fn enqueue(&self, message: OutboundMessage) -> Result<(), BundlerError> {
    let mut queue = self.queue.clone();
    queue.enqueue(message).await.map_err(BundlerError::Enqueue)
  }

  pub fn is_running(&self) -> bool {
    self.running.load(Ordering::SeqCst)
  }

  pub async fn queued_message_count(&self) -> usize {
    self.queue.len().await
  }

  /// Formatted summary of the recorded multi-message batch sizes.
  pub fn average_batch_size(&self) -> String {
    self.stats.avg_batch_size().to_string()
  }

  pub fn stats(&self) -> Arc<BundlerStats> {
    self.stats.clone()
  }

  pub fn reset_stats(&self) {
    self.stats.reset();
  }
}

/// State owned by the single drain task. Only this task ever touches the
/// batch, the target destination and the scratch buffer.
#[derive(Debug)]
pub(crate) struct DrainLoop {
  queue: BundlerQueue,
  sender: TransportSenderHandle,
  running: Arc<AtomicBool>,
  stats: Arc<BundlerStats>,
  batch: Batch,
  scratch: Vec<u8>,
  max_batch_bytes: usize,
  suppress: SuppressLog<Option<Address>>,
  #[cfg(test)]
  suppress_decisions: Vec<SuppressDecision>,
}

impl DrainLoop {
  pub(crate) fn new(
    queue: BundlerQueue,
    sender: TransportSenderHandle,
    running: Arc<AtomicBool>,
    stats: Arc<BundlerStats>,
    max_batch_bytes: usize,
    suppress_window: Duration,
    initial_batch_capacity: usize,
  ) -> Self {
    Self {
      queue,
      sender,
      running,
      stats,
      batch: Batch::with_capacity(initial_batch_capacity),
      scratch: Vec::new(),
      max_batch_bytes,
      suppress: SuppressLog::new(suppress_window),
      #[cfg(test)]
      suppress_decisions: Vec::new(),
    }
  }

  pub(crate) async fn run(mut self, stopped: Arc<Notify>) {
    while self.running.load(Ordering::SeqCst) {
      let message = match self.queue.take().await {
        Ok(Some(message)) => message,
        // woken without a message (interrupt); re-check running
        Ok(None) => continue,
        Err(err) => {
          tracing::error!("failed to take a message from the send queue: {}", err);
          tokio::task::yield_now().await;
          continue;
        }
      };
      if let Err(err) = self.process(message).await {
        tracing::error!("bundler iteration failed: {}", err);
      }
    }
    stopped.notify_one();
  }

  /// One drain iteration: admit `message` and everything else currently
  /// queued, flushing at destination changes and size boundaries, then
  /// flush whatever is left once the queue is momentarily empty.
  pub(crate) async fn process(&mut self, mut message: OutboundMessage) -> Result<(), QueueError<OutboundMessage>> {
    let mut size = message.size();
    if self.batch.accumulated_size() + size >= self.max_batch_bytes {
      self
        .stats
        .record_full_flush(self.batch.accumulated_size());
      self.flush().await;
    }

    loop {
      if (!self.batch.is_empty() && !Address::matches(message.destination(), self.batch.destination()))
        || self.batch.accumulated_size() + size >= self.max_batch_bytes
      {
        self.flush().await;
      }
      self.batch.push(message);
      match self.queue.poll().await? {
        Some(next) => {
          size = next.size();
          message = next;
        }
        None => break,
      }
    }

    self.flush().await;
    Ok(())
  }

  /// Sends the current batch. Send failures are logged (rate-limited per
  /// destination) and swallowed; the batch is cleared either way so a
  /// failed send can never leave stale messages behind.
  pub(crate) async fn flush(&mut self) {
    if self.batch.is_empty() {
      return;
    }
    self.scratch.clear();
    let result = match self.batch.messages() {
      // a single message is forwarded as-is, to its own destination
      [single] => self.sender.send_single(single.destination(), single, &mut self.scratch).await,
      messages => {
        self.stats.record_batch_size(messages.len());
        let source = messages.first().and_then(|m| m.source());
        self
          .sender
          .send_batch(self.batch.destination(), source, messages, &mut self.scratch)
          .await
      }
    };
    if let Err(err) = result {
      let destination = self.batch.destination().cloned();
      let decision = self.suppress.check(destination.clone());
      #[cfg(test)]
      self.suppress_decisions.push(decision.clone());
      if let SuppressDecision::Log { suppressed } = decision {
        tracing::warn!(
          destination = ?destination,
          suppressed,
          "failed to send bundled messages: {}",
          err
        );
      }
    }
    self.batch.clear();
  }

  #[cfg(test)]
  pub(crate) fn batch_mut(&mut self) -> &mut Batch {
    &mut self.batch
  }

  #[cfg(test)]
  pub(crate) fn batch(&self) -> &Batch {
    &self.batch
  }

  #[cfg(test)]
  pub(crate) fn suppress_decisions(&self) -> &[SuppressDecision] {
    &self.suppress_decisions
  }
}
