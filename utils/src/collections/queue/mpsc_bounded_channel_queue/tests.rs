use std::time::Duration;

use crate::collections::element::Element;
use crate::collections::{
  BlockingQueueReader, BlockingQueueWriter, MpscBoundedChannelQueue, QueueBase, QueueError, QueueReader, QueueSize,
  QueueWriter,
};

#[derive(Debug, Clone, PartialEq)]
struct TestElement(i32);

impl Element for TestElement {}

#[tokio::test]
async fn test_new_queue() {
  let queue = MpscBoundedChannelQueue::<TestElement>::new(4);
  assert_eq!(queue.capacity().await, QueueSize::Limited(4));
  assert_eq!(queue.len().await, QueueSize::Limited(0));
}

#[tokio::test]
async fn test_offer_rejects_when_full() {
  let mut queue = MpscBoundedChannelQueue::<TestElement>::new(2);

  assert!(queue.offer(TestElement(0)).await.is_ok());
  assert!(queue.offer(TestElement(1)).await.is_ok());

  match queue.offer(TestElement(2)).await {
    Err(QueueError::OfferError(TestElement(2))) => {}
    other => panic!("Expected OfferError for a full queue, got {:?}", other),
  }

  assert_eq!(queue.len().await, QueueSize::Limited(2));
}

#[tokio::test]
async fn test_put_blocks_until_capacity() {
  let queue = MpscBoundedChannelQueue::<TestElement>::new(1);

  let mut writer = queue.clone();
  writer.put(TestElement(0)).await.unwrap();

  let mut blocked_writer = queue.clone();
  let handle = tokio::spawn(async move { blocked_writer.put(TestElement(1)).await });

  tokio::time::sleep(Duration::from_millis(50)).await;
  assert!(!handle.is_finished());

  let mut reader = queue.clone();
  assert_eq!(reader.poll().await.unwrap(), Some(TestElement(0)));

  handle.await.unwrap().unwrap();
  assert_eq!(reader.poll().await.unwrap(), Some(TestElement(1)));
}

#[tokio::test]
async fn test_take_waits_for_put() {
  let queue = MpscBoundedChannelQueue::<TestElement>::new(4);

  let mut producer = queue.clone();
  let handle = tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(50)).await;
    producer.put(TestElement(9)).await.unwrap();
  });

  let mut consumer = queue.clone();
  assert_eq!(consumer.take().await.unwrap(), Some(TestElement(9)));
  handle.await.unwrap();
}

#[tokio::test]
async fn test_interrupt_wakes_blocked_take() {
  let queue = MpscBoundedChannelQueue::<TestElement>::new(4);

  let mut consumer = queue.clone();
  let handle = tokio::spawn(async move { consumer.take().await });

  tokio::time::sleep(Duration::from_millis(50)).await;
  queue.interrupt().await;

  assert_eq!(handle.await.unwrap(), Ok(None));
}

#[tokio::test]
async fn test_clear_interrupt_discards_pending_interrupt() {
  let mut queue = MpscBoundedChannelQueue::<TestElement>::new(4);
  queue.offer(TestElement(1)).await.unwrap();
  queue.interrupt().await;
  queue.clear_interrupt();

  // the discarded interrupt no longer wins over the queued element
  assert_eq!(queue.take().await, Ok(Some(TestElement(1))));
}

#[tokio::test]
async fn test_clean_up() {
  let mut queue = MpscBoundedChannelQueue::<TestElement>::new(4);
  queue.offer(TestElement(0)).await.unwrap();

  queue.clean_up().await;

  assert_eq!(queue.len().await, QueueSize::Limited(0));

  match queue.poll().await {
    Err(QueueError::PollError) => {}
    other => panic!("Expected PollError after clean_up, got {:?}", other),
  }

  match queue.offer(TestElement(1)).await {
    Err(QueueError::OfferError(_)) => {}
    other => panic!("Expected OfferError after clean_up, got {:?}", other),
  }
}

#[tokio::test]
async fn test_fifo_order() {
  let mut queue = MpscBoundedChannelQueue::<TestElement>::new(8);

  for i in 0..8 {
    queue.offer(TestElement(i)).await.unwrap();
  }

  for i in 0..8 {
    assert_eq!(queue.poll().await.unwrap(), Some(TestElement(i)));
  }
}
