use std::time::Duration;

use crate::collections::element::Element;
use crate::collections::{
  BlockingQueueReader, MpscUnboundedChannelQueue, QueueBase, QueueError, QueueReader, QueueSize, QueueWriter,
};

#[derive(Debug, Clone, PartialEq)]
struct TestElement(i32);

impl Element for TestElement {}

#[tokio::test]
async fn test_new_queue() {
  let queue = MpscUnboundedChannelQueue::<TestElement>::new();
  assert_eq!(queue.capacity().await, QueueSize::Limitless);
  assert_eq!(queue.len().await, QueueSize::Limited(0));
}

#[tokio::test]
async fn test_offer_and_poll() {
  let mut queue = MpscUnboundedChannelQueue::<TestElement>::new();

  for i in 0..5 {
    assert!(queue.offer(TestElement(i)).await.is_ok());
  }

  assert_eq!(queue.len().await, QueueSize::Limited(5));

  for i in 0..5 {
    let element = queue.poll().await.unwrap().unwrap();
    assert_eq!(element, TestElement(i));
  }

  assert_eq!(queue.len().await, QueueSize::Limited(0));
  assert!(queue.poll().await.unwrap().is_none());
}

#[tokio::test]
async fn test_take_returns_queued_element() {
  let mut queue = MpscUnboundedChannelQueue::<TestElement>::new();
  queue.offer(TestElement(7)).await.unwrap();

  let element = queue.take().await.unwrap();
  assert_eq!(element, Some(TestElement(7)));
}

#[tokio::test]
async fn test_take_waits_for_offer() {
  let queue = MpscUnboundedChannelQueue::<TestElement>::new();

  let mut producer = queue.clone();
  let handle = tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(50)).await;
    producer.offer(TestElement(42)).await.unwrap();
  });

  let mut consumer = queue.clone();
  let element = consumer.take().await.unwrap();
  assert_eq!(element, Some(TestElement(42)));
  handle.await.unwrap();
}

#[tokio::test]
async fn test_interrupt_wakes_blocked_take() {
  let queue = MpscUnboundedChannelQueue::<TestElement>::new();

  let mut consumer = queue.clone();
  let handle = tokio::spawn(async move { consumer.take().await });

  tokio::time::sleep(Duration::from_millis(50)).await;
  queue.interrupt().await;

  let result = handle.await.unwrap();
  assert_eq!(result, Ok(None));
}

#[tokio::test]
async fn test_interrupt_before_take() {
  let mut queue = MpscUnboundedChannelQueue::<TestElement>::new();
  queue.offer(TestElement(1)).await.unwrap();
  queue.interrupt().await;

  // a pending interrupt takes precedence over queued elements
  assert_eq!(queue.take().await, Ok(None));
  assert_eq!(queue.take().await, Ok(Some(TestElement(1))));
}

#[tokio::test]
async fn test_clear_interrupt_discards_pending_interrupt() {
  let mut queue = MpscUnboundedChannelQueue::<TestElement>::new();
  queue.offer(TestElement(1)).await.unwrap();
  queue.interrupt().await;
  queue.clear_interrupt();

  // the discarded interrupt no longer wins over the queued element
  assert_eq!(queue.take().await, Ok(Some(TestElement(1))));
}

#[tokio::test]
async fn test_clean_up() {
  let mut queue = MpscUnboundedChannelQueue::<TestElement>::new();

  for i in 0..3 {
    assert!(queue.offer(TestElement(i)).await.is_ok());
  }

  queue.clean_up().await;

  assert_eq!(queue.len().await, QueueSize::Limited(0));

  match queue.poll().await {
    Err(QueueError::PollError) => {}
    other => panic!("Expected PollError after clean_up, got {:?}", other),
  }

  match queue.offer(TestElement(4)).await {
    Err(QueueError::OfferError(_)) => {}
    other => panic!("Expected OfferError after clean_up, got {:?}", other),
  }
}

#[tokio::test]
async fn test_concurrent_producers() {
  let queue = MpscUnboundedChannelQueue::<TestElement>::new();
  let mut handles = vec![];

  for i in 0..10 {
    let mut q = queue.clone();
    handles.push(tokio::spawn(async move {
      for j in 0..10 {
        q.offer(TestElement(i * 10 + j)).await.unwrap();
      }
    }));
  }

  for handle in handles {
    handle.await.unwrap();
  }

  assert_eq!(queue.len().await, QueueSize::Limited(100));

  let mut consumer = queue.clone();
  let mut count = 0;
  while consumer.poll().await.unwrap().is_some() {
    count += 1;
  }
  assert_eq!(count, 100);
}
