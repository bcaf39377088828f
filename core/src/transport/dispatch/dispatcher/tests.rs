use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use crate::transport::dispatch::{
  Dispatcher, DispatcherHandle, Runnable, SingleWorkerDispatcher, TokioRuntimeContextDispatcher,
};

#[tokio::test]
async fn test_context_dispatcher_runs_scheduled_work() {
  let dispatcher = TokioRuntimeContextDispatcher::new();
  let done = Arc::new(Notify::new());

  let done_clone = done.clone();
  dispatcher
    .schedule(Runnable::new(move || async move {
      done_clone.notify_one();
    }))
    .await;

  tokio::time::timeout(Duration::from_secs(1), done.notified())
    .await
    .expect("scheduled work did not run");
}

#[tokio::test]
async fn test_single_worker_dispatcher_runs_scheduled_work() {
  let dispatcher = DispatcherHandle::new(SingleWorkerDispatcher::new().unwrap());
  let counter = Arc::new(AtomicUsize::new(0));
  let done = Arc::new(Notify::new());

  for _ in 0..3 {
    let counter = counter.clone();
    let done = done.clone();
    dispatcher
      .schedule(Runnable::new(move || async move {
        if counter.fetch_add(1, Ordering::SeqCst) == 2 {
          done.notify_one();
        }
      }))
      .await;
  }

  tokio::time::timeout(Duration::from_secs(1), done.notified())
    .await
    .expect("scheduled work did not run");
  assert_eq!(counter.load(Ordering::SeqCst), 3);
}
