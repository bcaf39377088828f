use std::time::Duration;

use crate::transport::address::Address;
use crate::transport::suppress_log::{SuppressDecision, SuppressLog};

#[tokio::test(start_paused = true)]
async fn test_first_occurrence_logs_immediately() {
  let log = SuppressLog::<Option<Address>>::new(Duration::from_secs(60));
  let dest = Some(Address::new());

  assert_eq!(log.check(dest), SuppressDecision::Log { suppressed: 0 });
}

#[tokio::test(start_paused = true)]
async fn test_occurrences_within_window_are_counted() {
  let log = SuppressLog::<Option<Address>>::new(Duration::from_secs(60));
  let dest = Some(Address::new());

  assert_eq!(log.check(dest.clone()), SuppressDecision::Log { suppressed: 0 });
  assert_eq!(log.check(dest.clone()), SuppressDecision::Suppress);
  assert_eq!(log.check(dest.clone()), SuppressDecision::Suppress);
  assert_eq!(log.check(dest.clone()), SuppressDecision::Suppress);

  tokio::time::advance(Duration::from_secs(61)).await;

  assert_eq!(log.check(dest), SuppressDecision::Log { suppressed: 3 });
}

#[tokio::test(start_paused = true)]
async fn test_zero_window_disables_suppression() {
  let log = SuppressLog::<Option<Address>>::new(Duration::ZERO);
  let dest = Some(Address::new());

  for _ in 0..5 {
    assert_eq!(log.check(dest.clone()), SuppressDecision::Log { suppressed: 0 });
  }
}

#[tokio::test(start_paused = true)]
async fn test_keys_are_independent() {
  let log = SuppressLog::<Option<Address>>::new(Duration::from_secs(60));
  let a = Some(Address::new());
  let b = Some(Address::new());

  assert_eq!(log.check(a.clone()), SuppressDecision::Log { suppressed: 0 });
  assert_eq!(log.check(a), SuppressDecision::Suppress);

  // the broadcast destination is its own key as well
  assert_eq!(log.check(None), SuppressDecision::Log { suppressed: 0 });
  assert_eq!(log.check(b), SuppressDecision::Log { suppressed: 0 });
}

#[tokio::test(start_paused = true)]
async fn test_clear_forgets_history() {
  let log = SuppressLog::<Option<Address>>::new(Duration::from_secs(60));
  let dest = Some(Address::new());

  assert_eq!(log.check(dest.clone()), SuppressDecision::Log { suppressed: 0 });
  assert_eq!(log.check(dest.clone()), SuppressDecision::Suppress);

  log.clear();

  assert_eq!(log.check(dest), SuppressDecision::Log { suppressed: 0 });
}
