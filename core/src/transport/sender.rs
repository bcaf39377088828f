use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::transport::address::Address;
use crate::transport::message::OutboundMessage;

/// An error returned by the transport's send path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SendError {
  #[error("destination unreachable: {0}")]
  Unreachable(String),
  #[error("failed to encode message: {0}")]
  Encode(String),
  #[error("transport is closed")]
  Closed,
}

/// The actual network send path.
///
/// `buffer` is a scratch buffer owned by the caller and reused across
/// flushes; implementations may encode into it but must not assume it
/// survives the call.
#[async_trait]
pub trait TransportSender: Debug + Send + Sync + 'static {
  /// Sends a single message to its destination (`None` = all members).
  async fn send_single(
    &self,
    destination: Option<&Address>,
    message: &OutboundMessage,
    buffer: &mut Vec<u8>,
  ) -> Result<(), SendError>;

  /// Sends an ordered, destination-homogeneous batch of messages.
  async fn send_batch(
    &self,
    destination: Option<&Address>,
    source: Option<&Address>,
    messages: &[OutboundMessage],
    buffer: &mut Vec<u8>,
  ) -> Result<(), SendError>;
}

#[derive(Debug, Clone)]
pub struct TransportSenderHandle(Arc<dyn TransportSender>);

impl TransportSenderHandle {
  pub fn new(sender: impl TransportSender + 'static) -> Self {
    Self(Arc::new(sender))
  }

  pub fn new_arc(sender: Arc<dyn TransportSender>) -> Self {
    Self(sender)
  }
}

#[async_trait]
impl TransportSender for TransportSenderHandle {
  async fn send_single(
    &self,
    destination: Option<&Address>,
    message: &OutboundMessage,
    buffer: &mut Vec<u8>,
  ) -> Result<(), SendError> {
    self.0.send_single(destination, message, buffer).await
  }

  async fn send_batch(
    &self,
    destination: Option<&Address>,
    source: Option<&Address>,
    messages: &[OutboundMessage],
    buffer: &mut Vec<u8>,
  ) -> Result<(), SendError> {
    self.0.send_batch(destination, source, messages, buffer).await
  }
}
