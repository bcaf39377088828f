use groupcast_utils_rs::collections::Element;

use crate::transport::address::Address;

/// An outbound message handed to the transport's send path.
///
/// Immutable once built: the bundler only reads the destination, source and
/// size. The payload's wire encoding is the sender's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
  destination: Option<Address>,
  source: Option<Address>,
  payload: Vec<u8>,
}

impl OutboundMessage {
  pub fn new(destination: Option<Address>, source: Option<Address>, payload: Vec<u8>) -> Self {
    Self {
      destination,
      source,
      payload,
    }
  }

  /// A message addressed to a single group member.
  pub fn to(destination: Address, source: Option<Address>, payload: Vec<u8>) -> Self {
    Self::new(Some(destination), source, payload)
  }

  /// A message addressed to all group members.
  pub fn broadcast(source: Option<Address>, payload: Vec<u8>) -> Self {
    Self::new(None, source, payload)
  }

  /// `None` means "all group members".
  pub fn destination(&self) -> Option<&Address> {
    self.destination.as_ref()
  }

  pub fn source(&self) -> Option<&Address> {
    self.source.as_ref()
  }

  pub fn payload(&self) -> &[u8] {
    &self.payload
  }

  /// Estimated serialized footprint in bytes, used for batch accounting.
  pub fn size(&self) -> usize {
    self.payload.len()
  }
}

impl Element for OutboundMessage {}
