use crate::transport::address::Address;
use crate::transport::message::OutboundMessage;

/// The in-memory group of same-destination messages awaiting one send.
///
/// Invariant: while non-empty, every message's destination matches
/// `destination` under [`Address::matches`]. `destination` is left stale
/// after [`Batch::clear`] and is only meaningful while the batch is
/// non-empty.
#[derive(Debug)]
pub(crate) struct Batch {
  messages: Vec<OutboundMessage>,
  destination: Option<Address>,
  accumulated_size: usize,
}

impl Batch {
  pub(crate) fn with_capacity(capacity: usize) -> Self {
    Self {
      messages: Vec::with_capacity(capacity),
      destination: None,
      accumulated_size: 0,
    }
  }

  pub(crate) fn push(&mut self, message: OutboundMessage) {
    self.destination = message.destination().cloned();
    self.accumulated_size += message.size();
    self.messages.push(message);
  }

  /// Empties the batch without shrinking the backing allocation.
  pub(crate) fn clear(&mut self) {
    self.messages.clear();
    self.accumulated_size = 0;
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.messages.is_empty()
  }

  pub(crate) fn messages(&self) -> &[OutboundMessage] {
    &self.messages
  }

  pub(crate) fn destination(&self) -> Option<&Address> {
    self.destination.as_ref()
  }

  pub(crate) fn accumulated_size(&self) -> usize {
    self.accumulated_size
  }

  #[cfg(test)]
  pub(crate) fn force_destination(&mut self, destination: Option<Address>) {
    self.destination = destination;
  }
}
