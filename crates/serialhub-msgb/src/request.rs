use crate::layout::{command_message_len, COMMAND_HEADER_LEN};

/// A request to the embedded controller, wrapped into a sequenced command frame.
///
/// Sequence and request ids are assigned by the caller when the request is
/// pushed, not stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    /// Target category (TC).
    pub target_category: u8,
    /// Target id (TID) on the controller side.
    pub target_id: u8,
    /// Instance id (IID).
    pub instance_id: u8,
    /// Command id (CID).
    pub command_id: u8,
    /// Application payload.
    pub payload: &'a [u8],
}

impl<'a> Request<'a> {
    /// Create a request without payload.
    pub fn new(target_category: u8, target_id: u8, instance_id: u8, command_id: u8) -> Self {
        Self {
            target_category,
            target_id,
            instance_id,
            command_id,
            payload: &[],
        }
    }

    /// Attach an application payload.
    pub fn with_payload(mut self, payload: &'a [u8]) -> Self {
        self.payload = payload;
        self
    }

    /// Length of the frame payload: command header plus application payload.
    pub fn frame_payload_len(&self) -> usize {
        COMMAND_HEADER_LEN + self.payload.len()
    }

    /// Total length of the encoded command message.
    pub fn message_len(&self) -> usize {
        command_message_len(self.payload.len())
    }
}
