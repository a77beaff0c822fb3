use bytes::BufMut;
use tracing::warn;

use crate::checksum::{Checksum, Crc16CcittFalse};
use crate::error::{MsgbError, Result};
use crate::layout::{
    FrameType, CHECKSUM_LEN, COMMAND_HEADER_LEN, COMMAND_MAX_PAYLOAD, CONTROL_MESSAGE_LEN,
    FRAME_HEADER_LEN, PAYLOAD_TYPE_COMMAND, SYN,
};
use crate::request::Request;

/// Builds messages into caller-owned storage.
///
/// The buffer only ever appends. Every write is bounds-checked against the
/// borrowed storage; a write that does not fit leaves the buffer untouched and
/// returns [`MsgbError::CapacityExceeded`]. The message-level operations
/// ([`push_ack`], [`push_nak`], [`push_cmd`]) check the full message length
/// first, so a failed call writes nothing at all.
///
/// [`push_ack`]: MessageBuffer::push_ack
/// [`push_nak`]: MessageBuffer::push_nak
/// [`push_cmd`]: MessageBuffer::push_cmd
pub struct MessageBuffer<'a, C = Crc16CcittFalse> {
    buf: &'a mut [u8],
    ptr: usize,
    checksum: C,
}

impl<'a> MessageBuffer<'a> {
    /// Bind a message buffer to `buf`, using the link's CRC.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self::with_checksum(buf, Crc16CcittFalse)
    }
}

impl<'a, C: Checksum> MessageBuffer<'a, C> {
    /// Bind a message buffer to `buf` with an explicit checksum function.
    pub fn with_checksum(buf: &'a mut [u8], checksum: C) -> Self {
        Self {
            buf,
            ptr: 0,
            checksum,
        }
    }

    /// Number of bytes written so far.
    pub fn used(&self) -> usize {
        self.ptr
    }

    /// Size of the backing storage.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes that can still be written.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.ptr
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.ptr]
    }

    /// Release the storage, returning the written bytes.
    pub fn into_bytes(self) -> &'a [u8] {
        let buf: &'a [u8] = self.buf;
        &buf[..self.ptr]
    }

    /// Rewind to the start of the storage.
    pub fn reset(&mut self) {
        self.ptr = 0;
    }

    /// Push the SYN marker.
    pub fn push_syn(&mut self) -> Result<()> {
        self.push_u16(SYN)
    }

    /// Push a frame header followed by its checksum.
    pub fn push_frame(&mut self, ty: FrameType, len: u16, seq: u8) -> Result<()> {
        self.ensure(FRAME_HEADER_LEN + CHECKSUM_LEN)?;

        let begin = self.ptr;
        let mut frame = self.reserve(FRAME_HEADER_LEN)?;
        frame.put_u8(ty.as_u8());
        frame.put_u16_le(len);
        frame.put_u8(seq);

        self.push_crc_since(begin)
    }

    /// Push a complete ACK message for the frame with sequence id `seq`.
    pub fn push_ack(&mut self, seq: u8) -> Result<()> {
        self.push_control(FrameType::Ack, seq)
    }

    /// Push a complete NAK message.
    pub fn push_nak(&mut self) -> Result<()> {
        self.push_control(FrameType::Nak, 0x00)
    }

    /// Push a complete sequenced command message carrying `rqst`.
    pub fn push_cmd(&mut self, seq: u8, rqid: u16, rqst: &Request<'_>) -> Result<()> {
        if rqst.payload.len() > COMMAND_MAX_PAYLOAD {
            return Err(MsgbError::PayloadTooLarge {
                size: rqst.payload.len(),
                max: COMMAND_MAX_PAYLOAD,
            });
        }
        self.ensure(rqst.message_len())?;

        self.push_syn()?;
        self.push_frame(
            FrameType::DataSequenced,
            rqst.frame_payload_len() as u16,
            seq,
        )?;

        let begin = self.ptr;
        let mut cmd = self.reserve(COMMAND_HEADER_LEN)?;
        cmd.put_u8(PAYLOAD_TYPE_COMMAND);
        cmd.put_u8(rqst.target_category);
        cmd.put_u8(rqst.target_id);
        cmd.put_u8(0x00);
        cmd.put_u8(rqst.instance_id);
        cmd.put_u16_le(rqid);
        cmd.put_u8(rqst.command_id);

        self.push_buf(rqst.payload)?;

        // covers command header and application payload
        self.push_crc_since(begin)
    }

    fn push_control(&mut self, ty: FrameType, seq: u8) -> Result<()> {
        self.ensure(CONTROL_MESSAGE_LEN)?;

        self.push_syn()?;
        self.push_frame(ty, 0, seq)?;

        // control frames have no payload, but still carry a payload checksum
        self.push_crc_since(self.ptr)
    }

    pub(crate) fn push_u16(&mut self, value: u16) -> Result<()> {
        let mut dst = self.reserve(2)?;
        dst.put_u16_le(value);
        Ok(())
    }

    pub(crate) fn push_buf(&mut self, src: &[u8]) -> Result<()> {
        self.reserve(src.len())?.copy_from_slice(src);
        Ok(())
    }

    /// Push the checksum of everything written since `begin`.
    pub(crate) fn push_crc_since(&mut self, begin: usize) -> Result<()> {
        let crc = self.checksum.checksum(&self.buf[begin..self.ptr]);
        self.push_u16(crc)
    }

    fn reserve(&mut self, len: usize) -> Result<&mut [u8]> {
        self.ensure(len)?;
        let begin = self.ptr;
        self.ptr += len;
        Ok(&mut self.buf[begin..self.ptr])
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if needed > remaining {
            warn!(
                needed,
                remaining,
                capacity = self.capacity(),
                "message buffer exhausted, write dropped"
            );
            return Err(MsgbError::CapacityExceeded { needed, remaining });
        }
        Ok(())
    }
}

impl<C> std::fmt::Debug for MessageBuffer<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBuffer")
            .field("used", &self.ptr)
            .field("capacity", &self.buf.len())
            .finish()
    }
}
