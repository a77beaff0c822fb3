//! Wire layout of serial hub messages.
//!
//! ```text
//! ┌──────────┬──────┬──────────┬──────┬───────────┬─────────────┬─────────────┐
//! │ SYN      │ Type │ Length   │ Seq  │ Frame CRC │ Payload     │ Payload CRC │
//! │ (2B LE)  │ (1B) │ (2B LE)  │ (1B) │ (2B LE)   │ (Length B)  │ (2B LE)     │
//! └──────────┴──────┴──────────┴──────┴───────────┴─────────────┴─────────────┘
//! ```
//!
//! Command payloads start with an 8-byte command header:
//!
//! ```text
//! ┌──────┬────┬─────────┬────────┬─────┬──────────┬─────┬──────────────┐
//! │ Type │ TC │ TID out │ TID in │ IID │ RQID     │ CID │ App payload  │
//! │ (1B) │(1B)│ (1B)    │ (1B)   │(1B) │ (2B LE)  │(1B) │              │
//! └──────┴────┴─────────┴────────┴─────┴──────────┴─────┴──────────────┘
//! ```

/// SYN marker, written little-endian (`AA 55`).
pub const SYN: u16 = 0x55aa;

/// Payload type tag of a command.
pub const PAYLOAD_TYPE_COMMAND: u8 = 0x80;

pub const SYN_LEN: usize = 2;
pub const FRAME_HEADER_LEN: usize = 4;
pub const CHECKSUM_LEN: usize = 2;
pub const COMMAND_HEADER_LEN: usize = 8;

/// Maximum frame payload, bounded by the 16-bit length field.
pub const FRAME_MAX_PAYLOAD: usize = u16::MAX as usize;

/// Maximum application payload of a single command.
pub const COMMAND_MAX_PAYLOAD: usize = FRAME_MAX_PAYLOAD - COMMAND_HEADER_LEN;

/// Length of an ACK or NAK message.
pub const CONTROL_MESSAGE_LEN: usize = message_len(0);

/// Type of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    /// Unsequenced data frame, never acknowledged.
    DataUnsequenced,
    /// Sequenced data frame, acknowledged by the receiver.
    DataSequenced,
    /// Acknowledgement of a sequenced frame.
    Ack,
    /// Negative acknowledgement, requests retransmission.
    Nak,
}

impl FrameType {
    /// The wire tag of this frame type.
    pub const fn as_u8(self) -> u8 {
        match self {
            FrameType::DataUnsequenced => 0x00,
            FrameType::DataSequenced => 0x80,
            FrameType::Ack => 0x40,
            FrameType::Nak => 0x04,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            FrameType::DataUnsequenced => "DATA_NSQ",
            FrameType::DataSequenced => "DATA_SEQ",
            FrameType::Ack => "ACK",
            FrameType::Nak => "NAK",
        }
    }
}

impl From<FrameType> for u8 {
    fn from(ty: FrameType) -> Self {
        ty.as_u8()
    }
}

impl TryFrom<u8> for FrameType {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0x00 => Ok(FrameType::DataUnsequenced),
            0x80 => Ok(FrameType::DataSequenced),
            0x40 => Ok(FrameType::Ack),
            0x04 => Ok(FrameType::Nak),
            other => Err(other),
        }
    }
}

/// Total length of a message carrying `payload_len` frame payload bytes.
pub const fn message_len(payload_len: usize) -> usize {
    SYN_LEN + FRAME_HEADER_LEN + CHECKSUM_LEN + payload_len + CHECKSUM_LEN
}

/// Total length of a command message carrying `payload_len` application bytes.
pub const fn command_message_len(payload_len: usize) -> usize {
    message_len(COMMAND_HEADER_LEN + payload_len)
}

/// Byte offsets of fields, relative to the start of a message.
pub mod offset {
    use super::{CHECKSUM_LEN, FRAME_HEADER_LEN, SYN_LEN};

    pub const FRAME: usize = SYN_LEN;
    pub const FRAME_TYPE: usize = FRAME;
    pub const FRAME_LEN: usize = FRAME + 1;
    pub const FRAME_SEQ: usize = FRAME + 3;
    pub const FRAME_CRC: usize = FRAME + FRAME_HEADER_LEN;
    pub const PAYLOAD: usize = FRAME_CRC + CHECKSUM_LEN;

    pub const COMMAND_TYPE: usize = PAYLOAD;
    pub const COMMAND_TC: usize = PAYLOAD + 1;
    pub const COMMAND_TID_OUT: usize = PAYLOAD + 2;
    pub const COMMAND_TID_IN: usize = PAYLOAD + 3;
    pub const COMMAND_IID: usize = PAYLOAD + 4;
    pub const COMMAND_RQID: usize = PAYLOAD + 5;
    pub const COMMAND_CID: usize = PAYLOAD + 7;
    pub const COMMAND_PAYLOAD: usize = PAYLOAD + 8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_message_is_ten_bytes() {
        assert_eq!(CONTROL_MESSAGE_LEN, 10);
    }

    #[test]
    fn command_message_len_includes_command_header() {
        assert_eq!(command_message_len(0), 18);
        assert_eq!(command_message_len(2), 20);
    }

    #[test]
    fn frame_type_tags() {
        for ty in [
            FrameType::DataUnsequenced,
            FrameType::DataSequenced,
            FrameType::Ack,
            FrameType::Nak,
        ] {
            assert_eq!(FrameType::try_from(ty.as_u8()), Ok(ty));
        }
        assert_eq!(FrameType::try_from(0x41), Err(0x41));
    }

    #[test]
    fn command_offsets_follow_frame_crc() {
        assert_eq!(offset::PAYLOAD, 8);
        assert_eq!(offset::COMMAND_PAYLOAD, offset::PAYLOAD + COMMAND_HEADER_LEN);
    }
}
