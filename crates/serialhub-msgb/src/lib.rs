//! Message builder for the serial hub link protocol.
//!
//! Every message on the link is framed with:
//! - A 2-byte SYN marker (`AA 55`) for stream synchronization
//! - A 4-byte frame header (type, little-endian payload length, sequence id)
//! - A 2-byte checksum over the frame header
//! - The frame payload (empty for ACK/NAK)
//! - A 2-byte checksum over the frame payload
//!
//! Messages are assembled into caller-owned storage through [`MessageBuffer`].
//! Nothing is ever written past the end of that storage.

pub mod checksum;
pub mod error;
pub mod layout;
pub mod msgbuf;
pub mod request;
pub mod writer;

pub use checksum::{Checksum, Crc16CcittFalse};
pub use error::{MsgbError, Result};
pub use layout::{
    command_message_len, message_len, FrameType, CHECKSUM_LEN, COMMAND_HEADER_LEN,
    COMMAND_MAX_PAYLOAD, CONTROL_MESSAGE_LEN, FRAME_HEADER_LEN, FRAME_MAX_PAYLOAD,
    PAYLOAD_TYPE_COMMAND, SYN, SYN_LEN,
};
pub use msgbuf::MessageBuffer;
pub use request::Request;
pub use writer::{MessageWriter, WriterConfig};
