use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::error::{MsgbError, Result};
use crate::layout::{COMMAND_MAX_PAYLOAD, CONTROL_MESSAGE_LEN};
use crate::msgbuf::MessageBuffer;
use crate::request::Request;

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Configuration for the message writer.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Maximum application payload of a command. Default: [`COMMAND_MAX_PAYLOAD`].
    pub max_payload_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            max_payload_size: COMMAND_MAX_PAYLOAD,
        }
    }
}

/// Encodes complete messages and writes them to any `Write` stream.
pub struct MessageWriter<T> {
    inner: T,
    buf: BytesMut,
    len: usize,
    config: WriterConfig,
}

impl<T: Write> MessageWriter<T> {
    /// Create a new message writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WriterConfig::default())
    }

    /// Create a new message writer with explicit configuration.
    pub fn with_config(inner: T, config: WriterConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            len: 0,
            config,
        }
    }

    /// Write an ACK for sequence id `seq`. Returns the number of bytes written.
    pub fn write_ack(&mut self, seq: u8) -> Result<usize> {
        self.send(CONTROL_MESSAGE_LEN, |msgb| msgb.push_ack(seq))
    }

    /// Write a NAK. Returns the number of bytes written.
    pub fn write_nak(&mut self) -> Result<usize> {
        self.send(CONTROL_MESSAGE_LEN, |msgb| msgb.push_nak())
    }

    /// Write a sequenced command. Returns the number of bytes written.
    pub fn write_cmd(&mut self, seq: u8, rqid: u16, rqst: &Request<'_>) -> Result<usize> {
        let max = self.config.max_payload_size.min(COMMAND_MAX_PAYLOAD);
        if rqst.payload.len() > max {
            self.len = 0;
            return Err(MsgbError::PayloadTooLarge {
                size: rqst.payload.len(),
                max,
            });
        }

        self.send(rqst.message_len(), |msgb| msgb.push_cmd(seq, rqid, rqst))
    }

    fn send<F>(&mut self, len: usize, encode: F) -> Result<usize>
    where
        F: FnOnce(&mut MessageBuffer<'_>) -> Result<()>,
    {
        self.len = 0;
        self.buf.clear();
        self.buf.resize(len, 0);

        let mut msgb = MessageBuffer::new(&mut self.buf[..]);
        encode(&mut msgb)?;
        let used = msgb.used();
        self.len = used;
        trace!(len = used, "encoded message");

        let mut offset = 0usize;
        while offset < used {
            match self.inner.write(&self.buf[offset..used]) {
                Ok(0) => return Err(MsgbError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(MsgbError::Io(err)),
            }
        }

        self.flush()?;
        Ok(used)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(MsgbError::Io(err)),
            }
        }
    }

    /// The bytes of the most recently encoded message.
    ///
    /// Empty until a message has been encoded, or after encoding failed.
    pub fn last_message(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum command payload size for subsequent writes.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current writer configuration.
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }
}
