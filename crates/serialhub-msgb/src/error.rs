/// Errors that can occur while building or writing messages.
#[derive(Debug, thiserror::Error)]
pub enum MsgbError {
    /// The backing storage cannot hold the requested write.
    #[error("message buffer exhausted (need {needed} bytes, {remaining} remaining)")]
    CapacityExceeded { needed: usize, remaining: usize },

    /// The command payload does not fit in a single frame.
    #[error("command payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while writing a message.
    #[error("message I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link was closed before the complete message was written.
    #[error("link closed (incomplete message)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, MsgbError>;
