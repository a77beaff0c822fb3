//! Message builder for the serial hub link protocol.
//!
//! serialhub assembles byte-exact link messages (ACK, NAK, sequenced commands)
//! into bounded, caller-owned storage.
//!
//! # Crate Structure
//!
//! - [`msgb`] — Bounded message buffer and message encoders

/// Re-export message builder types.
pub mod msgb {
    pub use serialhub_msgb::*;
}
