//! # auxlink-shared
//!
//! Shared sideband protocol types for the auxlink AUX channel core.
//!
//! This crate provides the low-level message types used by the logging
//! channel and by any tooling that inspects mailbox traffic:
//!
//! - [`MessageHeader`]: sideband message header decoder (strict and lossy)
//! - [`RelativeAddress`]: RAD peer address carried in the header
//! - [`RequestId`]: sideband request identifier labels
//! - Mailbox DPCD addresses and the header CRC-4
//!
//! ## Layer Diagram
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ auxlink (Channel Layer)                 │
//! │ - RetryingChannel, LoggingChannel       │
//! └────────────────────┬────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────┐
//! │ auxlink-shared (Message Layer)          │
//! │ - MessageHeader, RequestId (Bits)       │  ← This crate
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use auxlink_shared::{MessageHeader, mailbox};
//!
//! // LCT=1, LCR=0, no RAD, body_len=3, start+end of transaction, seq 0
//! let mut bytes = [0x10u8, 0x03, 0xC0];
//! bytes[2] |= auxlink_shared::crc4::header_crc4(&bytes, 5);
//!
//! let header = MessageHeader::decode(&bytes).unwrap();
//! assert!(header.is_transaction_start && header.is_transaction_end);
//! assert_eq!(header.size_bytes(), 3);
//! assert!(mailbox::is_mailbox(mailbox::DOWN_REQ));
//! ```

mod address;
mod bits;
mod header;
mod request;

pub use address::{RelativeAddress, MAX_RAD_PORTS};
pub use header::{HeaderError, MessageHeader, MIN_HEADER_SIZE};
pub use request::RequestId;

/// DPCD mailbox windows used for sideband message exchange.
pub mod mailbox {
    /// Downstream request (source → branch)
    pub const DOWN_REQ: u32 = 0x1000;
    /// Upstream reply (source → branch)
    pub const UP_REP: u32 = 0x1200;
    /// Downstream reply (branch → source)
    pub const DOWN_REP: u32 = 0x1400;
    /// Upstream request (branch → source)
    pub const UP_REQ: u32 = 0x1600;

    /// All four mailbox base addresses.
    pub const ALL: [u32; 4] = [DOWN_REQ, UP_REP, DOWN_REP, UP_REQ];

    /// True if `address` is exactly one of the mailbox base addresses.
    #[inline]
    pub fn is_mailbox(address: u32) -> bool {
        ALL.contains(&address)
    }
}

/// Sideband header CRC utilities
pub mod crc4 {
    /// CRC-4 over the first `nibbles` nibbles of `data` (x^4 + x + 1).
    ///
    /// Nibbles are consumed most-significant first. Bytes beyond `data`
    /// count as zero.
    pub fn header_crc4(data: &[u8], nibbles: usize) -> u8 {
        let mut remainder: u8 = 0;

        for bit in 0..nibbles * 4 {
            let byte = data.get(bit / 8).copied().unwrap_or(0);
            remainder = (remainder << 1) | ((byte >> (7 - (bit % 8))) & 1);
            if remainder & 0x10 != 0 {
                remainder ^= 0x13;
            }
        }

        // Flush four zero bits through the register
        for _ in 0..4 {
            remainder <<= 1;
            if remainder & 0x10 != 0 {
                remainder ^= 0x13;
            }
        }

        remainder & 0x0F
    }
}
