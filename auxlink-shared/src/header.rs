//! Sideband message header.

use crate::address::RelativeAddress;
use crate::bits::BitReader;
use crate::crc4::header_crc4;

/// Smallest possible header: LCT/LCR byte, length byte, flags/CRC byte.
pub const MIN_HEADER_SIZE: usize = 3;

/// Sideband message header.
///
/// Layout (bit fields, MSB first):
/// ```text
/// Field                    Bits
/// link_count_total         4
/// link_count_remaining     4
/// RAD port numbers         4 * (link_count_total - 1), padded to a byte
/// broadcast                1
/// path                     1
/// body_length              6
/// start_of_transaction     1
/// end_of_transaction       1
/// zero                     1
/// sequence_number          1
/// header_crc               4
/// ```
///
/// The CRC covers every nibble of the header except itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHeader {
    /// Peer the message is routed to / from
    pub address: RelativeAddress,
    pub link_count_total: u8,
    pub link_count_remaining: u8,
    pub is_broadcast: bool,
    pub is_path_message: bool,
    /// Body bytes that follow the header (including body CRC)
    pub body_length: u8,
    pub is_transaction_start: bool,
    pub is_transaction_end: bool,
    /// Message sequence number (0 or 1)
    pub sequence_number: u8,
    pub crc: u8,
    /// Header length in bits as consumed by the decoder
    pub size_bits: usize,
    /// Computed CRC matched the stored one
    pub crc_valid: bool,
}

/// Strict header decoding failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("truncated header: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },
    #[error("invalid link count total: {0}")]
    InvalidLinkCount(u8),
    #[error("header crc mismatch: stored {stored:#x}, computed {computed:#x}")]
    CrcMismatch { stored: u8, computed: u8 },
}

impl MessageHeader {
    /// Header length in whole bytes.
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.size_bits / 8
    }

    /// Decode a header, rejecting truncated input, out-of-range link counts
    /// and CRC mismatches.
    pub fn decode(bytes: &[u8]) -> Result<Self, HeaderError> {
        let header = Self::decode_lossy(bytes);

        if header.link_count_total == 0 || header.link_count_total == 15 {
            return Err(HeaderError::InvalidLinkCount(header.link_count_total));
        }
        if bytes.len() < header.size_bytes() {
            return Err(HeaderError::Truncated {
                needed: header.size_bytes(),
                available: bytes.len(),
            });
        }
        if !header.crc_valid {
            return Err(HeaderError::CrcMismatch {
                stored: header.crc,
                computed: header_crc4(bytes, header.size_bytes() * 2 - 1),
            });
        }
        Ok(header)
    }

    /// Decode a header without failing.
    ///
    /// Missing bits read as zero. A link count of zero is treated as having
    /// no RAD. Use this for diagnostics where a best-effort view is enough.
    pub fn decode_lossy(bytes: &[u8]) -> Self {
        let mut reader = BitReader::new(bytes);
        let mut header = MessageHeader {
            link_count_total: reader.read_or_default(4, 0),
            link_count_remaining: reader.read_or_default(4, 0),
            ..Default::default()
        };

        for _ in 0..header.link_count_total.saturating_sub(1) {
            header.address.push(reader.read_or_default(4, 0));
        }
        reader.align(8);

        header.is_broadcast = reader.read_or_default(1, 0) != 0;
        header.is_path_message = reader.read_or_default(1, 0) != 0;
        header.body_length = reader.read_or_default(6, 0);
        header.is_transaction_start = reader.read_or_default(1, 0) != 0;
        header.is_transaction_end = reader.read_or_default(1, 0) != 0;
        reader.read_or_default(1, 0);
        header.sequence_number = reader.read_or_default(1, 0);
        header.crc = reader.read_or_default(4, 0);
        header.size_bits = reader.offset();

        header.crc_valid =
            !reader.overrun() && header_crc4(bytes, header.size_bytes() * 2 - 1) == header.crc;
        header
    }
}
