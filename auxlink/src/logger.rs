//! Transparent trace-logging decorator for any [`AuxBus`].
//!
//! Every transaction is forwarded unchanged; afterwards one line is rendered
//! into fixed scratch and handed to a [`TraceSink`].
//!
//! ```text
//! DP-AUX> ACK rd nat 0100h { 12 00 ff }
//! DP-AUX> INCOMPLETE FAIL wr nat 0200h { }
//! DP-AUX> ACK wr nat 1000h hint(to:1.2 SE LINK_ADDRESS #0) { 32 12 02 cc | 01 3c }
//! ```
//!
//! The mailbox form (third line) is emitted only in debug builds or with the
//! `verbose` feature.

use crate::bus::{Action, AuxBus, BusStatus, TransactionType, Transfer};
use crate::format::{HexDump, TraceLine};
use auxlink_shared::{mailbox, MessageHeader};
use std::fmt::Write;

/// Capacity of each hex dump (170 bytes at three characters per byte).
const HEX_CAPACITY: usize = 512;
/// Capacity of the rendered line.
const LINE_CAPACITY: usize = 1280;

/// Destination for rendered trace lines.
pub trait TraceSink {
    fn emit(&mut self, line: &str);
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    #[inline]
    fn emit(&mut self, line: &str) {
        (**self).emit(line)
    }
}

/// Forwards lines to `tracing` at INFO under target `auxlink::aux`.
///
/// Does nothing when the `tracing` feature is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    #[inline]
    fn emit(&mut self, line: &str) {
        #[cfg(feature = "tracing")]
        tracing::info!(target: "auxlink::aux", "{}", line);
        #[cfg(not(feature = "tracing"))]
        let _ = line;
    }
}

/// Wrap `bus` in a [`LoggingChannel`] that traces through `tracing`.
pub fn create_logger<B: AuxBus>(bus: B) -> LoggingChannel<B> {
    LoggingChannel::new(bus)
}

/// Decorator that traces each transaction of the wrapped bus.
///
/// Observation only: the [`Transfer`] returned is always the one the inner
/// bus produced. The scratch buffers are reused by every call.
pub struct LoggingChannel<B: AuxBus, S: TraceSink = TracingSink> {
    bus: B,
    sink: S,
    hex: HexDump<HEX_CAPACITY>,
    hex_body: HexDump<HEX_CAPACITY>,
    line: TraceLine<LINE_CAPACITY>,
}

impl<B: AuxBus> LoggingChannel<B> {
    pub fn new(bus: B) -> Self {
        Self::with_sink(bus, TracingSink)
    }
}

impl<B: AuxBus, S: TraceSink> LoggingChannel<B, S> {
    pub fn with_sink(bus: B, sink: S) -> Self {
        Self {
            bus,
            sink,
            hex: HexDump::new(),
            hex_body: HexDump::new(),
            line: TraceLine::new(),
        }
    }

    #[inline]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    #[inline]
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> (B, S) {
        (self.bus, self.sink)
    }

    fn trace_plain(
        &mut self,
        action: Action,
        kind: TransactionType,
        address: u32,
        transfer: Transfer,
        incomplete: &str,
    ) {
        self.line.clear();
        let _ = write!(
            self.line,
            "DP-AUX> {}{} {} {} {:04X}h {{ {}}}",
            incomplete, transfer.status, action, kind, address, self.hex
        );
        self.sink.emit(self.line.as_str());
    }

    /// Decode the sideband header and dump header and body separately.
    #[cfg_attr(
        not(any(debug_assertions, feature = "verbose")),
        allow(unused_variables)
    )]
    fn trace_mailbox(
        &mut self,
        action: Action,
        kind: TransactionType,
        address: u32,
        message: &[u8],
        transfer: Transfer,
        incomplete: &str,
    ) {
        let header = MessageHeader::decode_lossy(message);
        let (head, body) = message.split_at(header.size_bytes().min(message.len()));
        self.hex.render(head);
        self.hex_body.render(body);

        #[cfg(any(debug_assertions, feature = "verbose"))]
        {
            let request = match body.first() {
                Some(&id) if header.is_transaction_start && action == Action::Write => {
                    auxlink_shared::RequestId::label_lossy(id)
                }
                _ => "",
            };

            self.line.clear();
            let _ = write!(
                self.line,
                "DP-AUX> {}{} {} {} {:04X}h hint(to:{} {}{} {} #{}) {{ {}| {}}}",
                incomplete,
                transfer.status,
                action,
                kind,
                address,
                header.address,
                if header.is_transaction_start { "S" } else { "" },
                if header.is_transaction_end { "E" } else { "" },
                request,
                header.sequence_number,
                self.hex,
                self.hex_body
            );
            self.sink.emit(self.line.as_str());
        }
    }
}

impl<B: AuxBus, S: TraceSink> AuxBus for LoggingChannel<B, S> {
    fn transaction(
        &mut self,
        action: Action,
        kind: TransactionType,
        address: u32,
        buffer: &mut [u8],
    ) -> Transfer {
        let transfer = self.bus.transaction(action, kind, address, buffer);

        let requested = buffer.len();
        // A misbehaving bus may over-report; never slice past the buffer
        let completed = transfer.completed.min(requested);
        let incomplete = if transfer.completed != requested {
            "INCOMPLETE "
        } else {
            ""
        };

        if transfer.status == BusStatus::Success {
            if kind == TransactionType::Native && mailbox::is_mailbox(address) {
                self.trace_mailbox(
                    action,
                    kind,
                    address,
                    &buffer[..completed],
                    transfer,
                    incomplete,
                );
                return transfer;
            }
            self.hex.render(&buffer[..completed]);
        } else {
            self.hex.clear();
        }

        self.trace_plain(action, kind, address, transfer, incomplete);
        transfer
    }

    #[inline]
    fn transaction_size(&self) -> usize {
        self.bus.transaction_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(any(debug_assertions, feature = "verbose"))]
    use auxlink_shared::crc4::header_crc4;

    /// Answers with a fixed status and count, filling reads with 0x5A.
    struct Fixed {
        status: BusStatus,
        completed: usize,
    }

    impl AuxBus for Fixed {
        fn transaction(
            &mut self,
            action: Action,
            _kind: TransactionType,
            _address: u32,
            buffer: &mut [u8],
        ) -> Transfer {
            if action == Action::Read {
                buffer.fill(0x5A);
            }
            Transfer::new(self.status, self.completed)
        }

        fn transaction_size(&self) -> usize {
            16
        }
    }

    #[derive(Default)]
    struct Lines(Vec<String>);

    impl TraceSink for Lines {
        fn emit(&mut self, line: &str) {
            self.0.push(line.to_string());
        }
    }

    fn logger(status: BusStatus, completed: usize) -> LoggingChannel<Fixed, Lines> {
        LoggingChannel::with_sink(Fixed { status, completed }, Lines::default())
    }

    #[test]
    fn test_plain_read_line() {
        let mut log = logger(BusStatus::Success, 3);
        let mut buf = [0u8; 3];
        let transfer = log.transaction(Action::Read, TransactionType::Native, 0x100, &mut buf);

        assert_eq!(transfer, Transfer::new(BusStatus::Success, 3));
        assert_eq!(log.sink().0, vec!["DP-AUX> ACK rd nat 0100h { 5a 5a 5a }"]);
    }

    #[test]
    fn test_failure_has_empty_dump_and_incomplete_marker() {
        let mut log = logger(BusStatus::Failure, 0);
        let mut buf = [1u8, 2];
        log.transaction(Action::Write, TransactionType::I2c, 0x50, &mut buf);
        assert_eq!(log.sink().0, vec!["DP-AUX> INCOMPLETE FAIL wr i2c 0050h { }"]);
    }

    #[test]
    fn test_partial_success_dumps_completed_bytes_only() {
        let mut log = logger(BusStatus::Success, 1);
        let mut buf = [0u8; 4];
        log.transaction(Action::Read, TransactionType::Native, 0x2002, &mut buf);
        assert_eq!(
            log.sink().0,
            vec!["DP-AUX> INCOMPLETE ACK rd nat 2002h { 5a }"]
        );
    }

    #[test]
    fn test_over_reported_count_is_clamped_and_passed_through() {
        let mut log = logger(BusStatus::Success, 64);
        let mut buf = [0u8; 2];
        let transfer = log.transaction(Action::Read, TransactionType::Native, 0, &mut buf);
        assert_eq!(transfer.completed, 64);
        assert_eq!(log.sink().0, vec!["DP-AUX> INCOMPLETE ACK rd nat 0000h { 5a 5a }"]);
    }

    #[test]
    fn test_i2c_at_mailbox_address_is_plain() {
        let mut log = logger(BusStatus::Success, 1);
        let mut buf = [0u8; 1];
        log.transaction(Action::Read, TransactionType::I2c, mailbox::DOWN_REQ, &mut buf);
        assert_eq!(log.sink().0, vec!["DP-AUX> ACK rd i2c 1000h { 5a }"]);
    }

    #[cfg(any(debug_assertions, feature = "verbose"))]
    #[test]
    fn test_mailbox_write_line() {
        // LCT=3 (RAD 1.2), body 2 bytes, start+end, seq 0; body = LINK_ADDRESS
        let mut msg = vec![0x32u8, 0x12, 0x02, 0xC0, 0x01, 0x3C];
        msg[3] |= header_crc4(&msg, 7);
        let crc_byte = msg[3];

        let mut log = logger(BusStatus::Success, msg.len());
        log.transaction(Action::Write, TransactionType::Native, mailbox::DOWN_REQ, &mut msg);

        let expected = format!(
            "DP-AUX> ACK wr nat 1000h hint(to:1.2 SE LINK_ADDRESS #0) {{ 32 12 02 {:02x} | 01 3c }}",
            crc_byte
        );
        assert_eq!(log.sink().0, vec![expected]);
    }

    #[cfg(any(debug_assertions, feature = "verbose"))]
    #[test]
    fn test_mailbox_read_has_no_request_label() {
        let mut log = logger(BusStatus::Success, 4);
        let mut buf = [0u8; 4];
        log.transaction(Action::Read, TransactionType::Native, mailbox::DOWN_REP, &mut buf);

        // 0x5A: LCT=5 → RAD 5.10.5.10, then the flag/CRC byte is missing
        let line = &log.sink().0[0];
        assert!(line.starts_with("DP-AUX> ACK rd nat 1400h hint(to:5.10.5.10 "), "{}", line);
        assert!(line.ends_with("{ 5a 5a 5a 5a | }"), "{}", line);
    }

    #[test]
    fn test_transaction_size_forwarded() {
        let log = create_logger(Fixed {
            status: BusStatus::Success,
            completed: 0,
        });
        assert_eq!(log.transaction_size(), 16);
    }
}
