//! Deterministic memory-backed DPCD sink.

use crate::defer::{DeferDecision, DeferGenerator};
use auxlink::{Action, AuxBus, BusStatus, TransactionType, Transfer};
use std::collections::HashMap;
use std::ops::Range;

/// One observed physical transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub action: Action,
    pub kind: TransactionType,
    pub address: u32,
    pub requested: usize,
    pub transfer: Transfer,
}

/// Fake sink with a sparse register file (unwritten bytes read as zero).
///
/// Completes at most `transaction_size` bytes per transaction, like a real
/// AUX sink that stops at the burst limit. Address ranges can be marked as
/// unimplemented (zero-byte ACK) or rejecting (NACK), and a
/// [`DeferGenerator`] decides which transactions are deferred.
///
/// # Example
///
/// ```
/// use auxlink::{LogicalOutcome, RetryingChannel};
/// use auxlink_test_support::MemoryBus;
///
/// let mut bus = MemoryBus::new(16);
/// let mut channel = RetryingChannel::new(&mut bus).unwrap();
/// assert_eq!(channel.write(0x100, &[1, 2, 3], 0), LogicalOutcome::Ack);
///
/// let mut buf = [0u8; 3];
/// assert_eq!(channel.read(0x100, &mut buf, 0), LogicalOutcome::Ack);
/// assert_eq!(buf, [1, 2, 3]);
/// ```
pub struct MemoryBus {
    memory: HashMap<u32, u8>,
    limit: usize,
    unsupported: Vec<Range<u32>>,
    nacked: Vec<Range<u32>>,
    defers: DeferGenerator,
    records: Vec<Record>,
}

impl MemoryBus {
    pub fn new(transaction_size: usize) -> Self {
        Self {
            memory: HashMap::new(),
            limit: transaction_size,
            unsupported: Vec::new(),
            nacked: Vec::new(),
            defers: DeferGenerator::none(),
            records: Vec::new(),
        }
    }

    /// Transactions starting in `range` complete zero bytes.
    pub fn with_unsupported(mut self, range: Range<u32>) -> Self {
        self.unsupported.push(range);
        self
    }

    /// Transactions touching `range` are NACKed.
    pub fn with_nack(mut self, range: Range<u32>) -> Self {
        self.nacked.push(range);
        self
    }

    pub fn with_defers(mut self, defers: DeferGenerator) -> Self {
        self.defers = defers;
        self
    }

    /// Preload registers starting at `address`.
    pub fn load(&mut self, address: u32, bytes: &[u8]) {
        for (i, byte) in bytes.iter().enumerate() {
            self.memory.insert(address.wrapping_add(i as u32), *byte);
        }
    }

    pub fn peek(&self, address: u32) -> u8 {
        self.memory.get(&address).copied().unwrap_or(0)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn transaction_count(&self) -> usize {
        self.records.len()
    }

    pub fn clear_records(&mut self) {
        self.records.clear();
    }

    fn respond(&mut self, action: Action, address: u32, buffer: &mut [u8]) -> Transfer {
        if self.defers.next_decision() == DeferDecision::Defer {
            return Transfer::new(BusStatus::Defer, 0);
        }

        let end = address.saturating_add(buffer.len() as u32);
        if self
            .nacked
            .iter()
            .any(|r| address < r.end && r.start < end)
        {
            return Transfer::new(BusStatus::Nack, 0);
        }
        if self.unsupported.iter().any(|r| r.contains(&address)) {
            return Transfer::new(BusStatus::Success, 0);
        }

        let n = buffer.len().min(self.limit);
        match action {
            Action::Read => {
                for (i, slot) in buffer[..n].iter_mut().enumerate() {
                    *slot = self.peek(address.wrapping_add(i as u32));
                }
            }
            Action::Write => {
                for (i, byte) in buffer[..n].iter().enumerate() {
                    self.memory.insert(address.wrapping_add(i as u32), *byte);
                }
            }
            Action::WriteStatusUpdateRequest => {}
        }
        Transfer::new(BusStatus::Success, n)
    }
}

impl AuxBus for MemoryBus {
    fn transaction(
        &mut self,
        action: Action,
        kind: TransactionType,
        address: u32,
        buffer: &mut [u8],
    ) -> Transfer {
        let transfer = self.respond(action, address, buffer);
        self.records.push(Record {
            action,
            kind,
            address,
            requested: buffer.len(),
            transfer,
        });
        transfer
    }

    fn transaction_size(&self) -> usize {
        self.limit
    }
}
