//! Chunked, retrying reads and writes over an [`AuxBus`].
//!
//! ```text
//! read/write ──► chunk loop (≤ transaction_size) ──► retry loop ──► bus.transaction()
//!                                                        │
//!                                                        └──► classify() ──► Terminal | Retry
//! ```

use crate::bus::{Action, AuxBus, TransactionType};
use crate::classify::{classify, LogicalOutcome, RetryBudget, Verdict};
use crate::config::ChannelConfig;
use crate::error::{AuxError, Result};

/// Splits logical reads and writes into bus-sized transactions and retries
/// each one until it resolves or the caller's budget runs out.
///
/// Holds `B` by value; pass `&mut bus` to borrow a bus owned elsewhere.
pub struct RetryingChannel<B: AuxBus> {
    bus: B,
    config: ChannelConfig,
    /// Cached `bus.transaction_size()`, fixed for the bus lifetime
    limit: usize,
    /// Write chunk staging, `limit` bytes, allocated once
    scratch: Vec<u8>,
}

impl<B: AuxBus> RetryingChannel<B> {
    pub fn new(bus: B) -> Result<Self> {
        Self::with_config(bus, ChannelConfig::default())
    }

    pub fn with_config(bus: B, config: ChannelConfig) -> Result<Self> {
        config.validate()?;
        let limit = bus.transaction_size();
        if limit == 0 {
            return Err(AuxError::ZeroTransactionSize);
        }

        Ok(Self {
            bus,
            config,
            limit,
            scratch: vec![0u8; limit],
        })
    }

    /// Read `buffer.len()` bytes starting at `address`.
    ///
    /// Allows spans larger than the bus transaction size. `retries` is shared
    /// by every chunk of this call.
    pub fn read(&mut self, address: u32, buffer: &mut [u8], retries: u32) -> LogicalOutcome {
        let mut budget = RetryBudget::new(retries);
        self.read_with_budget(address, buffer, &mut budget)
    }

    /// Write `data` starting at `address`.
    ///
    /// Allows spans larger than the bus transaction size. `retries` is shared
    /// by every chunk of this call.
    pub fn write(&mut self, address: u32, data: &[u8], retries: u32) -> LogicalOutcome {
        let mut budget = RetryBudget::new(retries);
        self.write_with_budget(address, data, &mut budget)
    }

    /// [`read`](Self::read) with the configured default retries.
    pub fn read_default(&mut self, address: u32, buffer: &mut [u8]) -> LogicalOutcome {
        self.read(address, buffer, self.config.default_retries)
    }

    /// [`write`](Self::write) with the configured default retries.
    pub fn write_default(&mut self, address: u32, data: &[u8]) -> LogicalOutcome {
        self.write(address, data, self.config.default_retries)
    }

    /// Like [`read`](Self::read), spending from a caller-held budget.
    pub fn read_with_budget(
        &mut self,
        address: u32,
        buffer: &mut [u8],
        budget: &mut RetryBudget,
    ) -> LogicalOutcome {
        let kind = self.config.transaction_type;
        let mut offset = 0;

        while offset < buffer.len() {
            let chunk = (buffer.len() - offset).min(self.limit);
            let outcome = transact(
                &mut self.bus,
                Action::Read,
                kind,
                chunk_address(address, offset),
                &mut buffer[offset..offset + chunk],
                budget,
            );
            if !outcome.is_ack() {
                return outcome;
            }
            offset += chunk;
        }

        LogicalOutcome::Ack
    }

    /// Like [`write`](Self::write), spending from a caller-held budget.
    pub fn write_with_budget(
        &mut self,
        address: u32,
        data: &[u8],
        budget: &mut RetryBudget,
    ) -> LogicalOutcome {
        let kind = self.config.transaction_type;
        let mut offset = 0;

        while offset < data.len() {
            let chunk = (data.len() - offset).min(self.limit);
            let staged = &mut self.scratch[..chunk];
            staged.copy_from_slice(&data[offset..offset + chunk]);

            let outcome = transact(
                &mut self.bus,
                Action::Write,
                kind,
                chunk_address(address, offset),
                staged,
                budget,
            );
            if !outcome.is_ack() {
                return outcome;
            }
            offset += chunk;
        }

        LogicalOutcome::Ack
    }

    /// Read a single chunk that fits in one physical transaction.
    pub fn read_transaction(
        &mut self,
        address: u32,
        buffer: &mut [u8],
        retries: u32,
    ) -> Result<LogicalOutcome> {
        self.check_chunk(buffer.len())?;
        let mut budget = RetryBudget::new(retries);
        Ok(transact(
            &mut self.bus,
            Action::Read,
            self.config.transaction_type,
            address,
            buffer,
            &mut budget,
        ))
    }

    /// Write a single chunk that fits in one physical transaction.
    pub fn write_transaction(
        &mut self,
        address: u32,
        data: &[u8],
        retries: u32,
    ) -> Result<LogicalOutcome> {
        self.check_chunk(data.len())?;
        let staged = &mut self.scratch[..data.len()];
        staged.copy_from_slice(data);
        let mut budget = RetryBudget::new(retries);
        Ok(transact(
            &mut self.bus,
            Action::Write,
            self.config.transaction_type,
            address,
            staged,
            &mut budget,
        ))
    }

    #[inline]
    pub fn transaction_size(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    #[inline]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    #[inline]
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_inner(self) -> B {
        self.bus
    }

    fn check_chunk(&self, size: usize) -> Result<()> {
        if size > self.limit {
            return Err(AuxError::ChunkTooLarge {
                size,
                limit: self.limit,
            });
        }
        Ok(())
    }
}

#[inline]
fn chunk_address(base: u32, offset: usize) -> u32 {
    base.wrapping_add(offset as u32)
}

/// One chunk: issue the transaction until it resolves.
///
/// A `Retry` verdict loops only if the budget had a retry to spend before
/// this attempt; otherwise the chunk gives up as `Defer`.
fn transact<B: AuxBus>(
    bus: &mut B,
    action: Action,
    kind: TransactionType,
    address: u32,
    buffer: &mut [u8],
    budget: &mut RetryBudget,
) -> LogicalOutcome {
    let requested = buffer.len();

    loop {
        let had_retry = !budget.is_exhausted();
        let transfer = bus.transaction(action, kind, address, buffer);

        match classify(transfer.status, transfer.completed, requested, budget) {
            Verdict::Terminal(outcome) => {
                if !outcome.is_ack() {
                    trace_debug!(
                        "aux {} {:#x} ({} bytes): {}",
                        action,
                        address,
                        requested,
                        outcome
                    );
                }
                return outcome;
            }
            Verdict::Retry if had_retry => continue,
            Verdict::Retry => {
                trace_warn!(
                    "aux {} {:#x} ({} bytes): retries exhausted after {} ({}/{} completed)",
                    action,
                    address,
                    requested,
                    transfer.status,
                    transfer.completed,
                    requested
                );
                return LogicalOutcome::Defer;
            }
        }
    }
}
