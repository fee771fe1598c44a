//! Composable AUX bus trait
//!
//! Enables layered buses: `RetryingChannel<LoggingChannel<Phys>>`, test fakes, etc.

use std::fmt;

/// Direction of a single physical transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Write,
    /// I2C-over-AUX write status poll
    WriteStatusUpdateRequest,
}

/// Addressing mode of a single physical transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransactionType {
    /// DPCD register space
    #[default]
    Native,
    /// I2C-over-AUX, stop after the transaction
    I2c,
    /// I2C-over-AUX with middle-of-transaction bit set
    I2cMot,
}

/// Raw status reported by the physical bus for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusStatus {
    Success,
    /// Sink is busy, retry later
    Defer,
    /// Sink rejected the transaction
    Nack,
    /// Bus-level failure (timeout, protocol error, ...)
    Failure,
}

/// Result of a single physical transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub status: BusStatus,
    /// Bytes the bus reports as transferred
    pub completed: usize,
}

impl Transfer {
    #[inline]
    pub fn new(status: BusStatus, completed: usize) -> Self {
        Self { status, completed }
    }
}

/// Core bus trait - physical buses, decorators and fakes implement this
pub trait AuxBus {
    /// Perform exactly one physical transaction over `buffer`.
    ///
    /// The requested size is `buffer.len()`. Reads fill `buffer`; writes
    /// take their data from it.
    fn transaction(
        &mut self,
        action: Action,
        kind: TransactionType,
        address: u32,
        buffer: &mut [u8],
    ) -> Transfer;

    /// Largest request one physical transaction can complete. Constant for
    /// the lifetime of the bus.
    fn transaction_size(&self) -> usize;
}

/// Lets channels borrow a bus they do not own.
impl<B: AuxBus + ?Sized> AuxBus for &mut B {
    #[inline]
    fn transaction(
        &mut self,
        action: Action,
        kind: TransactionType,
        address: u32,
        buffer: &mut [u8],
    ) -> Transfer {
        (**self).transaction(action, kind, address, buffer)
    }

    #[inline]
    fn transaction_size(&self) -> usize {
        (**self).transaction_size()
    }
}

impl<B: AuxBus + ?Sized> AuxBus for Box<B> {
    #[inline]
    fn transaction(
        &mut self,
        action: Action,
        kind: TransactionType,
        address: u32,
        buffer: &mut [u8],
    ) -> Transfer {
        (**self).transaction(action, kind, address, buffer)
    }

    #[inline]
    fn transaction_size(&self) -> usize {
        (**self).transaction_size()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Read => "rd",
            Action::Write => "wr",
            Action::WriteStatusUpdateRequest => "wsur",
        })
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionType::Native => "nat",
            TransactionType::I2c => "i2c",
            TransactionType::I2cMot => "i2c-mot",
        })
    }
}

impl fmt::Display for BusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BusStatus::Success => "ACK",
            BusStatus::Defer => "DEFER",
            BusStatus::Nack => "NACK",
            BusStatus::Failure => "FAIL",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl AuxBus for Echo {
        fn transaction(
            &mut self,
            _action: Action,
            _kind: TransactionType,
            address: u32,
            buffer: &mut [u8],
        ) -> Transfer {
            buffer.fill(address as u8);
            Transfer::new(BusStatus::Success, buffer.len())
        }

        fn transaction_size(&self) -> usize {
            16
        }
    }

    fn read_through<B: AuxBus>(mut bus: B) -> Transfer {
        let mut buf = [0u8; 4];
        bus.transaction(Action::Read, TransactionType::Native, 7, &mut buf)
    }

    #[test]
    fn test_borrowed_bus_forwards() {
        let mut bus = Echo;
        let result = read_through(&mut bus);
        assert_eq!(result, Transfer::new(BusStatus::Success, 4));
        assert_eq!((&mut bus).transaction_size(), 16);
    }

    #[test]
    fn test_boxed_bus_forwards() {
        let bus: Box<dyn AuxBus> = Box::new(Echo);
        assert_eq!(bus.transaction_size(), 16);
        assert_eq!(read_through(bus).completed, 4);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Action::Read.to_string(), "rd");
        assert_eq!(TransactionType::I2cMot.to_string(), "i2c-mot");
        assert_eq!(BusStatus::Defer.to_string(), "DEFER");
        assert_eq!(TransactionType::default(), TransactionType::Native);
    }
}
