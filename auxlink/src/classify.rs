//! Transaction outcome classification.
//!
//! Maps one physical [`Transfer`](crate::Transfer) plus the remaining retry
//! budget to either a terminal [`LogicalOutcome`] or a request to retry.

use crate::bus::BusStatus;
use std::fmt;

/// Outcome of a logical read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOutcome {
    /// Every byte transferred
    Ack,
    /// Sink rejected the transaction
    Nack,
    /// Sink kept deferring, or retries ran out on a partial transfer
    Defer,
    /// Zero bytes transferred: the address is not implemented
    UnsupportedRegister,
}

impl LogicalOutcome {
    #[inline]
    pub fn is_ack(self) -> bool {
        self == LogicalOutcome::Ack
    }
}

impl fmt::Display for LogicalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalOutcome::Ack => "ack",
            LogicalOutcome::Nack => "nack",
            LogicalOutcome::Defer => "defer",
            LogicalOutcome::UnsupportedRegister => "unsupported register",
        })
    }
}

/// Classifier decision for one physical transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Terminal(LogicalOutcome),
    Retry,
}

/// Retries left for one logical read or write.
///
/// Shared by every chunk of the call it was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryBudget(u32);

impl RetryBudget {
    #[inline]
    pub fn new(retries: u32) -> Self {
        Self(retries)
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.0 == 0
    }

    /// Spend one retry. Returns `false` if none were left.
    #[inline]
    pub fn try_consume(&mut self) -> bool {
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        true
    }
}

impl From<u32> for RetryBudget {
    fn from(retries: u32) -> Self {
        Self(retries)
    }
}

/// Classify one physical transaction.
///
/// Rules, first match wins:
/// 1. success with every requested byte (and at least one) → `Ack`
/// 2. defer → `Retry`, spending a retry if any are left
/// 3. nack → `Nack`
/// 4. nothing transferred → `UnsupportedRegister`
/// 5. partial transfer → `Retry`, spending a retry if any are left
/// 6. otherwise → `Ack`
///
/// Deciding whether a `Retry` actually loops belongs to the caller, which
/// knows whether the budget had room before this attempt.
pub fn classify(
    status: BusStatus,
    completed: usize,
    requested: usize,
    budget: &mut RetryBudget,
) -> Verdict {
    if status == BusStatus::Success && completed == requested && completed != 0 {
        return Verdict::Terminal(LogicalOutcome::Ack);
    }

    if status == BusStatus::Defer {
        budget.try_consume();
        return Verdict::Retry;
    }

    if status == BusStatus::Nack {
        return Verdict::Terminal(LogicalOutcome::Nack);
    }

    if completed == 0 {
        return Verdict::Terminal(LogicalOutcome::UnsupportedRegister);
    }

    if completed < requested {
        budget.try_consume();
        return Verdict::Retry;
    }

    Verdict::Terminal(LogicalOutcome::Ack)
}
