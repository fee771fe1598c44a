//! Scripted sink that replays a fixed sequence of replies.

use crate::memory::Record;
use auxlink::{Action, AuxBus, BusStatus, TransactionType, Transfer};
use std::collections::VecDeque;

/// How many bytes a scripted reply claims to have transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completed {
    /// Whatever was requested
    All,
    Bytes(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub status: BusStatus,
    pub completed: Completed,
}

impl Reply {
    pub fn ack() -> Self {
        Self {
            status: BusStatus::Success,
            completed: Completed::All,
        }
    }

    pub fn partial(bytes: usize) -> Self {
        Self {
            status: BusStatus::Success,
            completed: Completed::Bytes(bytes),
        }
    }

    pub fn defer() -> Self {
        Self {
            status: BusStatus::Defer,
            completed: Completed::Bytes(0),
        }
    }

    pub fn nack() -> Self {
        Self {
            status: BusStatus::Nack,
            completed: Completed::Bytes(0),
        }
    }

    pub fn failure(bytes: usize) -> Self {
        Self {
            status: BusStatus::Failure,
            completed: Completed::Bytes(bytes),
        }
    }
}

/// Replays queued replies in order, then answers with the fallback.
///
/// Reads are filled with `fill`, so tests can tell a touched buffer apart.
pub struct ScriptedBus {
    replies: VecDeque<Reply>,
    fallback: Reply,
    limit: usize,
    fill: u8,
    records: Vec<Record>,
}

impl ScriptedBus {
    pub fn new(transaction_size: usize) -> Self {
        Self {
            replies: VecDeque::new(),
            fallback: Reply::ack(),
            limit: transaction_size,
            fill: 0xA5,
            records: Vec::new(),
        }
    }

    pub fn with_replies(mut self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.replies.extend(replies);
        self
    }

    /// Reply used once the script is exhausted (default: full ACK).
    pub fn with_fallback(mut self, reply: Reply) -> Self {
        self.fallback = reply;
        self
    }

    pub fn with_fill(mut self, fill: u8) -> Self {
        self.fill = fill;
        self
    }

    pub fn push(&mut self, reply: Reply) {
        self.replies.push_back(reply);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn transaction_count(&self) -> usize {
        self.records.len()
    }

    pub fn remaining_replies(&self) -> usize {
        self.replies.len()
    }
}

impl AuxBus for ScriptedBus {
    fn transaction(
        &mut self,
        action: Action,
        kind: TransactionType,
        address: u32,
        buffer: &mut [u8],
    ) -> Transfer {
        let reply = self.replies.pop_front().unwrap_or(self.fallback);
        let completed = match reply.completed {
            Completed::All => buffer.len(),
            Completed::Bytes(n) => n,
        };

        if action == Action::Read {
            let touched = completed.min(buffer.len());
            buffer[..touched].fill(self.fill);
        }

        let transfer = Transfer::new(reply.status, completed);
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
