//! # auxlink
//!
//! Retry and chunking discipline for transactions over a DisplayPort-style
//! AUX channel, plus a trace-logging bus decorator.
//!
//! ## Features
//!
//! - **Composable**: Trait-based layers - wrap any [`AuxBus`] in a logger, a retrying channel, or both
//! - **Bounded**: Reads and writes of any length, split to the bus transaction size
//! - **Predictable**: Four logical outcomes, one caller-supplied retry budget per call
//! - **No allocations per call**: Write staging and trace scratch are preallocated
//!
//! ## Bus Trait
//!
//! Physical buses, decorators and test fakes implement [`AuxBus`]:
//!
//! ```rust,ignore
//! use auxlink::{create_logger, LogicalOutcome, RetryingChannel};
//!
//! let mut channel = RetryingChannel::new(create_logger(&mut phys))?;
//! let mut caps = [0u8; 16];
//! if channel.read(0x0000, &mut caps, 7) == LogicalOutcome::Ack {
//!     // DPCD receiver capabilities
//! }
//! ```
//!
//! ## Outcomes
//!
//! - `Ack`: every byte transferred
//! - `Nack`: the sink rejected the transaction, never retried
//! - `UnsupportedRegister`: zero bytes transferred, never retried
//! - `Defer`: the sink kept deferring, or partial transfers used up the budget

// Tracing macros - no-op when feature disabled
#[cfg(feature = "tracing")]
macro_rules! trace_debug { ($($arg:tt)*) => { tracing::debug!($($arg)*) } }
#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug { ($($arg:tt)*) => {} }

#[cfg(feature = "tracing")]
macro_rules! trace_warn { ($($arg:tt)*) => { tracing::warn!($($arg)*) } }
#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn { ($($arg:tt)*) => {} }

mod bus;
pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod logger;
pub mod retry;

// Core trait - all buses implement this
pub use bus::{Action, AuxBus, BusStatus, TransactionType, Transfer};

pub use classify::{classify, LogicalOutcome, RetryBudget, Verdict};
pub use config::{ChannelConfig, DEFAULT_RETRIES};
pub use error::{AuxError, Result};
pub use logger::{create_logger, LoggingChannel, TraceSink, TracingSink};
pub use retry::RetryingChannel;

pub use auxlink_shared::{mailbox, MessageHeader, RequestId};
