//! Test support for auxlink: fake sinks, defer injection and trace capture.
//!
//! - [`MemoryBus`]: deterministic register file with NACK / unsupported ranges
//! - [`ScriptedBus`]: replays a fixed list of replies
//! - [`defer::DeferGenerator`]: which transactions a fake sink defers
//! - [`RecordingSink`]: keeps every line a `LoggingChannel` emits

pub mod defer;
pub mod memory;
pub mod scripted;
pub mod sink;

pub use defer::{DeferDecision, DeferGenerator, DeferPattern};
pub use memory::{MemoryBus, Record};
pub use scripted::{Completed, Reply, ScriptedBus};
pub use sink::RecordingSink;
