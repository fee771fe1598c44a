//! Defer injection for exercising retry paths.
//!
//! Decides, per physical transaction, whether a fake sink answers DEFER.

use rand::Rng;
use std::collections::HashSet;

/// Decision for one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferDecision {
    Defer,
    Pass,
}

/// Pattern for defer injection, keyed by transaction index (0-based)
#[derive(Debug, Clone)]
pub enum DeferPattern {
    /// Never defer
    None,
    /// Defer the first `count` transactions, then pass everything
    First { count: u64 },
    /// Defer every transaction
    Always,
    /// Defer every Nth transaction
    Periodic { every_n: u64 },
    /// Defer randomly with given probability (0.0-1.0)
    Random { probability: f64 },
    /// Defer a run of transactions starting at index
    Burst { start: u64, length: u64 },
    /// Defer specific transaction indices
    Specific { indices: HashSet<u64> },
    /// Defer if any pattern defers
    Combined(Vec<DeferPattern>),
}

/// Generates DEFER replies for fake buses.
///
/// # Example
///
/// ```
/// use auxlink_test_support::defer::{DeferDecision, DeferGenerator};
///
/// let mut gen = DeferGenerator::first(2);
///
/// assert_eq!(gen.next_decision(), DeferDecision::Defer);
/// assert_eq!(gen.next_decision(), DeferDecision::Defer);
/// assert_eq!(gen.next_decision(), DeferDecision::Pass);
/// ```
pub struct DeferGenerator {
    pattern: DeferPattern,
    index: u64,
    deferred: u64,
    rng: rand::rngs::ThreadRng,
}

impl Default for DeferGenerator {
    fn default() -> Self {
        Self::none()
    }
}

impl DeferGenerator {
    pub fn new(pattern: DeferPattern) -> Self {
        Self {
            pattern,
            index: 0,
            deferred: 0,
            rng: rand::thread_rng(),
        }
    }

    pub fn none() -> Self {
        Self::new(DeferPattern::None)
    }

    pub fn always() -> Self {
        Self::new(DeferPattern::Always)
    }

    pub fn first(count: u64) -> Self {
        Self::new(DeferPattern::First { count })
    }

    pub fn periodic(every_n: u64) -> Self {
        Self::new(DeferPattern::Periodic { every_n })
    }

    pub fn random(probability: f64) -> Self {
        Self::new(DeferPattern::Random {
            probability: probability.clamp(0.0, 1.0),
        })
    }

    pub fn burst(start: u64, length: u64) -> Self {
        Self::new(DeferPattern::Burst { start, length })
    }

    pub fn specific(indices: impl IntoIterator<Item = u64>) -> Self {
        Self::new(DeferPattern::Specific {
            indices: indices.into_iter().collect(),
        })
    }

    /// Decide for the next transaction and advance the index.
    pub fn next_decision(&mut self) -> DeferDecision {
        let index = self.index;
        self.index += 1;
        let pattern = self.pattern.clone();
        let decision = self.check_pattern(index, &pattern);
        if decision == DeferDecision::Defer {
            self.deferred += 1;
        }
        decision
    }

    fn check_pattern(&mut self, index: u64, pattern: &DeferPattern) -> DeferDecision {
        let defer = match pattern {
            DeferPattern::None => false,
            DeferPattern::First { count } => index < *count,
            DeferPattern::Always => true,
            // 1-based so `every_n: 3` defers the 3rd, 6th, ...
            DeferPattern::Periodic { every_n } => *every_n > 0 && (index + 1) % *every_n == 0,
            DeferPattern::Random { probability } => self.rng.gen::<f64>() < *probability,
            DeferPattern::Burst { start, length } => index >= *start && index < start + length,
            DeferPattern::Specific { indices } => indices.contains(&index),
            DeferPattern::Combined(patterns) => {
                return if patterns
                    .iter()
                    .any(|p| self.check_pattern(index, p) == DeferDecision::Defer)
                {
                    DeferDecision::Defer
                } else {
                    DeferDecision::Pass
                };
            }
        };

        if defer {
            DeferDecision::Defer
        } else {
            DeferDecision::Pass
        }
    }

    pub fn stats(&self) -> DeferStats {
        DeferStats {
            transactions: self.index,
            deferred: self.deferred,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferStats {
    pub transactions: u64,
    pub deferred: u64,
}
