//! Verdict counters for the council gate.
//!
//! Keeps track of how many responses were accepted or rejected and
//! why. The validator itself stays stateless; the gate owns one
//! of these and records every verdict it obtains.

use std::collections::BTreeMap;

use crate::policy_core::{ReasonCode, Verdict};

/// Immutable view of the counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerdictSnapshot {
    /// Verdicts recorded.
    pub total: u64,
    /// Valid verdicts.
    pub accepted: u64,
    /// Invalid verdicts.
    pub rejected: u64,
    /// Verdicts produced while the user was in low state.
    pub low_state_evaluations: u64,
    /// Rejections by reason; codes never seen are absent.
    pub by_reason: BTreeMap<ReasonCode, u64>,
}

impl VerdictSnapshot {
    /// Rejections for one reason.
    #[must_use]
    pub fn rejections(&self, code: ReasonCode) -> u64 {
        self.by_reason.get(&code).copied().unwrap_or(0)
    }
}

/// Counts verdicts. Never panics, all counters saturate.
#[derive(Debug, Default)]
pub struct VerdictObserver {
    total: u64,
    accepted: u64,
    rejected: u64,
    low_state_evaluations: u64,
    by_reason: BTreeMap<ReasonCode, u64>,
}

impl VerdictObserver {
    /// Creates an observer with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one verdict.
    pub fn record(&mut self, verdict: &Verdict, low_state: bool) {
        self.total = self.total.saturating_add(1);
        if low_state {
            self.low_state_evaluations = self.low_state_evaluations.saturating_add(1);
        }

        match verdict.code() {
            None => self.accepted = self.accepted.saturating_add(1),
            Some(code) => {
                self.rejected = self.rejected.saturating_add(1);
                let slot = self.by_reason.entry(code).or_insert(0);
                *slot = slot.saturating_add(1);
            }
        }
    }

    /// Current counters.
    #[must_use]
    pub fn snapshot(&self) -> VerdictSnapshot {
        VerdictSnapshot {
            total: self.total,
            accepted: self.accepted,
            rejected: self.rejected,
            low_state_evaluations: self.low_state_evaluations,
            by_reason: self.by_reason.clone(),
        }
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
