//! State classification for Council Guard.
//!
//! Turns the user's energy/mood readings into the single "low state" flag
//! that the policy validator uses to restrict recommendations.

use serde::{Deserialize, Serialize};

/// Reference cutoff: a reading at or below this value is "low".
pub const DEFAULT_LOW_STATE_THRESHOLD: i32 = 1;

/// Energy and mood readings for one user at one point in time.
///
/// Bounds are not enforced here: out-of-range readings are the
/// recommender's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    /// Energy reading.
    pub energy: i32,
    /// Mood reading.
    pub mood: i32,
}

impl UserState {
    /// Creates a new state from raw readings.
    #[must_use]
    pub const fn new(energy: i32, mood: i32) -> Self {
        Self { energy, mood }
    }
}

/// Returns `true` iff `energy <= 1` or `mood <= 1`.
#[must_use]
pub const fn is_low_state(energy: i32, mood: i32) -> bool {
    energy <= DEFAULT_LOW_STATE_THRESHOLD || mood <= DEFAULT_LOW_STATE_THRESHOLD
}

/// Low-state classifier with a tunable cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateClassifier {
    threshold: i32,
}

impl Default for StateClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_LOW_STATE_THRESHOLD)
    }
}

impl StateClassifier {
    /// Creates a classifier; readings `<= threshold` count as low.
    #[must_use]
    pub const fn new(threshold: i32) -> Self {
        Self { threshold }
    }

    /// Configured cutoff.
    #[must_use]
    pub const fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Inclusive OR: either depressed reading alone is enough.
    #[must_use]
    pub const fn is_low(&self, state: &UserState) -> bool {
        state.energy <= self.threshold || state.mood <= self.threshold
    }
}
