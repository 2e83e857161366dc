//! Policy validator for council responses.
//!
//! Decides whether a finished council response may be shown to the user.
//! Checks run in a fixed order and stop at the first failure, so the same
//! bad response always reports the same reason:
//!
//! 1. recommendation count within bounds,
//! 2. `autopick` equal to the agreed sentinel,
//! 3. per recommendation: unique rank, known card, recovery-only under
//!    low state,
//! 4. `autopick` carried by some recommendation.
//!
//! The validator is pure: it never mutates its inputs, keeps no state
//! between calls and never fails with an `Err`.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::catalog::CardLookup;
use crate::config::{ConfigError, PolicyConfig};
use crate::response::CouncilResponse;
use crate::state::{StateClassifier, UserState};

/// Stable category of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ReasonCode {
    /// Recommendation count outside the configured bounds.
    CountOutOfRange,
    /// `autopick` missing or not equal to the sentinel.
    AutopickMismatch,
    /// The same rank appears twice.
    DuplicateRank,
    /// A card id is not in the catalog.
    UnknownCard,
    /// Low state and a non-recovery card.
    LowStateViolation,
    /// No recommendation carries the autopick rank.
    AutopickRankNotFound,
}

impl ReasonCode {
    /// Every code, in check order.
    pub const ALL: [Self; 6] = [
        Self::CountOutOfRange,
        Self::AutopickMismatch,
        Self::DuplicateRank,
        Self::UnknownCard,
        Self::LowStateViolation,
        Self::AutopickRankNotFound,
    ];

    /// Code as a static string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CountOutOfRange => "CountOutOfRange",
            Self::AutopickMismatch => "AutopickMismatch",
            Self::DuplicateRank => "DuplicateRank",
            Self::UnknownCard => "UnknownCard",
            Self::LowStateViolation => "LowStateViolation",
            Self::AutopickRankNotFound => "AutopickRankNotFound",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule violation, carrying the offending value where there is one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    /// See [`ReasonCode::CountOutOfRange`].
    #[error("recommendations must be {min}..{max}, got {count}")]
    CountOutOfRange {
        /// Actual count.
        count: usize,
        /// Inclusive lower bound.
        min: usize,
        /// Inclusive upper bound.
        max: usize,
    },

    /// See [`ReasonCode::AutopickMismatch`].
    #[error("autopick must be {expected}, got {}", display_opt(.found))]
    AutopickMismatch {
        /// Configured sentinel.
        expected: String,
        /// Value in the response.
        found: Option<String>,
    },

    /// See [`ReasonCode::DuplicateRank`].
    #[error("duplicate rank: {}", display_opt(.rank))]
    DuplicateRank {
        /// Repeated rank (`None` if the rank field was missing).
        rank: Option<String>,
    },

    /// See [`ReasonCode::UnknownCard`].
    #[error("unknown card_id: {}", display_opt(.card_id))]
    UnknownCard {
        /// Unresolved id (`None` if the card_id field was missing).
        card_id: Option<String>,
    },

    /// See [`ReasonCode::LowStateViolation`].
    #[error("low state must be recovery only: {card_id} (label {label})")]
    LowStateViolation {
        /// First offending card.
        card_id: String,
        /// Its label.
        label: String,
    },

    /// See [`ReasonCode::AutopickRankNotFound`].
    #[error("autopick rank not found: {autopick}")]
    AutopickRankNotFound {
        /// Autopick value no recommendation carries.
        autopick: String,
    },
}

impl PolicyViolation {
    /// Category of this violation.
    #[must_use]
    pub const fn code(&self) -> ReasonCode {
        match self {
            Self::CountOutOfRange { .. } => ReasonCode::CountOutOfRange,
            Self::AutopickMismatch { .. } => ReasonCode::AutopickMismatch,
            Self::DuplicateRank { .. } => ReasonCode::DuplicateRank,
            Self::UnknownCard { .. } => ReasonCode::UnknownCard,
            Self::LowStateViolation { .. } => ReasonCode::LowStateViolation,
            Self::AutopickRankNotFound { .. } => ReasonCode::AutopickRankNotFound,
        }
    }
}

fn display_opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<missing>")
}

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// `true` when every rule passed.
    pub valid: bool,
    /// The first violation found, if any.
    pub violation: Option<PolicyViolation>,
}

impl Verdict {
    /// A passing verdict.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            valid: true,
            violation: None,
        }
    }

    /// A failing verdict.
    #[must_use]
    pub const fn reject(violation: PolicyViolation) -> Self {
        Self {
            valid: false,
            violation: Some(violation),
        }
    }

    /// Reason category, `None` when valid.
    #[must_use]
    pub fn code(&self) -> Option<ReasonCode> {
        self.violation.as_ref().map(PolicyViolation::code)
    }

    /// Human-readable reason; `"ok"` when valid.
    #[must_use]
    pub fn reason(&self) -> String {
        self.violation
            .as_ref()
            .map_or_else(|| "ok".to_string(), ToString::to_string)
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire {
            valid: bool,
            code: Option<ReasonCode>,
            reason: String,
        }

        Wire {
            valid: self.valid,
            code: self.code(),
            reason: self.reason(),
        }
        .serialize(serializer)
    }
}

/// Rule engine for council responses.
///
/// Holds only immutable configuration, so one instance can be shared
/// across threads and called concurrently.
#[derive(Debug, Clone, Default)]
pub struct PolicyValidator {
    config: PolicyConfig,
    classifier: StateClassifier,
}

impl PolicyValidator {
    /// Creates a validator bound to the given rule constants.
    ///
    /// `config` is taken as already checked (see [`PolicyConfig::validate`];
    /// [`crate::GuardConfig`] loaders do this). With inverted bounds every
    /// response fails the count check. Use [`Self::try_new`] for configs
    /// built by hand.
    #[must_use]
    pub fn new(config: PolicyConfig) -> Self {
        let classifier = StateClassifier::new(config.low_state_threshold);
        Self { config, classifier }
    }

    /// Checks `config` and creates a validator from it.
    pub fn try_new(config: PolicyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Rule constants in use.
    #[must_use]
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Classifier built from the configured threshold.
    #[must_use]
    pub fn classifier(&self) -> &StateClassifier {
        &self.classifier
    }

    /// Validates `response` for a user with the given readings.
    pub fn validate<L>(
        &self,
        response: &CouncilResponse,
        catalog: &L,
        energy: i32,
        mood: i32,
    ) -> Verdict
    where
        L: CardLookup + ?Sized,
    {
        self.validate_state(response, catalog, &UserState::new(energy, mood))
    }

    /// Same as [`Self::validate`], taking a prebuilt [`UserState`].
    pub fn validate_state<L>(
        &self,
        response: &CouncilResponse,
        catalog: &L,
        state: &UserState,
    ) -> Verdict
    where
        L: CardLookup + ?Sized,
    {
        match self.check(response, catalog, self.classifier.is_low(state)) {
            Ok(()) => Verdict::ok(),
            Err(violation) => Verdict::reject(violation),
        }
    }

    fn check<L>(
        &self,
        response: &CouncilResponse,
        catalog: &L,
        low_state: bool,
    ) -> Result<(), PolicyViolation>
    where
        L: CardLookup + ?Sized,
    {
        let cfg = &self.config;

        // 1) Cardinality; an empty list never reaches the scan.
        let count = response.recommendations.len();
        if count < cfg.min_recommendations || count > cfg.max_recommendations {
            return Err(PolicyViolation::CountOutOfRange {
                count,
                min: cfg.min_recommendations,
                max: cfg.max_recommendations,
            });
        }

        // 2) Autopick must literally equal the sentinel.
        let autopick = cfg.autopick_sentinel.as_str();
        if response.autopick.as_deref() != Some(autopick) {
            return Err(PolicyViolation::AutopickMismatch {
                expected: cfg.autopick_sentinel.clone(),
                found: response.autopick.clone(),
            });
        }

        // 3) Scan: duplicate rank before catalog lookup before safety.
        let mut seen: HashSet<Option<&str>> = HashSet::with_capacity(count);
        for rec in &response.recommendations {
            let rank = rec.rank.as_deref();
            if !seen.insert(rank) {
                return Err(PolicyViolation::DuplicateRank {
                    rank: rec.rank.clone(),
                });
            }

            let Some((card_id, card)) = rec
                .card_id
                .as_deref()
                .and_then(|id| catalog.card(id).map(|card| (id, card)))
            else {
                return Err(PolicyViolation::UnknownCard {
                    card_id: rec.card_id.clone(),
                });
            };

            // The id as the response spelled it.
            if low_state && card.label != cfg.recovery_label {
                return Err(PolicyViolation::LowStateViolation {
                    card_id: card_id.to_string(),
                    label: card.label.clone(),
                });
            }
        }

        // 4) Some recommendation must actually carry the autopick rank.
        if !seen.contains(&Some(autopick)) {
            return Err(PolicyViolation::AutopickRankNotFound {
                autopick: cfg.autopick_sentinel.clone(),
            });
        }

        Ok(())
    }
}
