// core/src/gate.rs
//
// Caller-side loop around the validator: ask the council, validate,
// regenerate on rejection up to a fixed number of attempts.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::catalog::CardCatalog;
use crate::config::GateConfig;
use crate::meta_observer::VerdictObserver;
use crate::policy_core::{PolicyValidator, Verdict};
use crate::response::CouncilResponse;
use crate::state::UserState;

/// Upstream recommender.
pub trait Council: Send + Sync {
    /// Produces a candidate response for the given user state.
    fn recommend(&self, state: &UserState) -> Result<CouncilResponse>;
}

/// Result of one gated turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// A response passed validation and may be shown.
    Accepted {
        /// Correlation id for this turn.
        turn_id: Uuid,
        /// The accepted response.
        response: CouncilResponse,
        /// Council calls made, this one included.
        attempts: u32,
    },
    /// Every attempt was rejected; nothing may be shown.
    Rejected {
        /// Correlation id for this turn.
        turn_id: Uuid,
        /// Verdict for the last attempt.
        verdict: Verdict,
        /// Council calls made.
        attempts: u32,
    },
}

impl GateOutcome {
    /// `true` for [`GateOutcome::Accepted`].
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Council calls made during the turn.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Accepted { attempts, .. } | Self::Rejected { attempts, .. } => *attempts,
        }
    }
}

/// Glues a council, the validator, a catalog and verdict counters.
///
/// For every turn:
/// 1. classifies the user state,
/// 2. asks the council for a response,
/// 3. validates it and records the verdict,
/// 4. on rejection asks again, at most `max_attempts` calls in total.
pub struct CouncilGate {
    validator: PolicyValidator,
    catalog: CardCatalog,
    council: Arc<dyn Council>,
    config: GateConfig,
    observer: VerdictObserver,
}

impl CouncilGate {
    /// Creates a gate.
    pub fn new(
        validator: PolicyValidator,
        catalog: CardCatalog,
        council: Arc<dyn Council>,
        config: GateConfig,
    ) -> Self {
        Self {
            validator,
            catalog,
            council,
            config,
            observer: VerdictObserver::new(),
        }
    }

    /// Runs one turn. Council errors propagate unchanged.
    pub fn handle_turn(&mut self, state: &UserState) -> Result<GateOutcome> {
        let turn_id = Uuid::new_v4();
        let span = info_span!("council_turn", %turn_id, energy = state.energy, mood = state.mood);
        let _entered = span.enter();

        let low_state = self.validator.classifier().is_low(state);
        debug!(low_state, "classified user state");

        let max_attempts = self.config.max_attempts.max(1);
        let mut attempts = 0;
        loop {
            attempts += 1;
            let response = self.council.recommend(state)?;
            let verdict = self.validator.validate_state(&response, &self.catalog, state);
            self.observer.record(&verdict, low_state);

            if verdict.valid {
                info!(attempts, "council response accepted");
                return Ok(GateOutcome::Accepted {
                    turn_id,
                    response,
                    attempts,
                });
            }

            warn!(
                attempts,
                code = %verdict.code().map_or("none", |c| c.as_str()),
                reason = %verdict.reason(),
                "council response rejected"
            );

            if attempts >= max_attempts {
                return Ok(GateOutcome::Rejected {
                    turn_id,
                    verdict,
                    attempts,
                });
            }
        }
    }

    /// Verdict counters.
    pub fn observer(&self) -> &VerdictObserver {
        &self.observer
    }

    /// Zeroes the verdict counters.
    pub fn reset_stats(&mut self) {
        self.observer.reset();
    }
}
