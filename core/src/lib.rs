//! Council Guard core.
//!
//! Validates the ranked card recommendations produced by the upstream
//! recommender (the *council*) before anything reaches the user:
//!
//! - `StateClassifier` derives the "low state" flag from energy/mood,
//! - `PolicyValidator` turns (response, catalog, state) into a `Verdict`,
//! - `CouncilGate` is the caller-side loop that regenerates rejected
//!   responses and keeps verdict counters.
//!
//! ```text
//! council ──► CouncilResponse ──► PolicyValidator ──► Verdict
//!                                   ▲        ▲
//!                        CardCatalog┘        └StateClassifier(energy, mood)
//! ```

#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

/// Card metadata and the read-only lookup seam.
pub mod catalog;
/// Policy constants and gate settings (env / YAML).
pub mod config;
/// Regenerate-until-valid loop around the council.
pub mod gate;
/// Verdict counters.
pub mod meta_observer;
/// The validation rule engine.
pub mod policy_core;
/// Council wire types.
pub mod response;
/// Low-state classification.
pub mod state;

pub use crate::catalog::{Card, CardCatalog, CardLookup, CatalogError};
pub use crate::config::{ConfigError, GateConfig, GuardConfig, PolicyConfig};
pub use crate::gate::{Council, CouncilGate, GateOutcome};
pub use crate::meta_observer::{VerdictObserver, VerdictSnapshot};
pub use crate::policy_core::{PolicyValidator, PolicyViolation, ReasonCode, Verdict};
pub use crate::response::{CouncilResponse, Recommendation};
pub use crate::state::{is_low_state, StateClassifier, UserState};
