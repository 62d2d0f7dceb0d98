// In: src/lib.rs

//! Skirmish 2v2 Combat Engine
//!
//! A turn-based combat simulator for two teams of two. Each combatant is one
//! of four classes with fixed stats and a unique ultimate; combatants act in
//! speed order until one team has nobody left standing.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod classes;
pub mod combatant;
pub mod config;
pub mod errors;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{ActionKind, CharacterClass, Controller};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::actions::resolve_action;
pub use battle::ai::{Behavior, RandomBot};
pub use battle::rng::TurnRng;
pub use battle::runner::{BattleRunner, ExecutionResult};
pub use battle::state::{
    ActionFailureReason, ActionOutcome, BattleEvent, BattleSnapshot, BattleState, CombatantView,
    GameState, PlannedAction,
};
pub use battle::turn_orchestrator::{determine_turn_order, resolve_turn};

// Roster construction.
pub use classes::{base_stats, create_combatant, ClassStats};
pub use combatant::Combatant;
pub use config::{BattleConfig, RosterEntry};

// Crate-specific error and result types.
pub use errors::{RunnerError, RunnerResult, SetupError, SetupResult};
