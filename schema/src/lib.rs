// Skirmish Schema - Shared type definitions
// The closed enums that describe a roster and the actions a combatant can take.
// Kept in their own crate so drivers and the engine agree on names without
// pulling in the battle logic.

pub use action_types::*;
pub use character_types::*;

pub mod action_types;
pub mod character_types;
