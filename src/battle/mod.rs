pub mod actions;
pub mod ai;
pub mod rng;
pub mod runner;
pub mod state;
pub mod turn_orchestrator;

#[cfg(test)]
mod tests;
