use crate::battle::ai::{Behavior, RandomBot};
use crate::battle::rng::TurnRng;
use crate::battle::state::{BattleEvent, BattleSnapshot, BattleState, GameState, PlannedAction};
use crate::battle::turn_orchestrator::{ready_for_turn_resolution, resolve_turn, set_combatant_action};
use crate::config::BattleConfig;
use crate::errors::{RunnerError, RunnerResult, SetupResult};
use schema::Controller;

/// High-level battle management interface that hides the turn orchestrator.
/// Human actions are submitted one by one; the turn resolves by itself once
/// every living human has chosen, with bots deciding as their turn comes up.
pub struct BattleRunner {
    battle_state: BattleState,
    rng: TurnRng,
    behavior: Box<dyn Behavior>,
    accumulated_events: Vec<BattleEvent>,
    turn_limit: Option<u32>,
}

/// Result of executing a battle turn
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub events: Vec<BattleEvent>,
    pub new_game_state: GameState,
    pub battle_ended: bool,
    pub winner: Option<u8>,
}

impl BattleRunner {
    /// Create a runner over a validated battle state, with random bots.
    pub fn new(battle_state: BattleState, rng: TurnRng) -> Self {
        Self {
            battle_state,
            rng,
            behavior: Box::new(RandomBot::new()),
            accumulated_events: Vec::new(),
            turn_limit: None,
        }
    }

    /// Build the roster described by `config` and seed the RNG from it.
    pub fn from_config(config: &BattleConfig) -> SetupResult<Self> {
        let battle_state = BattleState::new(config.build_roster()?)?;
        let rng = match config.seed {
            Some(seed) => TurnRng::from_seed(seed),
            None => TurnRng::new_random(),
        };
        Ok(Self::new(battle_state, rng).with_turn_limit(config.max_turns))
    }

    /// Swap in a different decision maker for bot-controlled combatants.
    pub fn with_behavior(mut self, behavior: Box<dyn Behavior>) -> Self {
        self.behavior = behavior;
        self
    }

    /// Stop resolving turns once `turn_limit` have been played.
    pub fn with_turn_limit(mut self, turn_limit: u32) -> Self {
        self.turn_limit = Some(turn_limit);
        self
    }

    /// True once the turn limit is used up with nobody having won.
    pub fn turn_limit_reached(&self) -> bool {
        !self.is_battle_ended()
            && self
                .turn_limit
                .is_some_and(|limit| self.battle_state.turn_number >= limit)
    }

    pub fn state(&self) -> &BattleState {
        &self.battle_state
    }

    /// Read-only projection for renderers.
    pub fn snapshot(&self) -> BattleSnapshot {
        self.battle_state.snapshot()
    }

    pub fn is_battle_ended(&self) -> bool {
        self.battle_state.is_game_over()
    }

    pub fn winner(&self) -> Option<u8> {
        self.battle_state.winner()
    }

    pub fn turn_number(&self) -> u32 {
        self.battle_state.turn_number
    }

    /// Living enemies of `index`, the valid targets for an attack.
    pub fn living_enemies_of(&self, index: usize) -> Vec<usize> {
        self.battle_state.living_enemies_of(index)
    }

    /// Living human-controlled combatants that have not chosen yet this turn.
    pub fn humans_needing_actions(&self) -> Vec<usize> {
        if self.is_battle_ended() || self.turn_limit_reached() {
            return Vec::new();
        }
        (0..self.battle_state.combatants.len())
            .filter(|&i| {
                self.battle_state.controllers[i] == Controller::Human
                    && self.battle_state.combatants[i].is_alive()
                    && self.battle_state.action_queue[i].is_none()
            })
            .collect()
    }

    /// Submit an action for a human-controlled combatant.
    /// Runs the turn and returns its result once every living human has chosen.
    pub fn submit_action(
        &mut self,
        combatant_index: usize,
        action: PlannedAction,
    ) -> RunnerResult<Option<ExecutionResult>> {
        if self.is_battle_ended() {
            return Err(RunnerError::BattleOver);
        }
        if self.turn_limit_reached() {
            return Err(RunnerError::TurnLimitReached(self.battle_state.turn_number));
        }
        let combatant = self
            .battle_state
            .combatants
            .get(combatant_index)
            .ok_or(RunnerError::InvalidCombatantIndex(combatant_index))?;
        if self.battle_state.controllers[combatant_index] != Controller::Human {
            return Err(RunnerError::NotHumanControlled(combatant.name.clone()));
        }
        if combatant.is_defeated() {
            return Err(RunnerError::CombatantDefeated(combatant.name.clone()));
        }
        if self.battle_state.action_queue[combatant_index].is_some() {
            return Err(RunnerError::AlreadySubmitted(combatant.name.clone()));
        }

        set_combatant_action(&mut self.battle_state, combatant_index, action)
            .map_err(|_| RunnerError::InvalidCombatantIndex(combatant_index))?;

        Ok(self.execute_if_ready())
    }

    /// Run the turn if nothing is waiting on a human. Needed when no human
    /// is left standing, or when every combatant is a bot.
    pub fn execute_if_ready(&mut self) -> Option<ExecutionResult> {
        if self.is_battle_ended()
            || self.turn_limit_reached()
            || !ready_for_turn_resolution(&self.battle_state)
        {
            return None;
        }

        let bus = resolve_turn(&mut self.battle_state, self.behavior.as_ref(), &mut self.rng);
        let events = bus.into_events();
        self.accumulated_events.extend(events.iter().cloned());

        Some(ExecutionResult {
            events,
            new_game_state: self.battle_state.game_state,
            battle_ended: self.is_battle_ended(),
            winner: self.winner(),
        })
    }

    /// Play turns until the battle ends, `max_turns` have run here, or the
    /// turn limit is hit. Only makes progress when no living human needs to
    /// choose. Returns the winner, if any.
    pub fn run_until_finished(&mut self, max_turns: u32) -> Option<u8> {
        for _ in 0..max_turns {
            if self.execute_if_ready().is_none() {
                break;
            }
        }
        self.winner()
    }

    /// Get all events that have occurred in the battle so far
    pub fn get_all_events(&self) -> &[BattleEvent] {
        &self.accumulated_events
    }

    /// Get events since a certain index (for incremental updates)
    pub fn get_events_since(&self, index: usize) -> &[BattleEvent] {
        self.accumulated_events.get(index..).unwrap_or(&[])
    }
}
