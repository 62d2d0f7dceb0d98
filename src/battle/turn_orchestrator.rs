use crate::battle::actions::resolve_action;
use crate::battle::ai::Behavior;
use crate::battle::rng::TurnRng;
use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState, PlannedAction};
use schema::Controller;
use std::cmp::Reverse;

/// Queue an action for a combatant. Bots are asked at their turn instead,
/// so only queued human actions are ever read.
pub fn set_combatant_action(
    battle_state: &mut BattleState,
    combatant_index: usize,
    action: PlannedAction,
) -> Result<(), String> {
    if combatant_index >= battle_state.combatants.len() {
        return Err("Invalid combatant index".to_string());
    }
    if battle_state.game_state != GameState::AwaitingActions {
        return Err("Cannot set action: battle is not awaiting actions".to_string());
    }
    battle_state.action_queue[combatant_index] = Some(action);
    Ok(())
}

/// Check if every living human-controlled combatant has a queued action.
pub fn ready_for_turn_resolution(battle_state: &BattleState) -> bool {
    battle_state.game_state == GameState::AwaitingActions
        && battle_state
            .combatants
            .iter()
            .zip(&battle_state.controllers)
            .zip(&battle_state.action_queue)
            .all(|((c, controller), queued)| {
                c.is_defeated() || *controller == Controller::Bot || queued.is_some()
            })
}

/// Living combatants by descending speed. Combatants sharing a speed are
/// ordered by a random draw, not by roster position.
pub fn determine_turn_order(battle_state: &BattleState, rng: &mut TurnRng) -> Vec<usize> {
    let living: Vec<usize> = battle_state
        .combatants
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_alive())
        .map(|(i, _)| i)
        .collect();

    let mut keyed: Vec<(usize, u8, u32)> = living
        .iter()
        .map(|&i| {
            let speed = battle_state.combatants[i].speed;
            let tied = living
                .iter()
                .any(|&j| j != i && battle_state.combatants[j].speed == speed);
            let key = if tied {
                rng.tiebreak(&format!("{} speed tie", battle_state.combatants[i].name))
            } else {
                0
            };
            (i, speed, key)
        })
        .collect();

    keyed.sort_by_key(|&(_, speed, key)| (Reverse(speed), key));
    keyed.into_iter().map(|(i, _, _)| i).collect()
}

/// Main entry point for turn resolution.
/// Every living combatant acts once in speed order; the turn stops early as
/// soon as one team has nobody left standing. Returns the turn's events.
pub fn resolve_turn(
    battle_state: &mut BattleState,
    behavior: &dyn Behavior,
    rng: &mut TurnRng,
) -> EventBus {
    let mut bus = EventBus::new();
    if battle_state.is_game_over() {
        return bus;
    }

    // 1. Initialization
    battle_state.turn_number += 1;
    bus.push(BattleEvent::TurnStarted {
        turn_number: battle_state.turn_number,
    });
    tracing::info!(turn = battle_state.turn_number, "turn started");

    // 2. Action order
    let order = determine_turn_order(battle_state, rng);

    // 3. Actions, each followed by its cooldown tick and a termination check
    let mut winner = None;
    for actor in order {
        if battle_state.combatants[actor].is_defeated() {
            continue;
        }
        winner = execute_action_phase(battle_state, actor, behavior, rng, &mut bus);
        if winner.is_some() {
            break;
        }
    }

    // 4. End-of-turn stamina
    execute_stamina_phase(battle_state, &mut bus);

    // 5. Cleanup
    finalize_turn(battle_state, winner, &mut bus);
    bus
}

fn execute_action_phase(
    battle_state: &mut BattleState,
    actor: usize,
    behavior: &dyn Behavior,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> Option<u8> {
    battle_state.game_state = GameState::Resolving;

    let action = match battle_state.controllers[actor] {
        Controller::Human => battle_state.action_queue[actor].take(),
        Controller::Bot => Some(behavior.decide_action(actor, &battle_state.snapshot(), rng)),
    };
    let Some(action) = action else {
        tracing::warn!(
            combatant = %battle_state.combatants[actor].name,
            "no action submitted, skipping"
        );
        // The slot still passes.
        battle_state.game_state = GameState::CooldownPhase;
        battle_state.combatants[actor].update_cooldowns();
        return None;
    };

    let alive_before: Vec<bool> = battle_state.combatants.iter().map(|c| c.is_alive()).collect();
    let outcome = resolve_action(&mut battle_state.combatants, actor, action, rng);
    bus.push(BattleEvent::ActionResolved {
        actor,
        kind: action.kind,
        outcome,
    });
    for (i, was_alive) in alive_before.into_iter().enumerate() {
        if was_alive && battle_state.combatants[i].is_defeated() {
            bus.push(BattleEvent::CombatantDefeated { combatant: i });
        }
    }

    battle_state.game_state = GameState::CooldownPhase;
    battle_state.combatants[actor].update_cooldowns();

    battle_state.game_state = GameState::CheckTermination;
    battle_state.surviving_team()
}

fn execute_stamina_phase(battle_state: &mut BattleState, bus: &mut EventBus) {
    battle_state.game_state = GameState::StaminaPhase;
    for (i, combatant) in battle_state.combatants.iter_mut().enumerate() {
        if combatant.is_defeated() {
            continue;
        }
        let old_stamina = combatant.stamina();
        combatant.restore_stamina_per_turn();
        bus.push(BattleEvent::StaminaRestored {
            combatant: i,
            old_stamina,
            new_stamina: combatant.stamina(),
        });
    }
}

fn finalize_turn(battle_state: &mut BattleState, winner: Option<u8>, bus: &mut EventBus) {
    battle_state.action_queue.iter_mut().for_each(|slot| *slot = None);

    match winner {
        Some(winner) => {
            battle_state.game_state = GameState::GameOver { winner };
            bus.push(BattleEvent::BattleEnded { winner });
            tracing::info!(winner, turns = battle_state.turn_number, "battle ended");
        }
        None => battle_state.game_state = GameState::AwaitingActions,
    }
}
