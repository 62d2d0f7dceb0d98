//! Decision making for bot-controlled combatants.

use crate::battle::rng::TurnRng;
use crate::battle::state::{BattleSnapshot, CombatantView, PlannedAction};
use schema::ActionKind;

/// Candidate order bots consider. Kept fixed so seeded battles replay.
const CANDIDATES: [ActionKind; 6] = [
    ActionKind::Light,
    ActionKind::Heavy,
    ActionKind::Defend,
    ActionKind::Dodge,
    ActionKind::Heal,
    ActionKind::Ultimate,
];

/// A trait for any system that can decide on a battle action.
/// Deciders only ever see the read-only snapshot, never the roster itself.
pub trait Behavior {
    /// Inspects the snapshot and decides on the next action for the given combatant.
    fn decide_action(
        &self,
        combatant_index: usize,
        snapshot: &BattleSnapshot,
        rng: &mut TurnRng,
    ) -> PlannedAction;
}

/// Picks uniformly among the actions the bot can currently afford.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomBot;

impl RandomBot {
    pub fn new() -> Self {
        Self
    }
}

/// The actions `view` can pay for right now; the ultimate also needs its
/// cooldown to be clear.
pub fn affordable_actions(view: &CombatantView) -> Vec<ActionKind> {
    CANDIDATES
        .into_iter()
        .filter(|kind| match kind {
            ActionKind::Ultimate => view.ultimate_cooldown == 0 && view.stamina >= kind.stamina_cost(),
            _ => view.stamina >= kind.stamina_cost(),
        })
        .collect()
}

/// Choose an action kind. With nothing affordable (or an unknown bot) the
/// choice falls back to a light attack without re-checking its cost.
pub fn choose_action(combatant_index: usize, snapshot: &BattleSnapshot, rng: &mut TurnRng) -> ActionKind {
    let Some(view) = snapshot.combatant(combatant_index) else {
        return ActionKind::Light;
    };
    let affordable = affordable_actions(view);
    if affordable.is_empty() {
        return ActionKind::Light;
    }
    affordable[rng.pick_index(affordable.len(), &format!("{} action choice", view.name))]
}

/// Target for a chosen action: a random living enemy for attacks, self for
/// heal, nothing otherwise.
pub fn choose_target(
    combatant_index: usize,
    kind: ActionKind,
    snapshot: &BattleSnapshot,
    rng: &mut TurnRng,
) -> Option<usize> {
    match kind {
        ActionKind::Light | ActionKind::Heavy => {
            let enemies = snapshot.living_enemies_of(combatant_index);
            if enemies.is_empty() {
                return None;
            }
            Some(enemies[rng.pick_index(enemies.len(), "bot target choice")])
        }
        ActionKind::Heal => Some(combatant_index),
        _ => None,
    }
}

impl Behavior for RandomBot {
    fn decide_action(
        &self,
        combatant_index: usize,
        snapshot: &BattleSnapshot,
        rng: &mut TurnRng,
    ) -> PlannedAction {
        let kind = choose_action(combatant_index, snapshot, rng);
        let target = choose_target(combatant_index, kind, snapshot, rng);
        tracing::debug!(combatant_index, action = %kind, ?target, "bot decided");
        PlannedAction::new(kind, target)
    }
}
