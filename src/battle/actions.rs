use crate::battle::rng::TurnRng;
use crate::battle::state::{ActionFailureReason, ActionOutcome, PlannedAction};
use crate::classes::use_ultimate;
use crate::combatant::Combatant;
use schema::ActionKind;

pub const DEFEND_BONUS: u16 = 10;
pub const DODGE_BONUS: u8 = 30;
pub const HEAL_AMOUNT: u16 = 25;
pub const HEAL_STAMINA_RESTORE: u16 = 15;

/// Resolve one action for the combatant at `actor`.
///
/// Refusals (defeated actor, missing or invalid target, not enough stamina,
/// ultimate on cooldown) come back as a failed outcome and leave the roster
/// untouched, apart from the actor's transient bonuses which are cleared at
/// the start of every action it takes.
pub fn resolve_action(
    roster: &mut [Combatant],
    actor: usize,
    action: PlannedAction,
    rng: &mut TurnRng,
) -> ActionOutcome {
    let Some(acting) = roster.get_mut(actor) else {
        return ActionOutcome::failure(
            ActionFailureReason::InvalidTarget,
            format!("No combatant at position {}!", actor),
        );
    };

    if acting.is_defeated() {
        return ActionOutcome::failure(
            ActionFailureReason::ActorDefeated,
            format!("{} is defeated and cannot act!", acting.name),
        );
    }

    acting.reset_bonuses();

    let outcome = match action.kind {
        ActionKind::Light | ActionKind::Heavy => {
            attack(roster, actor, action.kind, action.target, rng)
        }
        ActionKind::Ultimate => ultimate(roster, actor, rng),
        ActionKind::Defend => defend(&mut roster[actor]),
        ActionKind::Dodge => dodge(&mut roster[actor]),
        // Self-target only; any supplied target is ignored.
        ActionKind::Heal => heal(&mut roster[actor]),
    };

    tracing::debug!(
        actor = %roster[actor].name,
        action = %action.kind,
        succeeded = outcome.succeeded,
        amount = outcome.amount,
        "action resolved"
    );
    outcome
}

fn not_enough_stamina(acting: &Combatant, kind: ActionKind) -> ActionOutcome {
    ActionOutcome::failure(
        ActionFailureReason::InsufficientStamina,
        format!(
            "{} doesn't have enough stamina for {}!",
            acting.name,
            kind.display_name()
        ),
    )
}

fn defend(acting: &mut Combatant) -> ActionOutcome {
    if !acting.use_stamina(ActionKind::Defend.stamina_cost()) {
        return not_enough_stamina(acting, ActionKind::Defend);
    }
    acting.defend_bonus = DEFEND_BONUS;
    ActionOutcome::success(
        format!("{} uses Defend! +{} defense for 1 turn", acting.name, DEFEND_BONUS),
        0,
    )
}

fn dodge(acting: &mut Combatant) -> ActionOutcome {
    if !acting.use_stamina(ActionKind::Dodge.stamina_cost()) {
        return not_enough_stamina(acting, ActionKind::Dodge);
    }
    acting.dodge_bonus = DODGE_BONUS;
    ActionOutcome::success(
        format!("{} uses Dodge! +{} dodge chance for 1 turn", acting.name, DODGE_BONUS),
        0,
    )
}

fn heal(acting: &mut Combatant) -> ActionOutcome {
    if !acting.use_stamina(ActionKind::Heal.stamina_cost()) {
        return not_enough_stamina(acting, ActionKind::Heal);
    }
    let healed = acting.heal(HEAL_AMOUNT);
    acting.restore_stamina(HEAL_STAMINA_RESTORE);
    ActionOutcome::success(
        format!(
            "{} uses Heal! +{} HP, +{} Stamina",
            acting.name, HEAL_AMOUNT, HEAL_STAMINA_RESTORE
        ),
        healed,
    )
}

/// Base damage before the crit multiplier.
pub fn base_damage(attack: u16, kind: ActionKind) -> u16 {
    match kind {
        ActionKind::Heavy => attack * 3 / 2,
        _ => attack,
    }
}

fn attack(
    roster: &mut [Combatant],
    actor: usize,
    kind: ActionKind,
    target: Option<usize>,
    rng: &mut TurnRng,
) -> ActionOutcome {
    let actor_team = roster[actor].team();
    let valid_target = target.filter(|&t| {
        roster
            .get(t)
            .is_some_and(|c| c.is_alive() && c.team() != actor_team)
    });
    let Some(target) = valid_target else {
        return ActionOutcome::failure(
            ActionFailureReason::InvalidTarget,
            format!(
                "{} has no valid target for {}!",
                roster[actor].name,
                kind.display_name()
            ),
        );
    };

    let acting = &mut roster[actor];
    if !acting.use_stamina(kind.stamina_cost()) {
        return not_enough_stamina(acting, kind);
    }

    let crit_chance = acting.critical_hit_chance;
    let crit_roll = rng.roll_percent(&format!("{} crit ({}%)", acting.name, crit_chance));
    let is_critical = crit_roll <= crit_chance;
    let mut damage = base_damage(acting.attack, kind);
    if is_critical {
        damage *= 2;
    }
    let attacker_name = acting.name.clone();

    let defender = &mut roster[target];
    let applied = defender.take_damage(damage, rng);
    let crit_text = if is_critical { " (CRITICAL!)" } else { "" };

    ActionOutcome::success(
        format!(
            "{} uses {} on {} - {} damage{}",
            attacker_name,
            kind.display_name(),
            defender.name,
            applied,
            crit_text
        ),
        applied,
    )
}

fn ultimate(roster: &mut [Combatant], actor: usize, rng: &mut TurnRng) -> ActionOutcome {
    let acting = &roster[actor];
    if !acting.can_use_ultimate() {
        return ActionOutcome::failure(
            ActionFailureReason::UltimateUnavailable,
            format!(
                "{} cannot use Ultimate! (Cooldown: {}, Stamina: {})",
                acting.name,
                acting.ultimate_cooldown,
                acting.stamina()
            ),
        );
    }
    let team = acting.team();

    let mut caster = None;
    let mut allies = Vec::new();
    let mut enemies = Vec::new();
    for (i, c) in roster.iter_mut().enumerate() {
        if i == actor {
            caster = Some(c);
        } else if c.team() == team {
            allies.push(c);
        } else {
            enemies.push(c);
        }
    }

    match caster {
        Some(caster) => use_ultimate(caster, &mut allies, &mut enemies, rng),
        None => ActionOutcome::failure(
            ActionFailureReason::InvalidTarget,
            format!("No combatant at position {}!", actor),
        ),
    }
}
