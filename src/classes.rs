//! Class presets and the four ultimate abilities.
//!
//! Classes differ only in their stat preset and in what their ultimate does,
//! so each is a variant of [`CharacterClass`] rather than a type of its own.

use crate::battle::rng::TurnRng;
use crate::battle::state::{ActionFailureReason, ActionOutcome};
use crate::combatant::{Combatant, ULTIMATE_STAMINA_COST};
use crate::errors::{SetupError, SetupResult};
use schema::CharacterClass;
use std::str::FromStr;

/// Fixed stat preset for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassStats {
    pub max_health: u16,
    pub defense: u16,
    pub attack: u16,
    pub dodge_chance: u8,
    pub critical_hit_chance: u8,
    pub speed: u8,
    pub max_stamina: u16,
}

pub const SHIELD_WALL_DEFEND_BONUS: u16 = 15;
/// Turns of guaranteed crits after the one Shadow Strike is cast in.
pub const SHADOW_STRIKE_TURNS: u8 = 2;
pub const ARCANE_STORM_DAMAGE: u16 = 35;
pub const DIVINE_BLESSING_HEAL: u16 = 40;
pub const DIVINE_BLESSING_STAMINA: u16 = 20;

pub fn base_stats(class: CharacterClass) -> ClassStats {
    match class {
        CharacterClass::Knight => ClassStats {
            max_health: 120,
            defense: 20,
            attack: 18,
            dodge_chance: 10,
            critical_hit_chance: 15,
            speed: 8,
            max_stamina: 100,
        },
        CharacterClass::Assassin => ClassStats {
            max_health: 80,
            defense: 8,
            attack: 25,
            dodge_chance: 35,
            critical_hit_chance: 30,
            speed: 15,
            max_stamina: 100,
        },
        CharacterClass::Mage => ClassStats {
            max_health: 70,
            defense: 5,
            attack: 22,
            dodge_chance: 15,
            critical_hit_chance: 15,
            speed: 12,
            max_stamina: 100,
        },
        CharacterClass::Healer => ClassStats {
            max_health: 90,
            defense: 12,
            attack: 12,
            dodge_chance: 20,
            critical_hit_chance: 15,
            speed: 10,
            max_stamina: 100,
        },
    }
}

/// Build a combatant from a class name. An unknown class is a setup error.
pub fn create_combatant(name: &str, class_name: &str, team: u8) -> SetupResult<Combatant> {
    let class = CharacterClass::from_str(class_name.trim())
        .map_err(|_| SetupError::UnknownClass(class_name.to_string()))?;
    Ok(Combatant::new(name, class, team))
}

pub fn ultimate_name(class: CharacterClass) -> &'static str {
    match class {
        CharacterClass::Knight => "Shield Wall",
        CharacterClass::Assassin => "Shadow Strike",
        CharacterClass::Mage => "Arcane Storm",
        CharacterClass::Healer => "Divine Blessing",
    }
}

pub fn ultimate_description(class: CharacterClass) -> &'static str {
    match class {
        CharacterClass::Knight => "Shield Wall - +15 defense for every living ally until their next action",
        CharacterClass::Assassin => "Shadow Strike - Guaranteed critical hits for 2 turns",
        CharacterClass::Mage => "Arcane Storm - 35 damage to every living enemy",
        CharacterClass::Healer => "Divine Blessing - Heal all allies and revive fallen ones",
    }
}

/// Run the caster's class ultimate.
///
/// `allies` holds every other member of the caster's team, defeated or not;
/// `enemies` holds the whole opposing team. Each ability picks the targets it
/// cares about. Stamina is re-checked here even though the resolver already
/// gated on `can_use_ultimate`.
pub fn use_ultimate(
    caster: &mut Combatant,
    allies: &mut [&mut Combatant],
    enemies: &mut [&mut Combatant],
    rng: &mut TurnRng,
) -> ActionOutcome {
    if !caster.use_stamina(ULTIMATE_STAMINA_COST) {
        return ActionOutcome::failure(
            ActionFailureReason::InsufficientStamina,
            format!("{} doesn't have enough stamina for Ultimate!", caster.name),
        );
    }
    caster.start_ultimate_cooldown();

    match caster.class {
        CharacterClass::Knight => shield_wall(caster, allies),
        CharacterClass::Assassin => shadow_strike(caster),
        CharacterClass::Mage => arcane_storm(caster, enemies, rng),
        CharacterClass::Healer => divine_blessing(caster, allies),
    }
}

fn shield_wall(caster: &Combatant, allies: &mut [&mut Combatant]) -> ActionOutcome {
    let mut shielded = 0;
    for ally in allies.iter_mut().filter(|a| a.is_alive()) {
        ally.defend_bonus = SHIELD_WALL_DEFEND_BONUS;
        shielded += 1;
    }
    tracing::debug!(caster = %caster.name, shielded, "shield wall");
    ActionOutcome::success(
        format!(
            "{} uses Shield Wall! All allies gain +{} defense for 1 turn.",
            caster.name, SHIELD_WALL_DEFEND_BONUS
        ),
        0,
    )
}

fn shadow_strike(caster: &mut Combatant) -> ActionOutcome {
    caster.critical_hit_chance = 100;
    // The tick closing the casting slot takes one off.
    caster.shadow_strike_turns = SHADOW_STRIKE_TURNS + 1;
    ActionOutcome::success(
        format!(
            "{} uses Shadow Strike! Guaranteed critical hits for {} turns.",
            caster.name, SHADOW_STRIKE_TURNS
        ),
        0,
    )
}

fn arcane_storm(
    caster: &Combatant,
    enemies: &mut [&mut Combatant],
    rng: &mut TurnRng,
) -> ActionOutcome {
    let total: u16 = enemies
        .iter_mut()
        .filter(|e| e.is_alive())
        .map(|e| e.take_damage(ARCANE_STORM_DAMAGE, rng))
        .sum();
    ActionOutcome::success(
        format!(
            "{} uses Arcane Storm! Deals {} damage to all enemies (Total: {})",
            caster.name, ARCANE_STORM_DAMAGE, total
        ),
        total,
    )
}

fn divine_blessing(caster: &Combatant, allies: &mut [&mut Combatant]) -> ActionOutcome {
    let mut healed = 0;
    let mut revived = Vec::new();
    for ally in allies.iter_mut() {
        if ally.revive() {
            revived.push(ally.name.clone());
        } else {
            healed += ally.heal(DIVINE_BLESSING_HEAL);
            ally.restore_stamina(DIVINE_BLESSING_STAMINA);
        }
    }

    let mut message = format!(
        "{} uses Divine Blessing! Heals all allies and revives dead ones.",
        caster.name
    );
    if !revived.is_empty() {
        message.push_str(&format!(" Revived: {}.", revived.join(", ")));
    }
    ActionOutcome::success(message, healed)
}
