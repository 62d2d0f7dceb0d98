use crate::battle::rng::TurnRng;
use crate::classes::base_stats;
use schema::CharacterClass;
use serde::{Deserialize, Serialize};

/// Stamina needed (and spent) by every class's ultimate.
pub const ULTIMATE_STAMINA_COST: u16 = 30;
/// Turns an ultimate stays on cooldown after use.
pub const ULTIMATE_COOLDOWN_MAX: u8 = 3;
/// Dodge chance never exceeds this, whatever the bonuses.
pub const DODGE_CAP: u8 = 90;
/// Flat stamina regained at the end of every turn.
pub const STAMINA_PER_TURN: u16 = 5;

/// One fighter on the roster.
///
/// Defeat is a state, not removal: a defeated combatant stays in the roster
/// with `health == 0` and can be revived by a Healer's ultimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub class: CharacterClass,
    team: u8,

    pub max_health: u16,
    pub defense: u16,
    pub attack: u16,
    pub dodge_chance: u8,
    pub critical_hit_chance: u8,
    pub speed: u8,
    pub max_stamina: u16,

    health: u16,
    stamina: u16,
    pub ultimate_cooldown: u8,
    is_defeated: bool,

    // Last until this combatant's next action starts.
    pub defend_bonus: u16,
    pub dodge_bonus: u8,

    // Cooldown ticks left on Shadow Strike's guaranteed crits.
    pub shadow_strike_turns: u8,
}

impl Combatant {
    /// Create a combatant at full health and stamina with its class preset.
    pub fn new(name: impl Into<String>, class: CharacterClass, team: u8) -> Self {
        let stats = base_stats(class);
        Self {
            name: name.into(),
            class,
            team,
            max_health: stats.max_health,
            defense: stats.defense,
            attack: stats.attack,
            dodge_chance: stats.dodge_chance,
            critical_hit_chance: stats.critical_hit_chance,
            speed: stats.speed,
            max_stamina: stats.max_stamina,
            health: stats.max_health,
            stamina: stats.max_stamina,
            ultimate_cooldown: 0,
            is_defeated: false,
            defend_bonus: 0,
            dodge_bonus: 0,
            shadow_strike_turns: 0,
        }
    }

    pub fn team(&self) -> u8 {
        self.team
    }

    pub fn health(&self) -> u16 {
        self.health
    }

    pub fn stamina(&self) -> u16 {
        self.stamina
    }

    pub fn is_defeated(&self) -> bool {
        self.is_defeated
    }

    pub fn is_alive(&self) -> bool {
        !self.is_defeated
    }

    /// Set health directly, keeping the defeat flag in step with it.
    ///
    /// Crate-internal; from outside, the only way back from defeat is
    /// [`Combatant::revive`].
    ///
    /// ```compile_fail
    /// use skirmish::{CharacterClass, Combatant};
    /// let mut mage = Combatant::new("Mage", CharacterClass::Mage, 0);
    /// mage.set_health(10);
    /// ```
    pub(crate) fn set_health(&mut self, health: u16) {
        self.health = health.min(self.max_health);
        self.is_defeated = self.health == 0;
    }

    pub fn set_stamina(&mut self, stamina: u16) {
        self.stamina = stamina.min(self.max_stamina);
    }

    /// Dodge chance in effect right now, bonuses included, capped at 90.
    pub fn effective_dodge_chance(&self) -> u8 {
        self.dodge_chance.saturating_add(self.dodge_bonus).min(DODGE_CAP)
    }

    /// Roll dodge, then apply mitigated damage. Returns the damage actually
    /// applied: 0 when defeated or dodged, otherwise at least 1.
    pub fn take_damage(&mut self, amount: u16, rng: &mut TurnRng) -> u16 {
        if self.is_defeated {
            return 0;
        }

        let dodge = self.effective_dodge_chance();
        if rng.roll_percent(&format!("{} dodge ({}%)", self.name, dodge)) <= dodge {
            return 0;
        }

        let mitigation = self.defense.saturating_add(self.defend_bonus);
        let applied = amount.saturating_sub(mitigation).max(1);
        self.health = self.health.saturating_sub(applied);
        if self.health == 0 {
            self.is_defeated = true;
        }
        applied
    }

    /// Heal up to max health. Returns the amount actually restored; a
    /// defeated combatant cannot be healed.
    pub fn heal(&mut self, amount: u16) -> u16 {
        if self.is_defeated {
            return 0;
        }
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }

    /// Returns the stamina actually restored.
    pub fn restore_stamina(&mut self, amount: u16) -> u16 {
        let before = self.stamina;
        self.stamina = self.stamina.saturating_add(amount).min(self.max_stamina);
        self.stamina - before
    }

    /// Spend stamina if there is enough. On `false` nothing changes.
    pub fn use_stamina(&mut self, amount: u16) -> bool {
        if self.stamina >= amount {
            self.stamina -= amount;
            true
        } else {
            false
        }
    }

    pub fn can_use_ultimate(&self) -> bool {
        self.ultimate_cooldown == 0 && self.stamina >= ULTIMATE_STAMINA_COST
    }

    pub fn start_ultimate_cooldown(&mut self) {
        self.ultimate_cooldown = ULTIMATE_COOLDOWN_MAX;
    }

    pub fn reset_bonuses(&mut self) {
        self.defend_bonus = 0;
        self.dodge_bonus = 0;
    }

    /// Ticked once after each of this combatant's turn slots. Counts down
    /// the ultimate cooldown and Shadow Strike, restoring the class crit
    /// chance when the latter runs out.
    pub fn update_cooldowns(&mut self) {
        if self.ultimate_cooldown > 0 {
            self.ultimate_cooldown -= 1;
        }
        if self.shadow_strike_turns > 0 {
            self.shadow_strike_turns -= 1;
            if self.shadow_strike_turns == 0 {
                self.critical_hit_chance = base_stats(self.class).critical_hit_chance;
            }
        }
    }

    /// End-of-turn regeneration. Returns the stamina gained.
    pub fn restore_stamina_per_turn(&mut self) -> u16 {
        if self.is_defeated {
            return 0;
        }
        self.restore_stamina(STAMINA_PER_TURN)
    }

    /// Bring a defeated combatant back at half health and half stamina.
    /// Returns `false` if the combatant was not defeated.
    pub fn revive(&mut self) -> bool {
        if !self.is_defeated {
            return false;
        }
        self.is_defeated = false;
        self.health = self.max_health / 2;
        self.stamina = self.max_stamina / 2;
        self.shadow_strike_turns = 0;
        self.critical_hit_chance = base_stats(self.class).critical_hit_chance;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    // A roll of 100 beats any dodge chance, since dodge is capped at 90.
    fn no_dodge(count: usize) -> TurnRng {
        TurnRng::new_for_test(vec![100; count])
    }

    #[rstest]
    #[case(18, 20, 0, 1)]
    #[case(50, 20, 0, 30)]
    #[case(50, 20, 10, 20)]
    #[case(35, 20, 15, 1)]
    #[case(1, 0, 0, 1)]
    #[case(0, 0, 0, 1)]
    fn test_mitigated_damage(
        #[case] amount: u16,
        #[case] defense: u16,
        #[case] defend_bonus: u16,
        #[case] expected: u16,
    ) {
        let mut knight = Combatant::new("Knight", CharacterClass::Knight, 0);
        knight.defense = defense;
        knight.defend_bonus = defend_bonus;

        let applied = knight.take_damage(amount, &mut no_dodge(1));

        assert_eq!(applied, expected);
        assert_eq!(knight.health(), knight.max_health - expected);
    }

    #[test]
    fn test_applied_damage_never_exceeds_raw_amount_once_positive() {
        for amount in 1..200u16 {
            let mut mage = Combatant::new("Mage", CharacterClass::Mage, 0);
            let applied = mage.take_damage(amount, &mut no_dodge(1));
            assert!(applied >= 1);
            assert!(applied <= amount);
        }
    }

    #[test]
    fn test_dodge_evades_everything() {
        let mut assassin = Combatant::new("Assassin", CharacterClass::Assassin, 1);
        // Assassin dodges on rolls <= 35.
        let applied = assassin.take_damage(500, &mut TurnRng::new_for_test(vec![35]));
        assert_eq!(applied, 0);
        assert_eq!(assassin.health(), assassin.max_health);
    }

    #[test]
    fn test_dodge_chance_is_capped() {
        let mut assassin = Combatant::new("Assassin", CharacterClass::Assassin, 1);
        assassin.dodge_bonus = 80;
        assert_eq!(assassin.effective_dodge_chance(), DODGE_CAP);

        // 91 is above the cap, so the hit lands.
        let applied = assassin.take_damage(20, &mut TurnRng::new_for_test(vec![91]));
        assert_eq!(applied, 12);
    }

    #[test]
    fn test_lethal_damage_defeats_and_clamps() {
        let mut mage = Combatant::new("Mage", CharacterClass::Mage, 0);
        mage.take_damage(500, &mut no_dodge(1));
        assert_eq!(mage.health(), 0);
        assert!(mage.is_defeated());

        // Further hits do nothing and consume no roll.
        assert_eq!(mage.take_damage(50, &mut TurnRng::new_for_test(vec![])), 0);
    }

    #[test]
    fn test_heal_clamps_and_skips_defeated() {
        let mut healer = Combatant::new("Healer", CharacterClass::Healer, 0);
        healer.set_health(80);
        assert_eq!(healer.heal(25), 10);
        assert_eq!(healer.health(), 90);

        healer.set_health(0);
        assert_eq!(healer.heal(25), 0);
        assert_eq!(healer.health(), 0);
        assert!(healer.is_defeated());
    }

    #[test]
    fn test_failed_stamina_spend_is_idempotent() {
        let mut knight = Combatant::new("Knight", CharacterClass::Knight, 0);
        knight.set_stamina(5);
        assert!(!knight.use_stamina(20));
        assert!(!knight.use_stamina(20));
        assert_eq!(knight.stamina(), 5);
        assert!(knight.use_stamina(5));
        assert_eq!(knight.stamina(), 0);
    }

    #[test]
    fn test_stamina_restore_clamps() {
        let mut knight = Combatant::new("Knight", CharacterClass::Knight, 0);
        knight.set_stamina(97);
        assert_eq!(knight.restore_stamina_per_turn(), 3);
        assert_eq!(knight.stamina(), 100);
    }

    #[test]
    fn test_defeated_get_no_turn_regeneration() {
        let mut knight = Combatant::new("Knight", CharacterClass::Knight, 0);
        knight.set_stamina(10);
        knight.set_health(0);
        assert_eq!(knight.restore_stamina_per_turn(), 0);
        assert_eq!(knight.stamina(), 10);
    }

    #[rstest]
    #[case(0, 30, true)]
    #[case(0, 29, false)]
    #[case(1, 100, false)]
    fn test_ultimate_gate(#[case] cooldown: u8, #[case] stamina: u16, #[case] usable: bool) {
        let mut mage = Combatant::new("Mage", CharacterClass::Mage, 0);
        mage.ultimate_cooldown = cooldown;
        mage.set_stamina(stamina);
        assert_eq!(mage.can_use_ultimate(), usable);
    }

    #[test]
    fn test_cooldown_ticks_down_to_zero() {
        let mut mage = Combatant::new("Mage", CharacterClass::Mage, 0);
        mage.start_ultimate_cooldown();
        for expected in [2, 1, 0, 0] {
            mage.update_cooldowns();
            assert_eq!(mage.ultimate_cooldown, expected);
        }
    }

    #[test]
    fn test_revive_only_works_on_defeated() {
        let mut healer = Combatant::new("Healer", CharacterClass::Healer, 0);
        assert!(!healer.revive());

        healer.set_health(0);
        healer.set_stamina(0);
        assert!(healer.revive());
        assert_eq!(healer.health(), 45);
        assert_eq!(healer.stamina(), 50);
        assert!(!healer.is_defeated());
    }
}
