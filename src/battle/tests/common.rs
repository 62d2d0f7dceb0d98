use crate::battle::ai::Behavior;
use crate::battle::rng::TurnRng;
use crate::battle::state::{BattleSnapshot, BattleState, PlannedAction};
use crate::combatant::Combatant;
use schema::{ActionKind, CharacterClass, Controller};
use std::collections::HashMap;

/// A builder for creating test combatants with common defaults.
///
/// # Example
/// ```ignore
/// let knight = TestCombatantBuilder::new("Player 1", CharacterClass::Knight, 0)
///     .with_health(50)
///     .with_stamina(5)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    name: String,
    class: CharacterClass,
    team: u8,
    health: Option<u16>,
    stamina: Option<u16>,
    cooldown: Option<u8>,
}

impl TestCombatantBuilder {
    pub fn new(name: &str, class: CharacterClass, team: u8) -> Self {
        Self {
            name: name.to_string(),
            class,
            team,
            health: None,
            stamina: None,
            cooldown: None,
        }
    }

    /// Sets current health. Zero builds a defeated combatant.
    pub fn with_health(mut self, health: u16) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_stamina(mut self, stamina: u16) -> Self {
        self.stamina = Some(stamina);
        self
    }

    pub fn with_cooldown(mut self, cooldown: u8) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    pub fn build(self) -> Combatant {
        let mut combatant = Combatant::new(self.name, self.class, self.team);
        if let Some(health) = self.health {
            combatant.set_health(health);
        }
        if let Some(stamina) = self.stamina {
            combatant.set_stamina(stamina);
        }
        if let Some(cooldown) = self.cooldown {
            combatant.ultimate_cooldown = cooldown;
        }
        combatant
    }
}

/// Creates a battle from four combatants. The first two are human-controlled
/// and the last two bots, matching the usual layout.
pub fn create_test_battle(roster: [Combatant; 4]) -> BattleState {
    let controllers = [Controller::Human, Controller::Human, Controller::Bot, Controller::Bot];
    let roster = roster.into_iter().zip(controllers).collect();
    match BattleState::new(roster) {
        Ok(state) => state,
        Err(err) => panic!("Failed to build test battle: {}", err),
    }
}

/// Knight (0) and Healer (1) on team 0, Mage (2) and Assassin (3) on team 1.
/// Speeds are all distinct, so turn order is always 3, 2, 1, 0.
pub fn standard_battle() -> BattleState {
    create_test_battle([
        Combatant::new("Player 1", CharacterClass::Knight, 0),
        Combatant::new("Player 2", CharacterClass::Healer, 0),
        Combatant::new("Bot 1", CharacterClass::Mage, 1),
        Combatant::new("Bot 2", CharacterClass::Assassin, 1),
    ])
}

/// Rolls of 100: no dodge ever succeeds (cap 90) and no crit below 100% lands.
pub fn no_luck_rng(count: usize) -> TurnRng {
    TurnRng::new_for_test(vec![100; count])
}

/// A bot brain that plays a fixed action per combatant, defaulting to Defend.
pub struct ScriptedBehavior {
    actions: HashMap<usize, PlannedAction>,
}

impl ScriptedBehavior {
    pub fn new(actions: Vec<(usize, PlannedAction)>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }
}

impl Behavior for ScriptedBehavior {
    fn decide_action(
        &self,
        combatant_index: usize,
        _snapshot: &BattleSnapshot,
        _rng: &mut TurnRng,
    ) -> PlannedAction {
        self.actions
            .get(&combatant_index)
            .copied()
            .unwrap_or(PlannedAction::untargeted(ActionKind::Defend))
    }
}

/// A bot that always plays Light Attack on the first living enemy.
pub struct LightOnlyBehavior;

impl Behavior for LightOnlyBehavior {
    fn decide_action(
        &self,
        combatant_index: usize,
        snapshot: &BattleSnapshot,
        _rng: &mut TurnRng,
    ) -> PlannedAction {
        let target = snapshot.living_enemies_of(combatant_index).first().copied();
        PlannedAction::new(ActionKind::Light, target)
    }
}

/// Health and stamina inside their bounds, and defeat exactly at zero health.
pub fn assert_invariants(state: &BattleState) {
    for c in &state.combatants {
        assert!(c.health() <= c.max_health, "{} health out of range", c.name);
        assert!(c.stamina() <= c.max_stamina, "{} stamina out of range", c.name);
        assert_eq!(c.is_defeated(), c.health() == 0, "{} defeat flag out of sync", c.name);
    }
}
