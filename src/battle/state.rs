use crate::combatant::Combatant;
use crate::errors::{SetupError, SetupResult};
use schema::{ActionKind, CharacterClass, Controller};
use serde::{Deserialize, Serialize};

/// Number of combatants on each side.
pub const TEAM_SIZE: usize = 2;

/// Turn state machine. `resolve_turn` walks Resolving → Cooldown →
/// CheckTermination once per action, then Stamina once per turn, and lands
/// back on `AwaitingActions` or on `GameOver`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    AwaitingActions,
    Resolving,
    CooldownPhase,
    StaminaPhase,
    CheckTermination,
    GameOver { winner: u8 },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFailureReason {
    ActorDefeated,
    InsufficientStamina,
    UltimateUnavailable,
    InvalidTarget,
}

/// What a resolved action did. `amount` is the damage or healing actually
/// applied after mitigation, so callers never redo the math.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub succeeded: bool,
    pub message: String,
    pub amount: u16,
    pub failure: Option<ActionFailureReason>,
}

impl ActionOutcome {
    pub fn success(message: String, amount: u16) -> Self {
        Self {
            succeeded: true,
            message,
            amount,
            failure: None,
        }
    }

    pub fn failure(reason: ActionFailureReason, message: String) -> Self {
        Self {
            succeeded: false,
            message,
            amount: 0,
            failure: Some(reason),
        }
    }
}

/// An action choice plus its target, as a roster index.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedAction {
    pub kind: ActionKind,
    pub target: Option<usize>,
}

impl PlannedAction {
    pub fn new(kind: ActionKind, target: Option<usize>) -> Self {
        Self { kind, target }
    }

    pub fn untargeted(kind: ActionKind) -> Self {
        Self { kind, target: None }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    TurnStarted {
        turn_number: u32,
    },
    ActionResolved {
        actor: usize,
        kind: ActionKind,
        outcome: ActionOutcome,
    },
    CombatantDefeated {
        combatant: usize,
    },
    StaminaRestored {
        combatant: usize,
        old_stamina: u16,
        new_stamina: u16,
    },
    BattleEnded {
        winner: u8,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable line using battle context.
    /// Returns None for silent events.
    pub fn format(&self, battle_state: &BattleState) -> Option<String> {
        match self {
            BattleEvent::TurnStarted { turn_number } => {
                Some(format!("=== Turn {} ===", turn_number))
            }
            BattleEvent::ActionResolved { outcome, .. } => Some(outcome.message.clone()),
            BattleEvent::CombatantDefeated { combatant } => battle_state
                .combatants
                .get(*combatant)
                .map(|c| format!("{} has been defeated!", c.name)),
            BattleEvent::StaminaRestored {
                combatant,
                old_stamina,
                new_stamina,
            } => {
                if new_stamina == old_stamina {
                    return None;
                }
                battle_state.combatants.get(*combatant).map(|c| {
                    format!(
                        "{} gains +{} stamina! ({} -> {})",
                        c.name,
                        new_stamina - old_stamina,
                        old_stamina,
                        new_stamina
                    )
                })
            }
            BattleEvent::BattleEnded { winner } => {
                Some(format!("Battle over! Team {} wins!", winner + 1))
            }
        }
    }
}

/// Event bus for collecting the events of one turn.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    /// The outcomes of every action resolved this turn, in order.
    pub fn outcomes(&self) -> impl Iterator<Item = (usize, &ActionOutcome)> {
        self.events.iter().filter_map(|e| match e {
            BattleEvent::ActionResolved { actor, outcome, .. } => Some((*actor, outcome)),
            _ => None,
        })
    }

    pub fn formatted(&self, battle_state: &BattleState) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| e.format(battle_state))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Read-only projection of one combatant, the contract bots and renderers use.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CombatantView {
    pub index: usize,
    pub name: String,
    pub character_class: CharacterClass,
    pub controller: Controller,
    pub team: u8,
    pub health: u16,
    pub max_health: u16,
    pub stamina: u16,
    pub max_stamina: u16,
    pub defense: u16,
    pub attack: u16,
    pub dodge_chance: u8,
    pub critical_hit_chance: u8,
    pub speed: u8,
    pub ultimate_cooldown: u8,
    pub is_defeated: bool,
    pub defend_bonus: u16,
    pub dodge_bonus: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BattleSnapshot {
    pub turn_count: u32,
    pub game_over: bool,
    pub winner: Option<u8>,
    pub combatants: Vec<CombatantView>,
}

impl BattleSnapshot {
    pub fn combatant(&self, index: usize) -> Option<&CombatantView> {
        self.combatants.iter().find(|c| c.index == index)
    }

    /// Roster indices of living combatants opposing `index`.
    pub fn living_enemies_of(&self, index: usize) -> Vec<usize> {
        let Some(me) = self.combatant(index) else {
            return Vec::new();
        };
        self.combatants
            .iter()
            .filter(|c| c.team != me.team && !c.is_defeated)
            .map(|c| c.index)
            .collect()
    }
}

/// The roster and battle-level bookkeeping for one battle.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleState {
    pub combatants: Vec<Combatant>,
    pub controllers: Vec<Controller>,
    pub turn_number: u32,
    pub game_state: GameState,
    pub action_queue: Vec<Option<PlannedAction>>,
}

impl BattleState {
    /// Build a battle from exactly four combatants, two per team (ids 0 and 1).
    pub fn new(roster: Vec<(Combatant, Controller)>) -> SetupResult<Self> {
        if roster.len() != TEAM_SIZE * 2 {
            return Err(SetupError::InvalidRoster(format!(
                "expected {} combatants, got {}",
                TEAM_SIZE * 2,
                roster.len()
            )));
        }
        if let Some((c, _)) = roster.iter().find(|(c, _)| c.team() > 1) {
            return Err(SetupError::InvalidRoster(format!(
                "{} has team id {}, expected 0 or 1",
                c.name,
                c.team()
            )));
        }
        for team in 0..2u8 {
            let size = roster.iter().filter(|(c, _)| c.team() == team).count();
            if size != TEAM_SIZE {
                return Err(SetupError::InvalidRoster(format!(
                    "team {} has {} combatants, expected {}",
                    team, size, TEAM_SIZE
                )));
            }
        }
        for (i, (c, _)) in roster.iter().enumerate() {
            if roster[..i].iter().any(|(other, _)| other.name == c.name) {
                return Err(SetupError::InvalidRoster(format!(
                    "duplicate combatant name {}",
                    c.name
                )));
            }
        }

        let (combatants, controllers): (Vec<_>, Vec<_>) = roster.into_iter().unzip();
        Ok(Self {
            action_queue: vec![None; combatants.len()],
            combatants,
            controllers,
            turn_number: 0,
            game_state: GameState::AwaitingActions,
        })
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.game_state, GameState::GameOver { .. })
    }

    pub fn winner(&self) -> Option<u8> {
        match self.game_state {
            GameState::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn living_count(&self, team: u8) -> usize {
        self.combatants
            .iter()
            .filter(|c| c.team() == team && c.is_alive())
            .count()
    }

    /// Roster indices of living combatants opposing `index`.
    pub fn living_enemies_of(&self, index: usize) -> Vec<usize> {
        let Some(me) = self.combatants.get(index) else {
            return Vec::new();
        };
        let team = me.team();
        self.combatants
            .iter()
            .enumerate()
            .filter(|(_, c)| c.team() != team && c.is_alive())
            .map(|(i, _)| i)
            .collect()
    }

    /// The team left standing, if the other side has no living combatants.
    pub fn surviving_team(&self) -> Option<u8> {
        if self.living_count(0) == 0 {
            Some(1)
        } else if self.living_count(1) == 0 {
            Some(0)
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        let combatants = self
            .combatants
            .iter()
            .zip(&self.controllers)
            .enumerate()
            .map(|(index, (c, controller))| CombatantView {
                index,
                name: c.name.clone(),
                character_class: c.class,
                controller: *controller,
                team: c.team(),
                health: c.health(),
                max_health: c.max_health,
                stamina: c.stamina(),
                max_stamina: c.max_stamina,
                defense: c.defense,
                attack: c.attack,
                dodge_chance: c.dodge_chance,
                critical_hit_chance: c.critical_hit_chance,
                speed: c.speed,
                ultimate_cooldown: c.ultimate_cooldown,
                is_defeated: c.is_defeated(),
                defend_bonus: c.defend_bonus,
                dodge_bonus: c.dodge_bonus,
            })
            .collect();

        BattleSnapshot {
            turn_count: self.turn_number,
            game_over: self.is_game_over(),
            winner: self.winner(),
            combatants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn roster() -> Vec<(Combatant, Controller)> {
        vec![
            (Combatant::new("Player 1", CharacterClass::Knight, 0), Controller::Human),
            (Combatant::new("Player 2", CharacterClass::Healer, 0), Controller::Human),
            (Combatant::new("Bot 1", CharacterClass::Mage, 1), Controller::Bot),
            (Combatant::new("Bot 2", CharacterClass::Assassin, 1), Controller::Bot),
        ]
    }

    #[test]
    fn test_rejects_uneven_teams() {
        let mut r = roster();
        r[1] = (Combatant::new("Player 2", CharacterClass::Healer, 1), Controller::Human);
        assert!(matches!(BattleState::new(r), Err(SetupError::InvalidRoster(_))));
    }

    #[test]
    fn test_rejects_wrong_size_and_bad_team_id() {
        let mut r = roster();
        r.pop();
        assert!(BattleState::new(r).is_err());

        let mut r = roster();
        r[3] = (Combatant::new("Bot 2", CharacterClass::Assassin, 2), Controller::Bot);
        assert!(BattleState::new(r).is_err());
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let mut r = roster();
        r[1].0.name = "Player 1".to_string();
        assert!(BattleState::new(r).is_err());
    }

    #[test]
    fn test_snapshot_projects_every_field() {
        let mut state = BattleState::new(roster()).unwrap();
        state.combatants[2].set_stamina(40);
        state.combatants[3].set_health(0);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.combatants.len(), 4);
        assert!(!snapshot.game_over);
        assert_eq!(snapshot.winner, None);

        let mage = snapshot.combatant(2).unwrap();
        assert_eq!(mage.character_class, CharacterClass::Mage);
        assert_eq!(mage.stamina, 40);
        assert_eq!(mage.max_health, 70);
        assert_eq!(mage.controller, Controller::Bot);

        assert!(snapshot.combatant(3).unwrap().is_defeated);
        assert_eq!(snapshot.living_enemies_of(0), vec![2]);
    }

    #[test]
    fn test_surviving_team() {
        let mut state = BattleState::new(roster()).unwrap();
        assert_eq!(state.surviving_team(), None);
        state.combatants[2].set_health(0);
        state.combatants[3].set_health(0);
        assert_eq!(state.surviving_team(), Some(0));
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let state = BattleState::new(roster()).unwrap();
        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(json["combatants"][0]["name"], "Player 1");
        assert_eq!(json["combatants"][0]["character_class"], "Knight");
        assert_eq!(json["turn_count"], 0);
    }

    #[test]
    fn test_event_text_samples() {
        let state = BattleState::new(roster()).unwrap();
        assert_eq!(
            BattleEvent::TurnStarted { turn_number: 5 }.format(&state),
            Some("=== Turn 5 ===".to_string())
        );
        assert_eq!(
            BattleEvent::BattleEnded { winner: 0 }.format(&state),
            Some("Battle over! Team 1 wins!".to_string())
        );
        assert_eq!(
            BattleEvent::StaminaRestored { combatant: 0, old_stamina: 100, new_stamina: 100 }
                .format(&state),
            None
        );
        assert_eq!(
            BattleEvent::StaminaRestored { combatant: 2, old_stamina: 40, new_stamina: 45 }
                .format(&state),
            Some("Bot 1 gains +5 stamina! (40 -> 45)".to_string())
        );
    }
}
