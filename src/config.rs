//! Battle configuration: who fights, for which team, under whose control,
//! and which seed drives the dice.
//!
//! Configs are written in RON:
//!
//! ```text
//! (
//!     seed: Some(42),
//!     max_turns: 200,
//!     roster: [
//!         (name: "Player 1", class: "Knight", team: 0, controller: Human),
//!         (name: "Player 2", class: "Healer", team: 0, controller: Human),
//!         (name: "Bot 1", class: "Mage", team: 1, controller: Bot),
//!         (name: "Bot 2", class: "Assassin", team: 1, controller: Bot),
//!     ],
//! )
//! ```

use crate::classes::create_combatant;
use crate::combatant::Combatant;
use crate::errors::{SetupError, SetupResult};
use schema::Controller;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Names a RON config file to load instead of the default roster.
pub const CONFIG_PATH_ENV: &str = "SKIRMISH_CONFIG";
/// Overrides the seed from the config file.
pub const SEED_ENV: &str = "SKIRMISH_SEED";
/// Turns played before a battle with no winner is abandoned. Bots left with
/// only Defend and Dodge affordable can otherwise stall forever.
pub const DEFAULT_MAX_TURNS: u32 = 500;

fn default_max_turns() -> u32 {
    DEFAULT_MAX_TURNS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    /// Class name, matched case-insensitively. Kept as text so a typo is
    /// reported as an unknown class rather than a parse error.
    pub class: String,
    pub team: u8,
    pub controller: Controller,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
    pub roster: Vec<RosterEntry>,
}

impl Default for BattleConfig {
    /// Two human players on team 0 against two bots on team 1.
    fn default() -> Self {
        let entry = |name: &str, class: &str, team, controller| RosterEntry {
            name: name.to_string(),
            class: class.to_string(),
            team,
            controller,
        };
        Self {
            seed: None,
            max_turns: DEFAULT_MAX_TURNS,
            roster: vec![
                entry("Player 1", "Knight", 0, Controller::Human),
                entry("Player 2", "Healer", 0, Controller::Human),
                entry("Bot 1", "Mage", 1, Controller::Bot),
                entry("Bot 2", "Assassin", 1, Controller::Bot),
            ],
        }
    }
}

impl BattleConfig {
    pub fn from_ron_str(text: &str) -> SetupResult<Self> {
        ron::from_str(text).map_err(|e| SetupError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> SetupResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| SetupError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_ron_str(&text)
    }

    /// Default roster, or the file named by `SKIRMISH_CONFIG`; the seed can
    /// be overridden with `SKIRMISH_SEED`.
    pub fn from_env() -> SetupResult<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        if let Ok(seed) = std::env::var(SEED_ENV) {
            let seed = seed
                .trim()
                .parse()
                .map_err(|_| SetupError::Config(format!("{} is not a number: {}", SEED_ENV, seed)))?;
            config.seed = Some(seed);
        }
        Ok(config)
    }

    /// Turn the entries into combatants. Roster shape is validated by
    /// `BattleState::new`; only class names are checked here.
    pub fn build_roster(&self) -> SetupResult<Vec<(Combatant, Controller)>> {
        self.roster
            .iter()
            .map(|e| Ok((create_combatant(&e.name, &e.class, e.team)?, e.controller)))
            .collect()
    }
}
