use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The six things a combatant can do on its turn. The lower-case strum
/// names (`light`, `heavy`, ...) are the names bots and drivers exchange.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Light,
    Heavy,
    Ultimate,
    Defend,
    Dodge,
    Heal,
}

impl ActionKind {
    /// Stamina the action costs. The ultimate's cost is paid by the class ability.
    pub fn stamina_cost(&self) -> u16 {
        match self {
            ActionKind::Light => 10,
            ActionKind::Heavy => 20,
            ActionKind::Ultimate => 30,
            ActionKind::Defend | ActionKind::Dodge => 5,
            ActionKind::Heal => 15,
        }
    }

    /// Whether the action needs a live enemy target.
    pub fn needs_enemy_target(&self) -> bool {
        matches!(self, ActionKind::Light | ActionKind::Heavy)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ActionKind::Light => "Light Attack",
            ActionKind::Heavy => "Heavy Attack",
            ActionKind::Ultimate => "Ultimate",
            ActionKind::Defend => "Defend",
            ActionKind::Dodge => "Dodge",
            ActionKind::Heal => "Heal",
        }
    }
}
