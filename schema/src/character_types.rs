use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The four playable classes. Parsing accepts any ASCII casing, so roster
/// files and menu input can say `knight`, `Knight` or `KNIGHT`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum CharacterClass {
    Knight,
    Assassin,
    Mage,
    Healer,
}

/// Who supplies a combatant's actions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Controller {
    Human,
    Bot,
}
