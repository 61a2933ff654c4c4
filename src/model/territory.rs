use serde::{Deserialize, Serialize};

use super::skills::SkillMap;

/// Read-only aggregate statistics for one territory, captured by the
/// caller at the start of a tick. The engine never mutates these; the
/// economic and military ledgers live with external collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritorySnapshot {
    pub id: u64,
    pub population: u32,
    pub food: u32,
    pub wealth: u32,
    pub happiness: u8,
    pub military: u32,
    pub knowledge: u32,
    pub shelter_capacity: u32,
    pub at_war: bool,
}

/// The faith active in a territory, if any. Consulted for priest
/// spawning and the piety bonus to birth chance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Religion {
    pub name: String,
    /// Devoutness of the population, 0–100.
    pub piety: u8,
}

/// Society-wide context passed explicitly into each tick so the engine
/// carries no ambient global state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocietyContext {
    /// Average skill values across the whole population, for cultural
    /// skill inheritance.
    pub skill_averages: SkillMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub religion: Option<Religion>,
}
