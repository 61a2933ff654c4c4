use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::tick::Tick;

/// What happened, for the narration layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EventKind {
    Birth,
    Death,
    ComingOfAge,
    Wounded,
    Healed,
    Medication,
    SideEffect,
    Promotion,
    Exile,
    Execution,
    Succession,
    CivilWar,
    Obituary,
}

string_enum!(EventKind {
    Birth => "birth",
    Death => "death",
    ComingOfAge => "coming_of_age",
    Wounded => "wounded",
    Healed => "healed",
    Medication => "medication",
    SideEffect => "side_effect",
    Promotion => "promotion",
    Exile => "exile",
    Execution => "execution",
    Succession => "succession",
    CivilWar => "civil_war",
    Obituary => "obituary",
});

/// A narration record emitted during a tick. Consumed by the calling
/// layer; the engine only appends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineEvent {
    pub id: u64,
    pub tick: Tick,
    pub kind: EventKind,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SuccessionMode {
    Peaceful,
    Coup,
    CivilWar,
    Election,
}

string_enum!(SuccessionMode {
    Peaceful => "peaceful",
    Coup => "coup",
    CivilWar => "civil_war",
    Election => "election",
});

/// How the external legitimacy subsystem should initialize the new
/// ruler's standing. The engine picks the mode only; the score
/// computation belongs to the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Legitimacy {
    Inheritance,
    Conquest,
    Coup,
    Election,
}

string_enum!(Legitimacy {
    Inheritance => "inheritance",
    Conquest => "conquest",
    Coup => "coup",
    Election => "election",
});

/// Record of one resolved succession. Created once per ruler death,
/// immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessionEvent {
    pub territory_id: u64,
    pub tick: Tick,
    pub dead_ruler: u64,
    pub new_ruler: u64,
    pub mode: SuccessionMode,
    pub legitimacy: Legitimacy,
    /// Population-level abstraction, civil war only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casualties: Option<u32>,
    pub narrative: String,
}

/// An outbound effect crossing the territory boundary. The engine pushes
/// these into an outbox; the caller applies each through the owning
/// territory's next transactional step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Consequence {
    /// A hereditary grievance seeded by regicide.
    GrievanceBond {
        aggrieved_territory: u64,
        target_territory: u64,
        intensity: u8,
        hereditary: bool,
    },
    /// One side's memory of an inter-territory wrong.
    MemoryRecorded {
        territory_id: u64,
        about_territory: u64,
        /// Negative = grievance, positive = triumph.
        sentiment: i8,
        text: String,
    },
    /// Existing bonds on the old ruler's territory persist under the new
    /// ruler; decay policy is the collaborator's business.
    BondsCarriedOver { territory_id: u64, new_ruler: u64 },
}
