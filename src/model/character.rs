use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::role::{LifeStage, Role, SecretGoal};
use super::skills::SkillMap;
use super::tick::Tick;
use super::traits::{STAT_MAX, TraitVector};

/// Maximum entries kept in a character's deed log.
pub const DEED_LOG_CAP: usize = 20;

/// The six emotional axes, each bounded [0,100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Emotion {
    Hope,
    Fear,
    Shame,
    Despair,
    Contentment,
    Rage,
}

string_enum!(Emotion {
    Hope => "hope",
    Fear => "fear",
    Shame => "shame",
    Despair => "despair",
    Contentment => "contentment",
    Rage => "rage",
});

pub const ALL_EMOTIONS: [Emotion; 6] = [
    Emotion::Hope,
    Emotion::Fear,
    Emotion::Shame,
    Emotion::Despair,
    Emotion::Contentment,
    Emotion::Rage,
];

/// Current emotional state, indexed by [`Emotion`]. Clamped like traits,
/// on deserialization as on every other write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 6]", into = "[u8; 6]")]
pub struct EmotionVector([u8; 6]);

impl From<[u8; 6]> for EmotionVector {
    fn from(mut values: [u8; 6]) -> Self {
        for v in &mut values {
            *v = (*v).min(STAT_MAX);
        }
        Self(values)
    }
}

impl From<EmotionVector> for [u8; 6] {
    fn from(ev: EmotionVector) -> Self {
        ev.0
    }
}

impl Default for EmotionVector {
    fn default() -> Self {
        Self([50; 6])
    }
}

impl EmotionVector {
    pub fn get(&self, e: Emotion) -> u8 {
        self.0[e as usize]
    }

    pub fn set(&mut self, e: Emotion, value: u8) {
        self.0[e as usize] = value.min(STAT_MAX);
    }

    pub fn apply_delta(&mut self, e: Emotion, delta: i16) {
        let v = (self.0[e as usize] as i16 + delta).clamp(0, STAT_MAX as i16);
        self.0[e as usize] = v as u8;
    }
}

/// An open wound. Exists only while the character is wounded; healing to
/// 100 removes the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wound {
    /// Accumulated severity, 0–100. Wounds stack.
    pub severity: u8,
    /// Healing progress toward recovery, 0–100.
    pub healing: u8,
    /// What caused the wound ("hunting accident", "poisoning survived", ...).
    pub cause: String,
    pub wounded_at: Tick,
    /// Last tick any medication was administered, for the neglect rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_medicated: Option<Tick>,
    /// Side-effect labels accumulated from risky treatments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub side_effects: Vec<String>,
}

impl Wound {
    pub fn new(severity: u8, cause: impl Into<String>, tick: Tick) -> Self {
        Self {
            severity: severity.min(STAT_MAX),
            healing: 0,
            cause: cause.into(),
            wounded_at: tick,
            last_medicated: None,
            side_effects: Vec::new(),
        }
    }
}

/// Terminal death record. Written exactly once; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathRecord {
    pub tick: Tick,
    pub cause: String,
}

/// Banishment state for a living character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exile {
    pub tick: Tick,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatRecord {
    pub kills: u32,
    pub battles: u32,
    pub duels_won: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deed {
    pub tick: Tick,
    pub text: String,
}

/// Bounded ring buffer of notable deeds. Oldest entries fall off at the cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeedLog(VecDeque<Deed>);

impl DeedLog {
    pub fn record(&mut self, tick: Tick, text: impl Into<String>) {
        if self.0.len() == DEED_LOG_CAP {
            self.0.pop_front();
        }
        self.0.push_back(Deed {
            tick,
            text: text.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deed> {
        self.0.iter()
    }
}

/// A single person in the simulation.
///
/// Characters are never physically removed: the dead keep their records
/// for dynasty and obituary queries. `death.is_none()` is the liveness
/// flag, which makes resurrection unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub role: Role,
    pub territory_id: u64,
    pub born: Tick,
    pub traits: TraitVector,
    pub emotions: EmotionVector,
    pub skills: SkillMap,
    pub secret_goal: SecretGoal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynasty: Option<String>,
    #[serde(default)]
    pub dynasty_generation: u32,
    /// Back-reference to a parent in the arena (lineage lookup, not ownership).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wound: Option<Wound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death: Option<DeathRecord>,
    /// Reign summary attached once by the succession resolver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obituary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exile: Option<Exile>,
    #[serde(default)]
    pub combat: CombatRecord,
    #[serde(default)]
    pub deeds: DeedLog,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crowned_at: Option<Tick>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_birth: Option<Tick>,
}

impl Character {
    /// Bare character with neutral stats. Callers fill in traits/skills.
    pub fn new(name: impl Into<String>, role: Role, territory_id: u64, born: Tick) -> Self {
        Self {
            id: 0,
            name: name.into(),
            title: None,
            role,
            territory_id,
            born,
            traits: TraitVector::default(),
            emotions: EmotionVector::default(),
            skills: SkillMap::new(),
            secret_goal: SecretGoal::None,
            dynasty: None,
            dynasty_generation: 0,
            parent: None,
            wound: None,
            death: None,
            obituary: None,
            exile: None,
            combat: CombatRecord::default(),
            deeds: DeedLog::default(),
            crowned_at: None,
            last_birth: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    pub fn is_wounded(&self) -> bool {
        self.wound.is_some()
    }

    pub fn is_exiled(&self) -> bool {
        self.exile.is_some()
    }

    /// Age in whole years: `floor((now - born) / 12)`.
    pub fn age(&self, now: Tick) -> u64 {
        now.years_since(self.born)
    }

    pub fn life_stage(&self, now: Tick) -> LifeStage {
        LifeStage::from_age(self.age(now))
    }
}
