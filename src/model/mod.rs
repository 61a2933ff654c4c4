pub mod character;
pub mod event;
pub(crate) mod macros;
pub mod role;
pub mod skills;
pub mod territory;
pub mod tick;
pub mod traits;
pub mod world;

pub use character::{
    Character, CombatRecord, DeathRecord, Deed, DeedLog, Emotion, EmotionVector, Exile, Wound,
    ALL_EMOTIONS, DEED_LOG_CAP,
};
pub use event::{
    Consequence, EngineEvent, EventKind, Legitimacy, SuccessionEvent, SuccessionMode,
};
pub use role::{LifeStage, Role, SecretGoal, SocialClass, ADULT_AGE, ELDER_AGE};
pub use skills::{Skill, SkillMap, ALL_SKILLS};
pub use territory::{Religion, SocietyContext, TerritorySnapshot};
pub use tick::{Tick, TICKS_PER_YEAR};
pub use traits::{Trait, TraitVector, ALL_TRAITS, STAT_MAX, STAT_MIN};
pub use world::World;
