use serde::{Deserialize, Serialize};

use super::macros::string_enum;

/// Age (in years) at which a child becomes an adult.
pub const ADULT_AGE: u64 = 16;
/// Age (in years) at which an adult becomes an elder.
pub const ELDER_AGE: u64 = 60;

/// Named position a character occupies inside a territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Role {
    Ruler,
    Heir,
    General,
    Advisor,
    Rival,
    RebelLeader,
    Commoner,
    Merchant,
    Scholar,
    Warrior,
    Priest,
}

string_enum!(Role {
    Ruler => "ruler",
    Heir => "heir",
    General => "general",
    Advisor => "advisor",
    Rival => "rival",
    RebelLeader => "rebel_leader",
    Commoner => "commoner",
    Merchant => "merchant",
    Scholar => "scholar",
    Warrior => "warrior",
    Priest => "priest",
});

impl Role {
    /// Broad social stratum, used for skill baselines.
    pub fn social_class(self) -> SocialClass {
        match self {
            Role::Ruler | Role::Heir | Role::General | Role::Advisor | Role::Rival => {
                SocialClass::Noble
            }
            Role::Priest => SocialClass::Clergy,
            Role::Merchant => SocialClass::Merchant,
            Role::RebelLeader | Role::Commoner | Role::Scholar | Role::Warrior => {
                SocialClass::Commoner
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SocialClass {
    Noble,
    Clergy,
    Merchant,
    Commoner,
}

string_enum!(SocialClass {
    Noble => "noble",
    Clergy => "clergy",
    Merchant => "merchant",
    Commoner => "commoner",
});

/// Derived life stage. Never stored, always recomputed from age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LifeStage {
    Child,
    Adult,
    Elder,
}

string_enum!(LifeStage {
    Child => "child",
    Adult => "adult",
    Elder => "elder",
});

impl LifeStage {
    pub fn from_age(years: u64) -> Self {
        if years < ADULT_AGE {
            LifeStage::Child
        } else if years < ELDER_AGE {
            LifeStage::Adult
        } else {
            LifeStage::Elder
        }
    }
}

/// A private ambition a character conceals from the court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SecretGoal {
    None,
    SeizeThrone,
    AmassFortune,
    AvengeFamily,
    ProtectDynasty,
    SpreadFaith,
    FleeTerritory,
}

string_enum!(SecretGoal {
    None => "none",
    SeizeThrone => "seize_throne",
    AmassFortune => "amass_fortune",
    AvengeFamily => "avenge_family",
    ProtectDynasty => "protect_dynasty",
    SpreadFaith => "spread_faith",
    FleeTerritory => "flee_territory",
});
