use std::collections::BTreeMap;

use rand::Rng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::role::SocialClass;
use super::traits::STAT_MAX;

/// Learned-inheritance ceiling when only the society term applies.
pub const INHERIT_CEILING_SOCIETY_ONLY: f64 = 30.0;
/// Learned-inheritance ceiling when at least one parent is known.
pub const INHERIT_CEILING_WITH_PARENTS: f64 = 40.0;

/// Fraction of the society-wide average absorbed as cultural knowledge.
const SOCIETY_FRACTION: f64 = 0.10;
/// Fraction of the known parents' mean absorbed from caregivers.
const PARENT_FRACTION: f64 = 0.25;
/// Independent per-skill noise applied after all learned terms.
const SKILL_NOISE: i16 = 5;

/// Named, practicable skills. Bounded [0,100] like traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Skill {
    Combat,
    Tactics,
    Stewardship,
    Trade,
    Farming,
    Medicine,
    Lore,
    Oratory,
    Smithing,
    Seafaring,
}

string_enum!(Skill {
    Combat => "combat",
    Tactics => "tactics",
    Stewardship => "stewardship",
    Trade => "trade",
    Farming => "farming",
    Medicine => "medicine",
    Lore => "lore",
    Oratory => "oratory",
    Smithing => "smithing",
    Seafaring => "seafaring",
});

pub const ALL_SKILLS: [Skill; 10] = [
    Skill::Combat,
    Skill::Tactics,
    Skill::Stewardship,
    Skill::Trade,
    Skill::Farming,
    Skill::Medicine,
    Skill::Lore,
    Skill::Oratory,
    Skill::Smithing,
    Skill::Seafaring,
];

/// Starting competence a social class confers, before inheritance and noise.
fn class_baseline(class: SocialClass, skill: Skill) -> u8 {
    match class {
        SocialClass::Noble => match skill {
            Skill::Stewardship => 20,
            Skill::Tactics => 15,
            Skill::Combat => 15,
            Skill::Oratory => 15,
            Skill::Lore => 10,
            _ => 5,
        },
        SocialClass::Clergy => match skill {
            Skill::Lore => 20,
            Skill::Medicine => 15,
            Skill::Oratory => 15,
            _ => 5,
        },
        SocialClass::Merchant => match skill {
            Skill::Trade => 25,
            Skill::Stewardship => 15,
            Skill::Oratory => 10,
            Skill::Seafaring => 10,
            _ => 5,
        },
        SocialClass::Commoner => match skill {
            Skill::Farming => 20,
            Skill::Smithing => 10,
            _ => 5,
        },
    }
}

/// Children start at half the class baseline; practice comes with age.
fn age_factor(age_years: u64) -> f64 {
    if age_years < super::role::ADULT_AGE { 0.5 } else { 1.0 }
}

/// The capped learned contribution: society term plus parent term.
///
/// Talent is part innate (noise) and part learned from environment and
/// caregivers, but no amount of learned inheritance may substitute for
/// practice beyond the ceiling.
fn inheritance_term(society_avg: u8, parent_values: &[u8]) -> f64 {
    let society = SOCIETY_FRACTION * society_avg as f64;
    let (parent, ceiling) = if parent_values.is_empty() {
        (0.0, INHERIT_CEILING_SOCIETY_ONLY)
    } else {
        let mean =
            parent_values.iter().map(|&v| v as f64).sum::<f64>() / parent_values.len() as f64;
        (PARENT_FRACTION * mean, INHERIT_CEILING_WITH_PARENTS)
    };
    (society + parent).min(ceiling)
}

/// A character's skill values, keyed by [`Skill`]. Missing entries read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Skill, u8>", into = "BTreeMap<Skill, u8>")]
pub struct SkillMap(BTreeMap<Skill, u8>);

// Out-of-range values in flushed data clamp on load.
impl From<BTreeMap<Skill, u8>> for SkillMap {
    fn from(mut values: BTreeMap<Skill, u8>) -> Self {
        for v in values.values_mut() {
            *v = (*v).min(STAT_MAX);
        }
        Self(values)
    }
}

impl From<SkillMap> for BTreeMap<Skill, u8> {
    fn from(m: SkillMap) -> Self {
        m.0
    }
}

impl SkillMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, skill: Skill) -> u8 {
        self.0.get(&skill).copied().unwrap_or(0)
    }

    pub fn set(&mut self, skill: Skill, value: u8) {
        self.0.insert(skill, value.min(STAT_MAX));
    }

    /// Add a signed delta, saturating at the [0,100] bounds.
    pub fn apply_delta(&mut self, skill: Skill, delta: i16) {
        let v = (self.get(skill) as i16 + delta).clamp(0, STAT_MAX as i16);
        self.0.insert(skill, v as u8);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Skill, u8)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }

    /// Generate a full skill set for a new character.
    ///
    /// Class/age baseline, plus 10% of the society-wide average, plus 25%
    /// of the mean of known parents' values (the parent term stacks with
    /// the society term). The combined learned contribution is capped at
    /// 30 without parents / 40 with, then independent noise in [-5,5] is
    /// applied and the result clamped to [0,100].
    pub fn generate(
        class: SocialClass,
        age_years: u64,
        parents: &[&SkillMap],
        society_avg: &SkillMap,
        rng: &mut dyn RngCore,
    ) -> Self {
        let mut skills = SkillMap::new();
        for skill in ALL_SKILLS {
            let baseline = class_baseline(class, skill) as f64 * age_factor(age_years);
            let parent_values: Vec<u8> = parents.iter().map(|p| p.get(skill)).collect();
            let inherited = inheritance_term(society_avg.get(skill), &parent_values);
            let noise = rng.random_range(-SKILL_NOISE..=SKILL_NOISE);
            let value = ((baseline + inherited).round() as i16 + noise).clamp(0, STAT_MAX as i16);
            skills.set(skill, value as u8);
        }
        skills
    }
}
