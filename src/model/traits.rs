use rand::Rng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::role::Role;

/// Lower/upper bound for every trait, skill, and emotion value.
pub const STAT_MIN: u8 = 0;
pub const STAT_MAX: u8 = 100;

/// Symmetric noise applied when blending a child's traits with a parent's.
const INHERIT_NOISE: i16 = 10;

/// The 18 personality axes. Each is a bounded integer in [0,100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Trait {
    Ambition,
    Greed,
    Loyalty,
    Honor,
    Cruelty,
    Compassion,
    Justice,
    Generosity,
    Cunning,
    Wisdom,
    Paranoia,
    Vigilance,
    Courage,
    Pride,
    Wrath,
    Charisma,
    Diplomacy,
    Strength,
}

string_enum!(Trait {
    Ambition => "ambition",
    Greed => "greed",
    Loyalty => "loyalty",
    Honor => "honor",
    Cruelty => "cruelty",
    Compassion => "compassion",
    Justice => "justice",
    Generosity => "generosity",
    Cunning => "cunning",
    Wisdom => "wisdom",
    Paranoia => "paranoia",
    Vigilance => "vigilance",
    Courage => "courage",
    Pride => "pride",
    Wrath => "wrath",
    Charisma => "charisma",
    Diplomacy => "diplomacy",
    Strength => "strength",
});

pub const NUM_TRAITS: usize = 18;

/// All traits in index order. `Trait as usize` is the index into a
/// `TraitVector`'s backing array.
pub const ALL_TRAITS: [Trait; NUM_TRAITS] = [
    Trait::Ambition,
    Trait::Greed,
    Trait::Loyalty,
    Trait::Honor,
    Trait::Cruelty,
    Trait::Compassion,
    Trait::Justice,
    Trait::Generosity,
    Trait::Cunning,
    Trait::Wisdom,
    Trait::Paranoia,
    Trait::Vigilance,
    Trait::Courage,
    Trait::Pride,
    Trait::Wrath,
    Trait::Charisma,
    Trait::Diplomacy,
    Trait::Strength,
];

/// Uniform draw range for a trait at generation time. Volatility traits
/// (cruelty, paranoia, wrath) start from a narrower, lower band so that
/// monsters are made by events, not by birth.
fn baseline_range(t: Trait) -> (u8, u8) {
    match t {
        Trait::Cruelty | Trait::Paranoia => (10, 60),
        Trait::Wrath => (10, 50),
        _ => (20, 80),
    }
}

/// Fixed additive bonus a role confers on top of the generated baseline.
fn role_bonus(role: Role, t: Trait) -> u8 {
    match role {
        Role::Ruler => match t {
            Trait::Ambition => 20,
            Trait::Charisma => 15,
            Trait::Justice => 10,
            Trait::Vigilance => 10,
            _ => 0,
        },
        Role::Heir => match t {
            Trait::Ambition => 15,
            Trait::Pride => 10,
            Trait::Diplomacy => 5,
            _ => 0,
        },
        Role::General => match t {
            Trait::Courage => 20,
            Trait::Strength => 15,
            Trait::Vigilance => 10,
            Trait::Wrath => 5,
            _ => 0,
        },
        Role::Advisor => match t {
            Trait::Wisdom => 20,
            Trait::Cunning => 15,
            Trait::Diplomacy => 10,
            _ => 0,
        },
        Role::Rival => match t {
            Trait::Ambition => 20,
            Trait::Cunning => 15,
            Trait::Paranoia => 10,
            _ => 0,
        },
        Role::RebelLeader => match t {
            Trait::Ambition => 15,
            Trait::Courage => 15,
            Trait::Charisma => 10,
            Trait::Wrath => 10,
            _ => 0,
        },
        Role::Merchant => match t {
            Trait::Greed => 20,
            Trait::Cunning => 10,
            Trait::Diplomacy => 10,
            _ => 0,
        },
        Role::Scholar => match t {
            Trait::Wisdom => 25,
            Trait::Vigilance => 5,
            _ => 0,
        },
        Role::Warrior => match t {
            Trait::Strength => 20,
            Trait::Courage => 15,
            Trait::Honor => 5,
            _ => 0,
        },
        Role::Priest => match t {
            Trait::Compassion => 15,
            Trait::Wisdom => 10,
            Trait::Charisma => 10,
            Trait::Justice => 5,
            _ => 0,
        },
        Role::Commoner => 0,
    }
}

fn clamp_stat(v: i16) -> u8 {
    v.clamp(STAT_MIN as i16, STAT_MAX as i16) as u8
}

/// A character's full personality, indexed by [`Trait`].
///
/// Every write path clamps to [0,100]; values returned by [`get`] are
/// always in range.
///
/// [`get`]: TraitVector::get
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; NUM_TRAITS]", into = "[u8; NUM_TRAITS]")]
pub struct TraitVector([u8; NUM_TRAITS]);

// Out-of-range values in flushed data clamp on load, like every other
// write path.
impl From<[u8; NUM_TRAITS]> for TraitVector {
    fn from(mut values: [u8; NUM_TRAITS]) -> Self {
        for v in &mut values {
            *v = (*v).min(STAT_MAX);
        }
        Self(values)
    }
}

impl From<TraitVector> for [u8; NUM_TRAITS] {
    fn from(tv: TraitVector) -> Self {
        tv.0
    }
}

impl Default for TraitVector {
    fn default() -> Self {
        Self([50; NUM_TRAITS])
    }
}

impl TraitVector {
    pub fn get(&self, t: Trait) -> u8 {
        self.0[t as usize]
    }

    pub fn set(&mut self, t: Trait, value: u8) {
        self.0[t as usize] = value.min(STAT_MAX);
    }

    /// Add a signed delta, saturating at the [0,100] bounds.
    pub fn apply_delta(&mut self, t: Trait, delta: i16) {
        let current = self.0[t as usize] as i16;
        self.0[t as usize] = clamp_stat(current + delta);
    }

    /// Draw a fresh personality for a character entering the given role:
    /// uniform baseline per trait, then the fixed role bonus, clamped.
    pub fn generate(role: Role, rng: &mut dyn RngCore) -> Self {
        let mut values = [0u8; NUM_TRAITS];
        for t in ALL_TRAITS {
            let (lo, hi) = baseline_range(t);
            let base = rng.random_range(lo..=hi);
            values[t as usize] = clamp_stat(base as i16 + role_bonus(role, t) as i16);
        }
        Self(values)
    }

    /// Apply a role's fixed bonus to an existing personality, for
    /// characters promoted into a role rather than generated in it.
    pub fn apply_role_bonus(&mut self, role: Role) {
        for t in ALL_TRAITS {
            let bonus = role_bonus(role, t);
            if bonus > 0 {
                self.apply_delta(t, bonus as i16);
            }
        }
    }

    /// Blend a freshly generated child baseline with a single parent:
    /// per-trait average plus symmetric noise in [-10,10], clamped.
    ///
    /// Multi-parent averaging is not supported; callers with two known
    /// parents must average them before calling.
    pub fn inherit(child_base: &TraitVector, parent: &TraitVector, rng: &mut dyn RngCore) -> Self {
        let mut values = [0u8; NUM_TRAITS];
        for t in ALL_TRAITS {
            let avg = (child_base.get(t) as i16 + parent.get(t) as i16) / 2;
            let noise = rng.random_range(-INHERIT_NOISE..=INHERIT_NOISE);
            values[t as usize] = clamp_stat(avg + noise);
        }
        Self(values)
    }
}
