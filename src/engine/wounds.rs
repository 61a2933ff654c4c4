use rand::Rng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::macros::string_enum;
use crate::model::{Character, Tick, Wound, STAT_MAX};

/// Severity at or above this triggers an immediate-death roll before the
/// character even enters the wounded state.
pub const GRAVE_WOUND_THRESHOLD: u8 = 95;
pub const GRAVE_WOUND_DEATH_CHANCE: f64 = 0.30;

/// Passive healing per tick, equal to the rest-medication rate.
pub const PASSIVE_HEALING: u8 = 5;

/// The neglect rule: a severe wound left unmedicated this many ticks
/// while open longer than [`NEGLECT_DURATION`] can kill on its own.
pub const NEGLECT_WINDOW: u64 = 6;
pub const NEGLECT_SEVERITY: u8 = 60;
pub const NEGLECT_DURATION: u64 = 12;
pub const NEGLECT_DEATH_CHANCE: f64 = 0.05;

/// Multiplicative noise band around a medication's base healing rate.
const EFFECTIVENESS_NOISE: f64 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MedicationType {
    Herbal,
    Surgical,
    Experimental,
    Spiritual,
    Rest,
}

string_enum!(MedicationType {
    Herbal => "herbal",
    Surgical => "surgical",
    Experimental => "experimental",
    Spiritual => "spiritual",
    Rest => "rest",
});

struct MedicationProfile {
    healing: u8,
    death_risk: f64,
    side_effect_risk: f64,
    side_effects: &'static [&'static str],
}

impl MedicationType {
    fn profile(self) -> MedicationProfile {
        match self {
            MedicationType::Herbal => MedicationProfile {
                healing: 10,
                death_risk: 0.02,
                side_effect_risk: 0.10,
                side_effects: &["nausea", "dizziness"],
            },
            MedicationType::Surgical => MedicationProfile {
                healing: 18,
                death_risk: 0.08,
                side_effect_risk: 0.25,
                side_effects: &["infection", "fever", "lasting scar"],
            },
            MedicationType::Experimental => MedicationProfile {
                healing: 25,
                death_risk: 0.15,
                side_effect_risk: 0.35,
                side_effects: &["hallucinations", "tremors", "partial blindness"],
            },
            MedicationType::Spiritual => MedicationProfile {
                healing: 7,
                death_risk: 0.0,
                side_effect_risk: 0.05,
                side_effects: &["religious fervor"],
            },
            MedicationType::Rest => MedicationProfile {
                healing: 5,
                death_risk: 0.0,
                side_effect_risk: 0.0,
                side_effects: &[],
            },
        }
    }
}

/// Result of inflicting a wound. `Died` means the caller must run the
/// terminal transition; this module never writes death records itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WoundOutcome {
    Died,
    Wounded { severity: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicationOutcome {
    pub died: bool,
    pub healed: bool,
    pub healing_applied: u8,
    pub side_effect: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassiveOutcome {
    Died,
    Healed,
    Healing { severity: u8, healing: u8 },
}

/// Add severity to the character, stacking onto any open wound (cap 100).
///
/// Healing progress resets on every new wound; the original wound tick is
/// kept so the neglect clock keeps running across re-injury.
pub fn inflict_wound(
    character: &mut Character,
    severity: u8,
    cause: &str,
    tick: Tick,
    rng: &mut dyn RngCore,
) -> WoundOutcome {
    let stacked = match &character.wound {
        Some(w) => (w.severity as u16 + severity as u16).min(STAT_MAX as u16) as u8,
        None => severity.min(STAT_MAX),
    };
    if stacked >= GRAVE_WOUND_THRESHOLD && rng.random_bool(GRAVE_WOUND_DEATH_CHANCE) {
        return WoundOutcome::Died;
    }
    match &mut character.wound {
        Some(w) => {
            w.severity = stacked;
            w.healing = 0;
            w.cause = cause.to_string();
        }
        None => character.wound = Some(Wound::new(stacked, cause, tick)),
    }
    WoundOutcome::Wounded { severity: stacked }
}

/// Administer one medication. Death risk is rolled first, then side
/// effects, then the healing advance; reaching 100 clears the wound.
pub fn apply_medication(
    character: &mut Character,
    medication: MedicationType,
    tick: Tick,
    rng: &mut dyn RngCore,
) -> Result<MedicationOutcome, EngineError> {
    if !character.is_alive() {
        return Err(EngineError::already_dead(character.id));
    }
    let profile = medication.profile();
    let wound = character
        .wound
        .as_mut()
        .ok_or_else(|| EngineError::invalid_state("character is not wounded"))?;

    if profile.death_risk > 0.0 && rng.random_bool(profile.death_risk) {
        return Ok(MedicationOutcome {
            died: true,
            healed: false,
            healing_applied: 0,
            side_effect: None,
        });
    }

    let side_effect = if profile.side_effect_risk > 0.0 && rng.random_bool(profile.side_effect_risk)
    {
        let label = profile.side_effects[rng.random_range(0..profile.side_effects.len())];
        wound.side_effects.push(label.to_string());
        Some(label.to_string())
    } else {
        None
    };

    let factor = rng.random_range(1.0 - EFFECTIVENESS_NOISE..=1.0 + EFFECTIVENESS_NOISE);
    let applied = (profile.healing as f64 * factor).round().max(0.0) as u8;
    wound.last_medicated = Some(tick);
    let healing = (wound.healing as u16 + applied as u16).min(STAT_MAX as u16) as u8;
    wound.healing = healing;

    let healed = healing >= STAT_MAX;
    if healed {
        character.wound = None;
    }
    Ok(MedicationOutcome {
        died: false,
        healed,
        healing_applied: applied,
        side_effect,
    })
}

/// Per-tick passive update for a wounded character: the untreated-death
/// roll when the neglect rule applies, then rest-rate healing.
pub fn passive_tick(
    character: &mut Character,
    tick: Tick,
    rng: &mut dyn RngCore,
) -> Result<PassiveOutcome, EngineError> {
    if !character.is_alive() {
        return Err(EngineError::already_dead(character.id));
    }
    let wound = character
        .wound
        .as_mut()
        .ok_or_else(|| EngineError::invalid_state("character is not wounded"))?;

    let medicated_recently = wound
        .last_medicated
        .is_some_and(|t| tick.ticks_since(t) <= NEGLECT_WINDOW);
    let neglected = !medicated_recently
        && wound.severity > NEGLECT_SEVERITY
        && tick.ticks_since(wound.wounded_at) > NEGLECT_DURATION;
    if neglected && rng.random_bool(NEGLECT_DEATH_CHANCE) {
        return Ok(PassiveOutcome::Died);
    }

    let healing = (wound.healing as u16 + PASSIVE_HEALING as u16).min(STAT_MAX as u16) as u8;
    wound.healing = healing;
    if healing >= STAT_MAX {
        character.wound = None;
        return Ok(PassiveOutcome::Healed);
    }
    let severity = wound.severity;
    Ok(PassiveOutcome::Healing { severity, healing })
}
