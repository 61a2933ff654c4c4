use rand::Rng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::model::macros::string_enum;
use crate::model::{Character, Tick, Trait, ELDER_AGE};

/// Hunting turns dangerous past this age.
const HUNTING_AGE_LIMIT: u64 = 50;
const HUNTING_AGE_SURCHARGE: f64 = 0.10;

/// Vigilance divided by this gives the poison detection chance.
const POISON_DETECTION_DIVISOR: f64 = 200.0;
const POISON_DETECTION_CAP: f64 = 0.50;

/// Exile attrition baseline and per-tick growth.
const EXILE_BASE_RATE: f64 = 0.01;
const EXILE_TICK_RATE: f64 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AccidentKind {
    Hunting,
    Construction,
    Travel,
    Tournament,
    Fire,
}

string_enum!(AccidentKind {
    Hunting => "hunting",
    Construction => "construction",
    Travel => "travel",
    Tournament => "tournament",
    Fire => "fire",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DiseaseKind {
    Plague,
    Fever,
    Consumption,
    Dysentery,
    Pox,
}

string_enum!(DiseaseKind {
    Plague => "plague",
    Fever => "fever",
    Consumption => "consumption",
    Dysentery => "dysentery",
    Pox => "pox",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ExecutionMethod {
    Beheading,
    Hanging,
    Burning,
    Drowning,
}

string_enum!(ExecutionMethod {
    Beheading => "beheading",
    Hanging => "hanging",
    Burning => "burning",
    Drowning => "drowning",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DisasterKind {
    Earthquake,
    Flood,
    Wildfire,
    Storm,
}

string_enum!(DisasterKind {
    Earthquake => "earthquake",
    Flood => "flood",
    Wildfire => "wildfire",
    Storm => "storm",
});

/// Every way a character can die, as a closed tagged enum dispatched
/// through [`resolve`]. Deterministic causes carry no probability; their
/// triggers live with external collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MortalityCause {
    Accident(AccidentKind),
    Disease(DiseaseKind),
    Poisoning,
    Execution { method: ExecutionMethod, crime: String },
    Exposure,
    Famine,
    Disaster(DisasterKind),
    ExileAttrition { ticks_in_exile: u64 },
}

/// What a cause-resolver decided. `wound` is a severity the caller should
/// inflict on a survivor; deaths go through `World::record_death`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CauseOutcome {
    pub died: bool,
    pub description: String,
    pub wound: Option<u8>,
}

impl CauseOutcome {
    fn death(description: String) -> Self {
        Self {
            died: true,
            description,
            wound: None,
        }
    }

    fn survived(description: String, wound: Option<u8>) -> Self {
        Self {
            died: false,
            description,
            wound,
        }
    }
}

fn accident_rate(kind: AccidentKind, age: u64) -> f64 {
    let base = match kind {
        AccidentKind::Hunting => 0.05,
        AccidentKind::Construction => 0.04,
        AccidentKind::Travel => 0.03,
        AccidentKind::Tournament => 0.06,
        AccidentKind::Fire => 0.10,
    };
    if kind == AccidentKind::Hunting && age > HUNTING_AGE_LIMIT {
        base + HUNTING_AGE_SURCHARGE
    } else {
        base
    }
}

fn disease_rate(kind: DiseaseKind, age: u64) -> f64 {
    let base: f64 = match kind {
        DiseaseKind::Plague => 0.40,
        DiseaseKind::Fever => 0.15,
        DiseaseKind::Consumption => 0.25,
        DiseaseKind::Dysentery => 0.20,
        DiseaseKind::Pox => 0.30,
    };
    let band: f64 = if age < 16 {
        0.10
    } else if age >= ELDER_AGE {
        0.20
    } else if age >= 45 {
        0.05
    } else {
        0.0
    };
    (base + band).min(1.0)
}

/// Per-tick exile death probability, growing the longer the banishment
/// lasts, with a surcharge for the old.
pub fn exile_attrition_rate(ticks_in_exile: u64, age: u64) -> f64 {
    let surcharge = if age >= ELDER_AGE {
        0.03
    } else if age >= 45 {
        0.01
    } else {
        0.0
    };
    (EXILE_BASE_RATE + EXILE_TICK_RATE * ticks_in_exile as f64 + surcharge).min(1.0)
}

/// Resolve one mortality cause against a living character.
///
/// Total over every cause: deterministic causes always die, stochastic
/// ones roll here. The caller applies the outcome (terminal transition or
/// survivor wound) so that a character already dead this tick
/// short-circuits every later cause.
pub fn resolve(
    cause: &MortalityCause,
    character: &Character,
    tick: Tick,
    rng: &mut dyn RngCore,
) -> CauseOutcome {
    let name = &character.name;
    let age = character.age(tick);
    match cause {
        MortalityCause::Accident(kind) => {
            if rng.random_bool(accident_rate(*kind, age)) {
                CauseOutcome::death(format!("{name} died in a {kind} accident"))
            } else if rng.random_bool(0.30) {
                let severity = rng.random_range(20..=50);
                CauseOutcome::survived(
                    format!("{name} was injured in a {kind} accident"),
                    Some(severity),
                )
            } else {
                CauseOutcome::survived(format!("{name} escaped a {kind} accident unharmed"), None)
            }
        }
        MortalityCause::Disease(kind) => {
            if rng.random_bool(disease_rate(*kind, age)) {
                CauseOutcome::death(format!("{name} succumbed to {kind}"))
            } else {
                CauseOutcome::survived(format!("{name} recovered from {kind}"), None)
            }
        }
        MortalityCause::Poisoning => {
            let vigilance = character.traits.get(Trait::Vigilance);
            let detection = (vigilance as f64 / POISON_DETECTION_DIVISOR).min(POISON_DETECTION_CAP);
            if rng.random_bool(detection) {
                return CauseOutcome::survived(
                    format!("{name} detected poison before drinking"),
                    None,
                );
            }
            let lethality = rng.random_range(0.50..0.80);
            if rng.random_bool(lethality) {
                CauseOutcome::death(format!("{name} was poisoned"))
            } else {
                let severity = rng.random_range(30..=70);
                CauseOutcome::survived(
                    format!("{name} survived a poisoning attempt"),
                    Some(severity),
                )
            }
        }
        MortalityCause::Execution { method, crime } => {
            CauseOutcome::death(format!("{name} was executed by {method} for {crime}"))
        }
        MortalityCause::Exposure => {
            CauseOutcome::death(format!("{name} died of exposure in the cold"))
        }
        MortalityCause::Famine => CauseOutcome::death(format!("{name} starved in the famine")),
        MortalityCause::Disaster(kind) => {
            CauseOutcome::death(format!("{name} was killed in the {kind}"))
        }
        MortalityCause::ExileAttrition { ticks_in_exile } => {
            if rng.random_bool(exile_attrition_rate(*ticks_in_exile, age)) {
                CauseOutcome::death(format!("{name} perished in exile"))
            } else {
                CauseOutcome::survived(format!("{name} endures in exile"), None)
            }
        }
    }
}
