//! Character mutation entry points exposed to external collaborators
//! (combat, plots, disasters, weather). Each returns a typed failure on
//! a missing or dead character and performs no mutation in that case.

use rand::RngCore;

use crate::error::EngineError;
use crate::model::{EventKind, Exile, World};

use super::mortality::{self, CauseOutcome, DisasterKind, ExecutionMethod, MortalityCause};
use super::wounds::{self, MedicationOutcome, MedicationType, WoundOutcome};

fn require_alive(world: &World, id: u64) -> Result<(), EngineError> {
    let character = world.character(id)?;
    if !character.is_alive() {
        return Err(EngineError::already_dead(id));
    }
    Ok(())
}

/// Inflict a wound from outside the engine (combat, plots). A grave
/// wound may kill outright; otherwise the character enters or deepens
/// the wounded state.
pub fn wound_character(
    world: &mut World,
    id: u64,
    severity: u8,
    cause: &str,
    rng: &mut dyn RngCore,
) -> Result<WoundOutcome, EngineError> {
    require_alive(world, id)?;
    let tick = world.current_tick;
    let character = world.character_mut(id)?;
    let outcome = wounds::inflict_wound(character, severity, cause, tick, rng);
    let name = character.name.clone();
    match &outcome {
        WoundOutcome::Died => {
            world.record_death(id, cause.to_string(), tick)?;
        }
        WoundOutcome::Wounded { severity } => {
            world.record_event(
                EventKind::Wounded,
                format!("{name} was wounded ({cause}), severity {severity}"),
            );
        }
    }
    Ok(outcome)
}

/// Administer medication to a wounded character.
pub fn apply_medication(
    world: &mut World,
    id: u64,
    medication: MedicationType,
    rng: &mut dyn RngCore,
) -> Result<MedicationOutcome, EngineError> {
    require_alive(world, id)?;
    let tick = world.current_tick;
    let character = world.character_mut(id)?;
    let name = character.name.clone();
    let outcome = wounds::apply_medication(character, medication, tick, rng)?;
    if outcome.died {
        world.record_death(id, "complications from treatment", tick)?;
        return Ok(outcome);
    }
    world.record_event(
        EventKind::Medication,
        format!("{name} received {medication} treatment"),
    );
    if let Some(effect) = &outcome.side_effect {
        world.record_event(
            EventKind::SideEffect,
            format!("{name} suffers {effect} from the treatment"),
        );
    }
    if outcome.healed {
        world.record_event(EventKind::Healed, format!("{name} recovered from their wounds"));
    }
    Ok(outcome)
}

/// Run one stochastic mortality cause against a character and apply the
/// result: terminal transition on death, survivor wound otherwise.
pub fn resolve_mortality(
    world: &mut World,
    id: u64,
    cause: &MortalityCause,
    rng: &mut dyn RngCore,
) -> Result<CauseOutcome, EngineError> {
    require_alive(world, id)?;
    let tick = world.current_tick;
    let outcome = {
        let character = world.character(id)?;
        mortality::resolve(cause, character, tick, rng)
    };
    if outcome.died {
        world.record_death(id, outcome.description.clone(), tick)?;
    } else if let Some(severity) = outcome.wound {
        // Survivor takes a wound; the grave-wound roll can still kill,
        // so the wound carries an injury phrase, not the survival line.
        let wound_cause = match cause {
            MortalityCause::Poisoning => "poisoning survived".to_string(),
            MortalityCause::Accident(kind) => format!("{kind} accident"),
            _ => outcome.description.clone(),
        };
        wound_character(world, id, severity, &wound_cause, rng)?;
    }
    Ok(outcome)
}

/// Kill with an arbitrary cause string decided by the caller.
pub fn kill_character(world: &mut World, id: u64, cause: &str) -> Result<(), EngineError> {
    let tick = world.current_tick;
    world.record_death(id, cause.to_string(), tick)
}

pub fn kill_from_famine(world: &mut World, id: u64) -> Result<(), EngineError> {
    kill_character(world, id, "starvation in the famine")
}

pub fn kill_from_exposure(world: &mut World, id: u64) -> Result<(), EngineError> {
    kill_character(world, id, "exposure to the elements")
}

pub fn kill_in_disaster(
    world: &mut World,
    id: u64,
    kind: DisasterKind,
) -> Result<(), EngineError> {
    kill_character(world, id, &format!("killed in the {kind}"))
}

/// Deterministic execution decided by political logic outside the engine.
pub fn execute_character(
    world: &mut World,
    id: u64,
    method: ExecutionMethod,
    crime: &str,
) -> Result<(), EngineError> {
    require_alive(world, id)?;
    let tick = world.current_tick;
    let name = world.character(id)?.name.clone();
    world.record_event(
        EventKind::Execution,
        format!("{name} was executed by {method} for {crime}"),
    );
    world.record_death(id, format!("executed by {method} for {crime}"), tick)
}

/// Banish a living character. Exile attrition takes over from here.
pub fn exile_character(world: &mut World, id: u64, reason: &str) -> Result<(), EngineError> {
    require_alive(world, id)?;
    let tick = world.current_tick;
    let character = world.character_mut(id)?;
    if character.is_exiled() {
        return Err(EngineError::invalid_state(format!(
            "character {id} is already exiled"
        )));
    }
    character.exile = Some(Exile {
        tick,
        reason: reason.to_string(),
    });
    let name = character.name.clone();
    world.record_event(EventKind::Exile, format!("{name} was exiled: {reason}"));
    Ok(())
}
