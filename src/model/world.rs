use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::id::IdGenerator;

use super::character::{Character, DeathRecord};
use super::event::{EngineEvent, EventKind, SuccessionEvent};
use super::role::Role;
use super::tick::Tick;

/// The character arena plus the narration and succession ledgers.
///
/// All characters live here forever, keyed by id; relationships between
/// them are plain id back-references. Deaths go through [`World::record_death`]
/// so the alive-exactly-until-death invariant has a single enforcement
/// point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    pub characters: BTreeMap<u64, Character>,
    pub events: Vec<EngineEvent>,
    pub successions: Vec<SuccessionEvent>,
    id_gen: IdGenerator,
    pub current_tick: Tick,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a character, assigning its id from the world's generator.
    pub fn add_character(&mut self, mut character: Character) -> u64 {
        let id = self.id_gen.next_id();
        character.id = id;
        self.characters.insert(id, character);
        id
    }

    pub fn character(&self, id: u64) -> Result<&Character, EngineError> {
        self.characters.get(&id).ok_or(EngineError::NotFound { id })
    }

    pub fn character_mut(&mut self, id: u64) -> Result<&mut Character, EngineError> {
        self.characters
            .get_mut(&id)
            .ok_or(EngineError::NotFound { id })
    }

    pub fn living(&self) -> impl Iterator<Item = &Character> {
        self.characters.values().filter(|c| c.is_alive())
    }

    /// Ids of living characters, for collect-then-apply passes that need
    /// to mutate while iterating.
    pub fn living_ids(&self) -> Vec<u64> {
        self.living().map(|c| c.id).collect()
    }

    pub fn living_with_role(&self, role: Role) -> impl Iterator<Item = &Character> {
        self.living().filter(move |c| c.role == role)
    }

    /// The living ruler of a territory, if one holds the throne.
    pub fn living_ruler(&self, territory_id: u64) -> Option<&Character> {
        self.living()
            .find(|c| c.role == Role::Ruler && c.territory_id == territory_id)
    }

    pub fn living_heir(&self, territory_id: u64) -> Option<&Character> {
        self.living()
            .find(|c| c.role == Role::Heir && c.territory_id == territory_id)
    }

    /// Living children of a character, in id order.
    pub fn living_children(&self, parent_id: u64) -> Vec<&Character> {
        self.living()
            .filter(|c| c.parent == Some(parent_id))
            .collect()
    }

    /// Append a narration record stamped with the current tick.
    pub fn record_event(&mut self, kind: EventKind, description: impl Into<String>) {
        let event = EngineEvent {
            id: self.id_gen.next_id(),
            tick: self.current_tick,
            kind,
            description: description.into(),
        };
        self.events.push(event);
    }

    /// The single terminal transition. Fails rather than overwrite an
    /// existing death record, so nothing can die twice.
    pub fn record_death(
        &mut self,
        id: u64,
        cause: impl Into<String>,
        tick: Tick,
    ) -> Result<(), EngineError> {
        let character = self
            .characters
            .get_mut(&id)
            .ok_or(EngineError::NotFound { id })?;
        if character.death.is_some() {
            return Err(EngineError::already_dead(id));
        }
        let cause = cause.into();
        character.death = Some(DeathRecord { tick, cause: cause.clone() });
        let name = character.name.clone();
        self.record_event(EventKind::Death, format!("{name} died: {cause}"));
        Ok(())
    }
}
