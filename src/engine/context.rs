use rand::RngCore;

use crate::model::{Consequence, SocietyContext, TerritorySnapshot, World};

/// Everything a tick pass needs, bundled so system signatures stay flat.
///
/// The snapshot and society context are read-only inputs captured by the
/// caller; the consequence outbox is drained by the caller after the
/// tick and applied through the owning territory's transactional step.
pub struct TickContext<'a> {
    pub world: &'a mut World,
    pub territory: &'a TerritorySnapshot,
    pub society: &'a SocietyContext,
    pub rng: &'a mut dyn RngCore,
    pub consequences: &'a mut Vec<Consequence>,
}

impl<'a> TickContext<'a> {
    pub fn new(
        world: &'a mut World,
        territory: &'a TerritorySnapshot,
        society: &'a SocietyContext,
        rng: &'a mut dyn RngCore,
        consequences: &'a mut Vec<Consequence>,
    ) -> Self {
        Self {
            world,
            territory,
            society,
            rng,
            consequences,
        }
    }
}
