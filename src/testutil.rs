//! Shared helpers for integration tests.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::engine::{LifecycleEngine, TickContext};
use crate::model::{
    Character, Consequence, Role, SocietyContext, TerritorySnapshot, Tick, TraitVector, World,
};

/// Seeded run parameters for deterministic simulations.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    pub seed: u64,
    pub ticks: u64,
}

pub fn snapshot(territory_id: u64) -> TerritorySnapshot {
    TerritorySnapshot {
        id: territory_id,
        population: 1000,
        food: 80,
        wealth: 200,
        happiness: 60,
        military: 50,
        knowledge: 30,
        shelter_capacity: 1200,
        at_war: false,
    }
}

/// Add a character of the given role and age, with traits generated
/// from a fixed seed so tests stay deterministic.
pub fn spawn(world: &mut World, name: &str, role: Role, territory_id: u64, age_years: u64) -> u64 {
    let born = Tick::new(
        world
            .current_tick
            .value()
            .saturating_sub(age_years * crate::model::TICKS_PER_YEAR),
    );
    let mut rng = SmallRng::seed_from_u64(world.current_tick.value() ^ age_years);
    let mut c = Character::new(name, role, territory_id, born);
    c.traits = TraitVector::generate(role, &mut rng);
    world.add_character(c)
}

/// Run the lifecycle engine for `config.ticks` ticks over one territory,
/// returning the consequences that crossed the boundary.
pub fn run_ticks(
    world: &mut World,
    territory: &TerritorySnapshot,
    society: &SocietyContext,
    config: SimConfig,
) -> Vec<Consequence> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut consequences = Vec::new();
    let engine = LifecycleEngine::new();
    for _ in 0..config.ticks {
        world.current_tick = world.current_tick.next();
        let mut ctx = TickContext::new(world, territory, society, &mut rng, &mut consequences);
        engine.tick(&mut ctx);
    }
    consequences
}
