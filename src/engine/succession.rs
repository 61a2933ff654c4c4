use rand::Rng;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::model::{
    Character, Consequence, EventKind, Legitimacy, Role, SkillMap, SuccessionEvent,
    SuccessionMode, Tick, Trait, TraitVector, TICKS_PER_YEAR,
};
use crate::names;

use super::context::TickContext;

/// An heir at or below this loyalty is a contested successor.
pub const HEIR_LOYALTY_THRESHOLD: u8 = 50;
/// Ambition above this makes a character a throne claimant.
pub const AMBITION_THRESHOLD: u8 = 60;
/// Each civil-war loser independently faces this death chance.
const LOSER_DEATH_CHANCE: f64 = 0.50;
/// Civil-war casualty range, a population-level abstraction.
const CASUALTY_RANGE: std::ops::Range<u32> = 500..1500;
/// Age of a ruler synthesized by election.
const ELECTED_RULER_AGE: u64 = 35;

/// Intensity of the grievance bond seeded by regicide.
const REGICIDE_GRIEVANCE: u8 = 90;

/// Resolve the succession after a ruler's death and restore the
/// one-living-ruler invariant for the territory.
///
/// The dead ruler may already carry a death record (the mortality path
/// usually writes it first); otherwise the terminal transition runs
/// here with the given cause.
pub fn resolve_succession(
    ctx: &mut TickContext<'_>,
    dead_ruler_id: u64,
    cause: &str,
    killer_territory: Option<u64>,
) -> Result<SuccessionEvent, EngineError> {
    let now = ctx.world.current_tick;
    let territory = ctx.territory.id;

    let dead = ctx.world.character(dead_ruler_id)?;
    if dead.role != Role::Ruler {
        return Err(EngineError::invalid_state(format!(
            "character {dead_ruler_id} is not a ruler"
        )));
    }
    if dead.is_alive() {
        ctx.world.record_death(dead_ruler_id, cause.to_string(), now)?;
    }
    let dead = ctx.world.character(dead_ruler_id)?.clone();

    if let Some(killer) = killer_territory {
        ctx.consequences.push(Consequence::GrievanceBond {
            aggrieved_territory: territory,
            target_territory: killer,
            intensity: REGICIDE_GRIEVANCE,
            hereditary: true,
        });
        ctx.consequences.push(Consequence::MemoryRecorded {
            territory_id: territory,
            about_territory: killer,
            sentiment: -80,
            text: format!("{} was murdered by agents of a rival land", dead.name),
        });
        ctx.consequences.push(Consequence::MemoryRecorded {
            territory_id: killer,
            about_territory: territory,
            sentiment: 40,
            text: format!("Our hand brought down {}", dead.name),
        });
    }

    write_obituary(ctx, &dead, now);

    let outcome = pick_successor(ctx, &dead, now)?;
    let event = SuccessionEvent {
        territory_id: territory,
        tick: now,
        dead_ruler: dead_ruler_id,
        new_ruler: outcome.new_ruler,
        mode: outcome.mode,
        legitimacy: outcome.legitimacy,
        casualties: outcome.casualties,
        narrative: outcome.narrative.clone(),
    };
    ctx.world
        .record_event(EventKind::Succession, outcome.narrative);
    ctx.world.successions.push(event.clone());
    ctx.consequences.push(Consequence::BondsCarriedOver {
        territory_id: territory,
        new_ruler: outcome.new_ruler,
    });

    let living_rulers = ctx
        .world
        .living_with_role(Role::Ruler)
        .filter(|c| c.territory_id == territory)
        .count();
    assert!(
        living_rulers == 1,
        "territory {territory} has {living_rulers} living rulers after succession"
    );
    Ok(event)
}

struct SuccessionOutcome {
    new_ruler: u64,
    mode: SuccessionMode,
    legitimacy: Legitimacy,
    casualties: Option<u32>,
    narrative: String,
}

/// Reign summary attached once to the dead ruler's record.
fn write_obituary(ctx: &mut TickContext<'_>, dead: &Character, now: Tick) {
    let reign_years = dead
        .crowned_at
        .map_or(0, |crowned| now.years_since(crowned));
    let cause = dead
        .death
        .as_ref()
        .map_or_else(|| "unknown causes".to_string(), |d| d.cause.clone());
    let text = format!(
        "{} ruled for {} year{} and died of {}",
        dead.name,
        reign_years,
        if reign_years == 1 { "" } else { "s" },
        cause
    );
    if let Ok(c) = ctx.world.character_mut(dead.id) {
        if c.obituary.is_none() {
            c.obituary = Some(text.clone());
        }
    }
    ctx.world.record_event(EventKind::Obituary, text);
}

fn pick_successor(
    ctx: &mut TickContext<'_>,
    dead: &Character,
    now: Tick,
) -> Result<SuccessionOutcome, EngineError> {
    let territory = ctx.territory.id;

    let heir = ctx.world.living_heir(territory).map(|h| (h.id, h.traits.get(Trait::Loyalty)));
    if let Some((heir_id, loyalty)) = heir {
        if loyalty > HEIR_LOYALTY_THRESHOLD {
            let name = crown(ctx, heir_id, dead, now)?;
            debug!(heir = heir_id, territory, "peaceful succession");
            return Ok(SuccessionOutcome {
                new_ruler: heir_id,
                mode: SuccessionMode::Peaceful,
                legitimacy: Legitimacy::Inheritance,
                casualties: None,
                narrative: format!("{name} succeeded {} in peace", dead.name),
            });
        }
    }

    let mut claimants: Vec<(u64, u16)> = ctx
        .world
        .living()
        .filter(|c| c.territory_id == territory && c.id != dead.id)
        .filter(|c| c.traits.get(Trait::Ambition) > AMBITION_THRESHOLD)
        .map(|c| {
            let strength =
                c.traits.get(Trait::Courage) as u16 + c.traits.get(Trait::Cunning) as u16;
            (c.id, strength)
        })
        .collect();

    if claimants.len() >= 2 {
        // Winner maximizes courage + cunning; ties go to the lowest id.
        claimants.sort_by_key(|&(id, strength)| (std::cmp::Reverse(strength), id));
        let (winner_id, _) = claimants[0];
        let mut deaths = 0u32;
        for &(loser_id, _) in &claimants[1..] {
            if ctx.rng.random_bool(LOSER_DEATH_CHANCE) {
                ctx.world
                    .record_death(loser_id, "killed in succession war", now)?;
                deaths += 1;
            }
        }
        let casualties = ctx.rng.random_range(CASUALTY_RANGE);
        let name = crown(ctx, winner_id, dead, now)?;
        if let Ok(c) = ctx.world.character_mut(winner_id) {
            c.title = Some("Lord Protector".to_string());
        }
        warn!(
            winner = winner_id,
            territory, casualties, deaths, "succession erupted into civil war"
        );
        ctx.world.record_event(
            EventKind::CivilWar,
            format!("Civil war over the succession of {}", dead.name),
        );
        return Ok(SuccessionOutcome {
            new_ruler: winner_id,
            mode: SuccessionMode::CivilWar,
            legitimacy: Legitimacy::Conquest,
            casualties: Some(casualties),
            narrative: format!(
                "{name} seized the throne as Lord Protector after a civil war that cost {casualties} lives"
            ),
        });
    }

    if let Some(&(claimant_id, _)) = claimants.first() {
        let name = crown(ctx, claimant_id, dead, now)?;
        if let Ok(c) = ctx.world.character_mut(claimant_id) {
            c.title = Some("Usurper".to_string());
        }
        debug!(usurper = claimant_id, territory, "coup succession");
        return Ok(SuccessionOutcome {
            new_ruler: claimant_id,
            mode: SuccessionMode::Coup,
            legitimacy: Legitimacy::Coup,
            casualties: None,
            narrative: format!("{name} took the throne of {} in a coup", dead.name),
        });
    }

    // An heir, even a disloyal one, outranks every no-heir outcome.
    if let Some((heir_id, _)) = heir {
        let name = crown(ctx, heir_id, dead, now)?;
        debug!(heir = heir_id, territory, "contested peaceful succession");
        return Ok(SuccessionOutcome {
            new_ruler: heir_id,
            mode: SuccessionMode::Peaceful,
            legitimacy: Legitimacy::Inheritance,
            casualties: None,
            narrative: format!(
                "{name} succeeded {} amid whispers of disloyalty",
                dead.name
            ),
        });
    }

    // Nobody left with a claim: the territory elects a fresh ruler.
    let born = Tick::new(now.value().saturating_sub(ELECTED_RULER_AGE * TICKS_PER_YEAR));
    let mut elected = Character::new(names::person_name(ctx.rng), Role::Ruler, territory, born);
    elected.traits = TraitVector::generate(Role::Ruler, ctx.rng);
    elected.skills = SkillMap::generate(
        Role::Ruler.social_class(),
        ELECTED_RULER_AGE,
        &[],
        &ctx.society.skill_averages,
        ctx.rng,
    );
    elected.dynasty = Some(names::dynasty_name(ctx.rng));
    elected.crowned_at = Some(now);
    let name = elected.name.clone();
    let elected_id = ctx.world.add_character(elected);
    debug!(elected = elected_id, territory, "election succession");
    Ok(SuccessionOutcome {
        new_ruler: elected_id,
        mode: SuccessionMode::Election,
        legitimacy: Legitimacy::Election,
        casualties: None,
        narrative: format!("With no claimant, {name} was elected to succeed {}", dead.name),
    })
}

/// Promote a character to ruler: role, inherited title, crown tick, and
/// the dynasty generation advanced past the dead ruler's.
fn crown(
    ctx: &mut TickContext<'_>,
    id: u64,
    dead: &Character,
    now: Tick,
) -> Result<String, EngineError> {
    let c = ctx.world.character_mut(id)?;
    c.role = Role::Ruler;
    c.crowned_at = Some(now);
    if c.title.is_none() {
        c.title = dead.title.clone();
    }
    if c.dynasty.is_none() {
        c.dynasty = dead.dynasty.clone();
    }
    c.dynasty_generation = dead.dynasty_generation + 1;
    c.deeds
        .record(now, format!("Took the throne after the death of {}", dead.name));
    Ok(c.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SocietyContext, TerritorySnapshot, World};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn snapshot() -> TerritorySnapshot {
        TerritorySnapshot {
            id: 1,
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

    fn ruler(world: &mut World) -> u64 {
        let mut r = Character::new("Osric", Role::Ruler, 1, Tick::new(0));
        r.dynasty = Some("House Thornwood".to_string());
        r.dynasty_generation = 2;
        r.crowned_at = Some(Tick::from_years(20));
        r.title = Some("King".to_string());
        world.add_character(r)
    }

    fn resolve(
        world: &mut World,
        dead: u64,
        killer: Option<u64>,
        seed: u64,
    ) -> (SuccessionEvent, Vec<Consequence>) {
        let snap = snapshot();
        let society = SocietyContext::default();
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut consequences = Vec::new();
        world.current_tick = Tick::from_years(45);
        let event = {
            let mut ctx =
                TickContext::new(world, &snap, &society, &mut rng, &mut consequences);
            resolve_succession(&mut ctx, dead, "poisoning", killer).unwrap()
        };
        (event, consequences)
    }

    #[test]
    fn loyal_heir_succeeds_peacefully() {
        let mut world = World::new();
        let ruler_id = ruler(&mut world);
        let mut heir = Character::new("Maren", Role::Heir, 1, Tick::from_years(20));
        heir.traits.set(Trait::Loyalty, 70);
        heir.parent = Some(ruler_id);
        heir.dynasty = Some("House Thornwood".to_string());
        heir.dynasty_generation = 3;
        let heir_id = world.add_character(heir);

        let (event, _) = resolve(&mut world, ruler_id, None, 1);
        assert_eq!(event.mode, SuccessionMode::Peaceful);
        assert_eq!(event.legitimacy, Legitimacy::Inheritance);
        assert_eq!(event.new_ruler, heir_id);
        let crowned = world.character(heir_id).unwrap();
        assert_eq!(crowned.role, Role::Ruler);
        // Generation advances exactly one past the dead ruler's.
        assert_eq!(crowned.dynasty_generation, 3);
        assert_eq!(crowned.title.as_deref(), Some("King"));
    }

    #[test]
    fn civil_war_winner_maximizes_courage_plus_cunning() {
        let mut world = World::new();
        let ruler_id = ruler(&mut world);
        let claimant_stats = [(65u8, 50u8, 40u8), (72, 60, 70), (80, 55, 50)];
        let mut ids = Vec::new();
        for (i, (ambition, courage, cunning)) in claimant_stats.into_iter().enumerate() {
            let mut c = Character::new(
                format!("Claimant {i}"),
                Role::Rival,
                1,
                Tick::from_years(15),
            );
            c.traits.set(Trait::Ambition, ambition);
            c.traits.set(Trait::Courage, courage);
            c.traits.set(Trait::Cunning, cunning);
            ids.push(world.add_character(c));
        }

        let (event, _) = resolve(&mut world, ruler_id, None, 2);
        assert_eq!(event.mode, SuccessionMode::CivilWar);
        assert_eq!(event.legitimacy, Legitimacy::Conquest);
        // 60 + 70 = 130 beats 90 and 105.
        assert_eq!(event.new_ruler, ids[1]);
        let casualties = event.casualties.unwrap();
        assert!((500..1500).contains(&casualties));
        let winner = world.character(ids[1]).unwrap();
        assert_eq!(winner.title.as_deref(), Some("Lord Protector"));
    }

    #[test]
    fn single_claimant_is_a_coup() {
        let mut world = World::new();
        let ruler_id = ruler(&mut world);
        let mut c = Character::new("Vance", Role::Advisor, 1, Tick::from_years(10));
        c.traits.set(Trait::Ambition, 85);
        let usurper_id = world.add_character(c);

        let (event, _) = resolve(&mut world, ruler_id, None, 3);
        assert_eq!(event.mode, SuccessionMode::Coup);
        assert_eq!(event.legitimacy, Legitimacy::Coup);
        assert_eq!(event.new_ruler, usurper_id);
        assert_eq!(
            world.character(usurper_id).unwrap().title.as_deref(),
            Some("Usurper")
        );
    }

    #[test]
    fn disloyal_heir_still_outranks_no_heir() {
        let mut world = World::new();
        let ruler_id = ruler(&mut world);
        let mut heir = Character::new("Joren", Role::Heir, 1, Tick::from_years(20));
        heir.traits.set(Trait::Loyalty, 20);
        heir.traits.set(Trait::Ambition, 10);
        let heir_id = world.add_character(heir);

        let (event, _) = resolve(&mut world, ruler_id, None, 4);
        assert_eq!(event.mode, SuccessionMode::Peaceful);
        assert_eq!(event.legitimacy, Legitimacy::Inheritance);
        assert_eq!(event.new_ruler, heir_id);
        assert!(event.narrative.contains("disloyalty"));
    }

    #[test]
    fn empty_court_elects_a_fresh_ruler() {
        let mut world = World::new();
        let ruler_id = ruler(&mut world);
        let (event, _) = resolve(&mut world, ruler_id, None, 5);
        assert_eq!(event.mode, SuccessionMode::Election);
        assert_eq!(event.legitimacy, Legitimacy::Election);
        let elected = world.character(event.new_ruler).unwrap();
        assert_eq!(elected.role, Role::Ruler);
        assert_eq!(elected.age(world.current_tick), 35);
    }

    #[test]
    fn exactly_one_living_ruler_after_every_configuration() {
        for seed in 0..20 {
            let mut world = World::new();
            let ruler_id = ruler(&mut world);
            // A crowd of claimants with varying ambition.
            for i in 0..4u8 {
                let mut c = Character::new(
                    format!("Noble {i}"),
                    Role::Rival,
                    1,
                    Tick::from_years(12),
                );
                c.traits.set(Trait::Ambition, 50 + i * 10);
                world.add_character(c);
            }
            let (event, _) = resolve(&mut world, ruler_id, None, seed);
            let rulers: Vec<_> = world
                .living_with_role(Role::Ruler)
                .filter(|c| c.territory_id == 1)
                .collect();
            assert_eq!(rulers.len(), 1);
            assert_eq!(rulers[0].id, event.new_ruler);
        }
    }

    #[test]
    fn regicide_seeds_grievance_and_opposed_memories() {
        let mut world = World::new();
        let ruler_id = ruler(&mut world);
        let (_, consequences) = resolve(&mut world, ruler_id, Some(7), 6);
        assert!(consequences.iter().any(|c| matches!(
            c,
            Consequence::GrievanceBond {
                aggrieved_territory: 1,
                target_territory: 7,
                hereditary: true,
                ..
            }
        )));
        let memories: Vec<_> = consequences
            .iter()
            .filter_map(|c| match c {
                Consequence::MemoryRecorded { sentiment, .. } => Some(*sentiment),
                _ => None,
            })
            .collect();
        assert_eq!(memories.len(), 2);
        assert!(memories.iter().any(|&s| s < 0));
        assert!(memories.iter().any(|&s| s > 0));
    }

    #[test]
    fn bonds_carry_over_to_the_new_ruler() {
        let mut world = World::new();
        let ruler_id = ruler(&mut world);
        let (event, consequences) = resolve(&mut world, ruler_id, None, 7);
        assert!(consequences.iter().any(|c| matches!(
            c,
            Consequence::BondsCarriedOver { territory_id: 1, new_ruler } if *new_ruler == event.new_ruler
        )));
    }

    #[test]
    fn obituary_summarizes_the_reign() {
        let mut world = World::new();
        let ruler_id = ruler(&mut world);
        resolve(&mut world, ruler_id, None, 8);
        let dead = world.character(ruler_id).unwrap();
        let obituary = dead.obituary.as_ref().unwrap();
        // Crowned year 20, died year 45.
        assert!(obituary.contains("25 years"), "obituary: {obituary}");
        assert!(obituary.contains("poisoning"));
    }

    #[test]
    fn succession_for_a_non_ruler_is_invalid() {
        let mut world = World::new();
        ruler(&mut world);
        let commoner = world.add_character(Character::new(
            "Berin",
            Role::Commoner,
            1,
            Tick::new(0),
        ));
        let snap = snapshot();
        let society = SocietyContext::default();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut consequences = Vec::new();
        let mut ctx = TickContext::new(&mut world, &snap, &society, &mut rng, &mut consequences);
        let err = resolve_succession(&mut ctx, commoner, "poisoning", None);
        assert!(matches!(err, Err(EngineError::InvalidState { .. })));
    }
}
