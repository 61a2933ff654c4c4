use rand::Rng;
use tracing::{debug, warn};

use crate::model::{
    Character, EventKind, Role, SkillMap, Tick, Trait, TraitVector, ADULT_AGE, ELDER_AGE,
    TICKS_PER_YEAR,
};
use crate::names;

use super::context::TickContext;
use super::mortality::MortalityCause;
use super::mutations;
use super::succession;
use super::wounds::{self, PassiveOutcome};

/// Fertile window for ruler and heir characters, in years.
const BIRTH_MIN_AGE: u64 = ADULT_AGE;
const BIRTH_MAX_AGE: u64 = 50;
/// A ruler with more living children than this stops having more.
const MAX_LIVING_CHILDREN: usize = 5;
/// Minimum ticks between births for the same parent.
const BIRTH_SPACING: u64 = 12;
const BIRTH_BASE_CHANCE: f64 = 0.02;
/// Full piety contributes this much extra birth chance.
const BIRTH_PIETY_BONUS: f64 = 0.01;

/// One-time wisdom grant on reaching elderhood.
const ELDER_WISDOM_BONUS: i16 = 10;

/// Base chance per tick of a rising star filling a vacant named role,
/// scaled down for small populations.
const RISING_STAR_CHANCE: f64 = 0.02;
const RISING_STAR_FULL_POPULATION: u32 = 1000;

/// Roles refilled from the population when vacant.
const REFILLED_ROLES: [Role; 4] = [Role::General, Role::Advisor, Role::Rival, Role::Priest];

/// Orchestrates aging, births, healing, attrition, and promotions for
/// one territory each tick, and resolves succession if the tick claimed
/// the ruler. The caller advances `world.current_tick` before invoking;
/// the engine only observes it.
#[derive(Debug, Default)]
pub struct LifecycleEngine;

impl LifecycleEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn tick(&self, ctx: &mut TickContext<'_>) {
        self.stage_transitions(ctx);
        self.wound_updates(ctx);
        self.exile_attrition(ctx);
        self.births(ctx);
        self.rising_stars(ctx);
        self.throne_vacancy(ctx);
    }

    /// A ruler death anywhere in this tick (untreated wounds, exile
    /// attrition, an earlier external kill) leaves the throne empty;
    /// succession resolves here so the one-living-ruler invariant holds
    /// when the tick returns.
    fn throne_vacancy(&self, ctx: &mut TickContext<'_>) {
        let territory = ctx.territory.id;
        if ctx.world.living_ruler(territory).is_some() {
            return;
        }
        let fallen = ctx
            .world
            .characters
            .values()
            .filter(|c| c.territory_id == territory && c.role == Role::Ruler)
            .filter_map(|c| c.death.as_ref().map(|d| (c.id, d.tick, d.cause.clone())))
            .max_by_key(|&(id, tick, _)| (tick, id));
        let Some((dead_ruler, _, cause)) = fallen else {
            return;
        };
        if let Err(err) = succession::resolve_succession(ctx, dead_ruler, &cause, None) {
            warn!(dead_ruler, territory, %err, "succession could not be resolved");
        }
    }

    /// Ids of living residents of the territory under tick.
    fn resident_ids(ctx: &TickContext<'_>) -> Vec<u64> {
        ctx.world
            .living()
            .filter(|c| c.territory_id == ctx.territory.id)
            .map(|c| c.id)
            .collect()
    }

    /// Life-stage boundaries, detected by the exact tick at which the
    /// derived age crosses them so each grant fires exactly once.
    fn stage_transitions(&self, ctx: &mut TickContext<'_>) {
        let now = ctx.world.current_tick;
        for id in Self::resident_ids(ctx) {
            let Ok(character) = ctx.world.character(id) else {
                continue;
            };
            let ticks_alive = now.ticks_since(character.born);
            if ticks_alive == ADULT_AGE * TICKS_PER_YEAR {
                let name = character.name.clone();
                ctx.world
                    .record_event(EventKind::ComingOfAge, format!("{name} came of age"));
                self.maybe_promote_to_heir(ctx, id);
            } else if ticks_alive == ELDER_AGE * TICKS_PER_YEAR {
                if let Ok(c) = ctx.world.character_mut(id) {
                    c.traits.apply_delta(Trait::Wisdom, ELDER_WISDOM_BONUS);
                }
            }
        }
    }

    /// A ruler's never-promoted biological child becomes heir on coming
    /// of age, provided the throne has no heir already.
    fn maybe_promote_to_heir(&self, ctx: &mut TickContext<'_>, id: u64) {
        let territory = ctx.territory.id;
        let Ok(character) = ctx.world.character(id) else {
            return;
        };
        if character.role != Role::Commoner {
            return;
        }
        let Some(parent_id) = character.parent else {
            return;
        };
        let ruler_is_parent = ctx
            .world
            .living_ruler(territory)
            .is_some_and(|r| r.id == parent_id);
        if !ruler_is_parent || ctx.world.living_heir(territory).is_some() {
            return;
        }
        let name = character.name.clone();
        if let Ok(c) = ctx.world.character_mut(id) {
            c.role = Role::Heir;
        }
        debug!(heir = id, territory, "ruler's child promoted to heir");
        ctx.world
            .record_event(EventKind::Promotion, format!("{name} was named heir"));
    }

    fn wound_updates(&self, ctx: &mut TickContext<'_>) {
        let now = ctx.world.current_tick;
        let wounded: Vec<u64> = ctx
            .world
            .living()
            .filter(|c| c.territory_id == ctx.territory.id && c.is_wounded())
            .map(|c| c.id)
            .collect();
        for id in wounded {
            let Ok(character) = ctx.world.character_mut(id) else {
                continue;
            };
            let name = character.name.clone();
            match wounds::passive_tick(character, now, ctx.rng) {
                Ok(PassiveOutcome::Died) => {
                    let _ = ctx.world.record_death(id, "untreated wounds", now);
                }
                Ok(PassiveOutcome::Healed) => {
                    ctx.world
                        .record_event(EventKind::Healed, format!("{name} recovered from their wounds"));
                }
                Ok(PassiveOutcome::Healing { .. }) | Err(_) => {}
            }
        }
    }

    fn exile_attrition(&self, ctx: &mut TickContext<'_>) {
        let now = ctx.world.current_tick;
        let exiled: Vec<(u64, u64)> = ctx
            .world
            .living()
            .filter(|c| c.territory_id == ctx.territory.id)
            .filter_map(|c| {
                c.exile
                    .as_ref()
                    .map(|e| (c.id, now.ticks_since(e.tick)))
            })
            .collect();
        for (id, ticks_in_exile) in exiled {
            let cause = MortalityCause::ExileAttrition { ticks_in_exile };
            let _ = mutations::resolve_mortality(ctx.world, id, &cause, ctx.rng);
        }
    }

    fn births(&self, ctx: &mut TickContext<'_>) {
        let now = ctx.world.current_tick;
        let piety = ctx
            .society
            .religion
            .as_ref()
            .map_or(0.0, |r| r.piety as f64 / 100.0);
        let chance = BIRTH_BASE_CHANCE + piety * BIRTH_PIETY_BONUS;

        let eligible: Vec<u64> = ctx
            .world
            .living()
            .filter(|c| c.territory_id == ctx.territory.id)
            .filter(|c| matches!(c.role, Role::Ruler | Role::Heir))
            .filter(|c| (BIRTH_MIN_AGE..=BIRTH_MAX_AGE).contains(&c.age(now)))
            .filter(|c| {
                c.last_birth
                    .is_none_or(|t| now.ticks_since(t) >= BIRTH_SPACING)
            })
            .map(|c| c.id)
            .collect();

        for parent_id in eligible {
            if ctx.world.living_children(parent_id).len() > MAX_LIVING_CHILDREN {
                continue;
            }
            if !ctx.rng.random_bool(chance) {
                continue;
            }
            let parent = match ctx.world.character(parent_id) {
                Ok(p) => p.clone(),
                Err(_) => continue,
            };
            let mut child = Character::new(
                names::person_name(ctx.rng),
                Role::Commoner,
                ctx.territory.id,
                now,
            );
            let base = TraitVector::generate(Role::Commoner, ctx.rng);
            child.traits = TraitVector::inherit(&base, &parent.traits, ctx.rng);
            child.skills = SkillMap::generate(
                Role::Commoner.social_class(),
                0,
                &[&parent.skills],
                &ctx.society.skill_averages,
                ctx.rng,
            );
            child.parent = Some(parent_id);
            child.dynasty = parent.dynasty.clone();
            child.dynasty_generation = parent.dynasty_generation + 1;
            let child_name = child.name.clone();
            ctx.world.add_character(child);
            if let Ok(p) = ctx.world.character_mut(parent_id) {
                p.last_birth = Some(now);
            }
            ctx.world.record_event(
                EventKind::Birth,
                format!("{child_name} was born to {}", parent.name),
            );
        }
    }

    /// Fill vacant named roles from the population. A living adult
    /// commoner is promoted when one exists; otherwise a fresh adult is
    /// synthesized. Priests only appear where a faith is active.
    fn rising_stars(&self, ctx: &mut TickContext<'_>) {
        if ctx.territory.population == 0 {
            return;
        }
        let scale =
            (ctx.territory.population.min(RISING_STAR_FULL_POPULATION) as f64)
                / RISING_STAR_FULL_POPULATION as f64;
        let chance = RISING_STAR_CHANCE * scale;
        let now = ctx.world.current_tick;

        for role in REFILLED_ROLES {
            if role == Role::Priest && ctx.society.religion.is_none() {
                continue;
            }
            let vacant = !ctx
                .world
                .living_with_role(role)
                .any(|c| c.territory_id == ctx.territory.id);
            if !vacant || !ctx.rng.random_bool(chance) {
                continue;
            }

            let candidates: Vec<u64> = ctx
                .world
                .living_with_role(Role::Commoner)
                .filter(|c| c.territory_id == ctx.territory.id && c.age(now) >= ADULT_AGE)
                .map(|c| c.id)
                .collect();
            if candidates.is_empty() {
                let age = ctx.rng.random_range(20..=40);
                let born = Tick::new(now.value().saturating_sub(age * TICKS_PER_YEAR));
                let mut star =
                    Character::new(names::person_name(ctx.rng), role, ctx.territory.id, born);
                star.traits = TraitVector::generate(role, ctx.rng);
                star.skills = SkillMap::generate(
                    role.social_class(),
                    age,
                    &[],
                    &ctx.society.skill_averages,
                    ctx.rng,
                );
                let name = star.name.clone();
                let id = ctx.world.add_character(star);
                debug!(id, ?role, "rising star synthesized");
                ctx.world.record_event(
                    EventKind::Promotion,
                    format!("{name} rose from the crowd to become {role}"),
                );
            } else {
                let id = candidates[ctx.rng.random_range(0..candidates.len())];
                let Ok(c) = ctx.world.character_mut(id) else {
                    continue;
                };
                c.role = role;
                c.traits.apply_role_bonus(role);
                let name = c.name.clone();
                debug!(id, ?role, "rising star promoted");
                ctx.world.record_event(
                    EventKind::Promotion,
                    format!("{name} was raised to {role}"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SocietyContext, TerritorySnapshot, World, Wound};
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

    fn run_one_tick(world: &mut World, rng: &mut SmallRng) {
        let snap = snapshot();
        let society = SocietyContext::default();
        let mut consequences = Vec::new();
        world.current_tick = world.current_tick.next();
        let mut ctx = TickContext::new(world, &snap, &society, rng, &mut consequences);
        LifecycleEngine::new().tick(&mut ctx);
    }

    fn person(role: Role, born: Tick) -> Character {
        Character::new("Someone", role, 1, born)
    }

    #[test]
    fn coming_of_age_fires_exactly_once() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut world = World::new();
        let born = Tick::new(5);
        world.current_tick = Tick::new(born.value() + ADULT_AGE * TICKS_PER_YEAR - 1);
        world.add_character(person(Role::Commoner, born));
        for _ in 0..3 {
            run_one_tick(&mut world, &mut rng);
        }
        let events: Vec<_> = world
            .events
            .iter()
            .filter(|e| e.kind == EventKind::ComingOfAge)
            .collect();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn rulers_child_becomes_heir_at_sixteen() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut world = World::new();
        let ruler_born = Tick::new(0);
        let mut ruler = person(Role::Ruler, ruler_born);
        ruler.dynasty = Some("House Ashford".to_string());
        let ruler_id = world.add_character(ruler);
        let child_born = Tick::from_years(40);
        let mut child = person(Role::Commoner, child_born);
        child.parent = Some(ruler_id);
        let child_id = world.add_character(child);
        world.current_tick = Tick::new(child_born.value() + ADULT_AGE * TICKS_PER_YEAR - 1);
        run_one_tick(&mut world, &mut rng);
        assert_eq!(world.character(child_id).unwrap().role, Role::Heir);
        assert_eq!(world.living_heir(1).unwrap().id, child_id);
    }

    #[test]
    fn unrelated_children_do_not_become_heir() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut world = World::new();
        world.add_character(person(Role::Ruler, Tick::new(0)));
        let child_born = Tick::from_years(40);
        let child_id = world.add_character(person(Role::Commoner, child_born));
        world.current_tick = Tick::new(child_born.value() + ADULT_AGE * TICKS_PER_YEAR - 1);
        run_one_tick(&mut world, &mut rng);
        assert_eq!(world.character(child_id).unwrap().role, Role::Commoner);
    }

    #[test]
    fn elder_wisdom_grant_is_one_time() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut world = World::new();
        let born = Tick::new(0);
        let id = world.add_character(person(Role::Scholar, born));
        let before = world.character(id).unwrap().traits.get(Trait::Wisdom);
        world.current_tick = Tick::new(ELDER_AGE * TICKS_PER_YEAR - 1);
        for _ in 0..5 {
            run_one_tick(&mut world, &mut rng);
        }
        let after = world.character(id).unwrap().traits.get(Trait::Wisdom);
        assert_eq!(after, before + 10);
    }

    #[test]
    fn wounded_characters_heal_over_time() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut world = World::new();
        let id = world.add_character(person(Role::Warrior, Tick::new(0)));
        world.current_tick = Tick::from_years(30);
        world.character_mut(id).unwrap().wound =
            Some(Wound::new(20, "duel", world.current_tick));
        for _ in 0..25 {
            run_one_tick(&mut world, &mut rng);
        }
        // 20 ticks of passive healing at 5/tick clears any low wound.
        assert!(!world.character(id).unwrap().is_wounded());
    }

    #[test]
    fn births_happen_for_rulers_over_many_ticks() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut world = World::new();
        let born = Tick::new(0);
        let mut ruler = person(Role::Ruler, born);
        ruler.dynasty = Some("House Greymont".to_string());
        ruler.dynasty_generation = 3;
        let ruler_id = world.add_character(ruler);
        world.current_tick = Tick::from_years(25);
        for _ in 0..300 {
            run_one_tick(&mut world, &mut rng);
        }
        let children = world.living_children(ruler_id);
        assert!(!children.is_empty(), "expected at least one birth in 300 ticks");
        let child = children[0];
        assert_eq!(child.dynasty.as_deref(), Some("House Greymont"));
        assert_eq!(child.dynasty_generation, 4);
        assert_eq!(child.parent, Some(ruler_id));
    }

    #[test]
    fn commoners_do_not_give_birth() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut world = World::new();
        let id = world.add_character(person(Role::Commoner, Tick::new(0)));
        world.current_tick = Tick::from_years(25);
        for _ in 0..300 {
            run_one_tick(&mut world, &mut rng);
        }
        assert!(world.living_children(id).is_empty());
    }

    #[test]
    fn vacancies_fill_eventually() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut world = World::new();
        world.add_character(person(Role::Ruler, Tick::new(0)));
        world.current_tick = Tick::from_years(25);
        for _ in 0..1000 {
            run_one_tick(&mut world, &mut rng);
        }
        assert!(world.living_with_role(Role::General).next().is_some());
        assert!(world.living_with_role(Role::Advisor).next().is_some());
    }

    #[test]
    fn no_priests_without_a_faith() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut world = World::new();
        world.add_character(person(Role::Ruler, Tick::new(0)));
        world.current_tick = Tick::from_years(25);
        for _ in 0..1000 {
            run_one_tick(&mut world, &mut rng);
        }
        assert!(world.living_with_role(Role::Priest).next().is_none());
    }
}
