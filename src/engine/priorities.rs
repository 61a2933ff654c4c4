use serde::{Deserialize, Serialize};

use crate::model::macros::string_enum;
use crate::model::{Character, Role, TerritorySnapshot, Trait};

/// Food stock below this leaves the food-security priority unmet.
pub const FOOD_SECURITY_THRESHOLD: u32 = 30;
/// Military strength below this while at war leaves defense unmet.
pub const DEFENSE_THRESHOLD: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PriorityLevel {
    Critical,
    High,
    Medium,
    Low,
}

string_enum!(PriorityLevel {
    Critical => "critical",
    High => "high",
    Medium => "medium",
    Low => "low",
});

/// Everything a character can want. Closed so the narration layer can
/// match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PriorityGoal {
    // Universal survival tier.
    FoodSecurity,
    Shelter,
    Defense,
    // Role-table goals.
    MaintainPower,
    SecureSuccession,
    ExpandInfluence,
    ProveWorth,
    WinAllies,
    TrainTroops,
    WinGlory,
    CounselRuler,
    GatherKnowledge,
    PreserveKnowledge,
    UndermineRuler,
    AccumulateWealth,
    ExpandTrade,
    TendTheFaithful,
    SpreadFaith,
    ProvideForFamily,
    EarnCoin,
    // Rebel goals, synthesized from why the character turned.
    SeizePowerForSelf,
    RestoreJustice,
    FreeThePeople,
    Vengeance,
    AvoidCapture,
    GatherSupporters,
}

string_enum!(PriorityGoal {
    FoodSecurity => "food_security",
    Shelter => "shelter",
    Defense => "defense",
    MaintainPower => "maintain_power",
    SecureSuccession => "secure_succession",
    ExpandInfluence => "expand_influence",
    ProveWorth => "prove_worth",
    WinAllies => "win_allies",
    TrainTroops => "train_troops",
    WinGlory => "win_glory",
    CounselRuler => "counsel_ruler",
    GatherKnowledge => "gather_knowledge",
    PreserveKnowledge => "preserve_knowledge",
    UndermineRuler => "undermine_ruler",
    AccumulateWealth => "accumulate_wealth",
    ExpandTrade => "expand_trade",
    TendTheFaithful => "tend_the_faithful",
    SpreadFaith => "spread_faith",
    ProvideForFamily => "provide_for_family",
    EarnCoin => "earn_coin",
    SeizePowerForSelf => "seize_power_for_self",
    RestoreJustice => "restore_justice",
    FreeThePeople => "free_the_people",
    Vengeance => "vengeance",
    AvoidCapture => "avoid_capture",
    GatherSupporters => "gather_supporters",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub goal: PriorityGoal,
    pub level: PriorityLevel,
}

impl Priority {
    fn new(goal: PriorityGoal, level: PriorityLevel) -> Self {
        Self { goal, level }
    }
}

/// Whether a critical survival priority is currently satisfied. Only the
/// critical tier carries a satisfaction predicate.
fn critical_met(goal: PriorityGoal, snapshot: &TerritorySnapshot) -> bool {
    match goal {
        PriorityGoal::FoodSecurity => snapshot.food >= FOOD_SECURITY_THRESHOLD,
        PriorityGoal::Shelter => snapshot.shelter_capacity >= snapshot.population,
        PriorityGoal::Defense => !snapshot.at_war || snapshot.military >= DEFENSE_THRESHOLD,
        _ => true,
    }
}

/// Fixed high/medium goals per role. Rebel leaders never reach this table.
fn role_goals(role: Role) -> Vec<Priority> {
    use PriorityGoal::*;
    use PriorityLevel::*;
    let rows: &[(PriorityGoal, PriorityLevel)] = match role {
        Role::Ruler => &[(MaintainPower, High), (SecureSuccession, High), (ExpandInfluence, Medium)],
        Role::Heir => &[(ProveWorth, High), (WinAllies, Medium)],
        Role::General => &[(TrainTroops, High), (WinGlory, High), (ProveWorth, Medium)],
        Role::Advisor => &[(CounselRuler, High), (GatherKnowledge, Medium)],
        Role::Rival => &[(UndermineRuler, High), (ExpandInfluence, High), (WinAllies, Medium)],
        Role::Merchant => &[(AccumulateWealth, High), (ExpandTrade, Medium)],
        Role::Scholar => &[(GatherKnowledge, High), (PreserveKnowledge, Medium)],
        Role::Warrior => &[(WinGlory, High), (TrainTroops, Medium)],
        Role::Priest => &[(TendTheFaithful, High), (SpreadFaith, Medium)],
        Role::Commoner => &[(ProvideForFamily, High), (EarnCoin, Medium)],
        Role::RebelLeader => &[],
    };
    rows.iter().map(|&(g, l)| Priority::new(g, l)).collect()
}

/// Rebellion is an emergent condition, not a role with fixed motives: its
/// goals are reconstructed from why the character turned against the
/// ruling order.
fn rebel_goals(character: &Character) -> Vec<Priority> {
    use PriorityGoal::*;
    use PriorityLevel::*;
    let traits = &character.traits;
    let mut goals = Vec::new();
    if traits.get(Trait::Ambition) > 60 {
        goals.push(Priority::new(SeizePowerForSelf, High));
    }
    if traits.get(Trait::Honor) > 60 {
        goals.push(Priority::new(RestoreJustice, High));
    }
    if traits.get(Trait::Compassion) > 50 {
        goals.push(Priority::new(FreeThePeople, High));
    }
    if traits.get(Trait::Wrath) > 60 || traits.get(Trait::Loyalty) < 20 {
        goals.push(Priority::new(Vengeance, High));
    }
    goals.push(Priority::new(AvoidCapture, High));
    goals.push(Priority::new(GatherSupporters, Medium));
    goals
}

/// Ranked goals for a character: survival always dominates, so every list
/// is prefixed with the three universal critical priorities.
pub fn get_priorities(character: &Character, _snapshot: &TerritorySnapshot) -> Vec<Priority> {
    use PriorityGoal::*;
    use PriorityLevel::*;
    let mut priorities = vec![
        Priority::new(FoodSecurity, Critical),
        Priority::new(Shelter, Critical),
        Priority::new(Defense, Critical),
    ];
    if character.role == Role::RebelLeader {
        priorities.extend(rebel_goals(character));
    } else {
        priorities.extend(role_goals(character.role));
    }
    priorities
}

/// The first unmet critical priority, judged against the live snapshot;
/// failing that, the first high-level priority by rank alone. High goals
/// are not checked for satisfaction, only surfaced by rank.
pub fn most_urgent_priority(
    character: &Character,
    snapshot: &TerritorySnapshot,
) -> Option<Priority> {
    let priorities = get_priorities(character, snapshot);
    for p in &priorities {
        if p.level == PriorityLevel::Critical && !critical_met(p.goal, snapshot) {
            return Some(*p);
        }
    }
    priorities
        .into_iter()
        .find(|p| p.level == PriorityLevel::High)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tick;

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

    fn character(role: Role) -> Character {
        Character::new("Test", role, 1, Tick::new(0))
    }

    #[test]
    fn every_list_starts_with_the_survival_tier() {
        let snap = snapshot();
        for role in [Role::Ruler, Role::Commoner, Role::RebelLeader] {
            let ps = get_priorities(&character(role), &snap);
            assert_eq!(ps[0].goal, PriorityGoal::FoodSecurity);
            assert_eq!(ps[1].goal, PriorityGoal::Shelter);
            assert_eq!(ps[2].goal, PriorityGoal::Defense);
            assert!(ps[..3].iter().all(|p| p.level == PriorityLevel::Critical));
        }
    }

    #[test]
    fn food_shortage_dominates_everything() {
        let mut snap = snapshot();
        snap.food = 10;
        let urgent = most_urgent_priority(&character(Role::Ruler), &snap).unwrap();
        assert_eq!(urgent.goal, PriorityGoal::FoodSecurity);
    }

    #[test]
    fn shelter_shortfall_is_unmet() {
        let mut snap = snapshot();
        snap.shelter_capacity = 900;
        let urgent = most_urgent_priority(&character(Role::Merchant), &snap).unwrap();
        assert_eq!(urgent.goal, PriorityGoal::Shelter);
    }

    #[test]
    fn war_without_military_is_unmet() {
        let mut snap = snapshot();
        snap.at_war = true;
        snap.military = 5;
        let urgent = most_urgent_priority(&character(Role::Scholar), &snap).unwrap();
        assert_eq!(urgent.goal, PriorityGoal::Defense);
    }

    #[test]
    fn satisfied_criticals_fall_through_to_first_high() {
        let snap = snapshot();
        let urgent = most_urgent_priority(&character(Role::Ruler), &snap).unwrap();
        assert_eq!(urgent.goal, PriorityGoal::MaintainPower);
        assert_eq!(urgent.level, PriorityLevel::High);
    }

    #[test]
    fn ambitious_rebel_wants_the_throne() {
        let mut rebel = character(Role::RebelLeader);
        rebel.traits.set(Trait::Ambition, 80);
        let goals: Vec<_> = get_priorities(&rebel, &snapshot())
            .into_iter()
            .map(|p| p.goal)
            .collect();
        assert!(goals.contains(&PriorityGoal::SeizePowerForSelf));
    }

    #[test]
    fn honorable_rebel_wants_justice_not_power() {
        let mut rebel = character(Role::RebelLeader);
        rebel.traits.set(Trait::Ambition, 30);
        rebel.traits.set(Trait::Honor, 75);
        rebel.traits.set(Trait::Loyalty, 50);
        rebel.traits.set(Trait::Wrath, 20);
        let goals: Vec<_> = get_priorities(&rebel, &snapshot())
            .into_iter()
            .map(|p| p.goal)
            .collect();
        assert!(goals.contains(&PriorityGoal::RestoreJustice));
        assert!(!goals.contains(&PriorityGoal::SeizePowerForSelf));
        assert!(!goals.contains(&PriorityGoal::Vengeance));
    }

    #[test]
    fn betrayed_rebel_wants_vengeance() {
        let mut rebel = character(Role::RebelLeader);
        rebel.traits.set(Trait::Loyalty, 10);
        rebel.traits.set(Trait::Wrath, 30);
        let goals: Vec<_> = get_priorities(&rebel, &snapshot())
            .into_iter()
            .map(|p| p.goal)
            .collect();
        assert!(goals.contains(&PriorityGoal::Vengeance));
    }

    #[test]
    fn every_rebel_avoids_capture_and_gathers_supporters() {
        let rebel = character(Role::RebelLeader);
        let goals: Vec<_> = get_priorities(&rebel, &snapshot())
            .into_iter()
            .map(|p| p.goal)
            .collect();
        assert!(goals.contains(&PriorityGoal::AvoidCapture));
        assert!(goals.contains(&PriorityGoal::GatherSupporters));
    }
}
