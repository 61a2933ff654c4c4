//! Name generation for newborns, rising stars, and synthesized rulers.
//! Deterministic under a seeded RNG.

use rand::Rng;
use rand::RngCore;

const GIVEN_NAMES: &[&str] = &[
    "Aldric", "Berin", "Cedwyn", "Doria", "Edric", "Fenna", "Garrick", "Helena", "Isolde",
    "Joren", "Kestrel", "Lysa", "Maren", "Nerys", "Osric", "Petra", "Quill", "Rowena", "Sable",
    "Theron", "Una", "Vance", "Wrenna", "Yorick", "Zara",
];

const BYNAMES: &[&str] = &[
    "the Bold", "the Quiet", "of the Vale", "Ironhand", "the Younger", "Stormborn", "the Grey",
    "of the Marches", "Swiftfoot", "the Steady",
];

const DYNASTY_ROOTS: &[&str] = &[
    "Ash", "Black", "Corven", "Dun", "Ever", "Fal", "Grey", "Haver", "Karst", "Lor", "Mor",
    "North", "Oak", "Ravn", "Stone", "Thorn", "Vael", "Wyn",
];

const DYNASTY_SUFFIXES: &[&str] = &[
    "ford", "gard", "hall", "mere", "mont", "shaw", "stead", "wick", "wood", "worth",
];

fn pick<'a>(items: &'a [&'a str], rng: &mut dyn RngCore) -> &'a str {
    items[rng.random_range(0..items.len())]
}

/// A given name, occasionally with a byname.
pub fn person_name(rng: &mut dyn RngCore) -> String {
    let given = pick(GIVEN_NAMES, rng);
    if rng.random_bool(0.2) {
        format!("{given} {}", pick(BYNAMES, rng))
    } else {
        given.to_string()
    }
}

/// A house name for a new dynasty.
pub fn dynasty_name(rng: &mut dyn RngCore) -> String {
    format!("House {}{}", pick(DYNASTY_ROOTS, rng), pick(DYNASTY_SUFFIXES, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn names_are_deterministic_under_a_fixed_seed() {
        let a: Vec<String> = {
            let mut rng = SmallRng::seed_from_u64(77);
            (0..20).map(|_| person_name(&mut rng)).collect()
        };
        let b: Vec<String> = {
            let mut rng = SmallRng::seed_from_u64(77);
            (0..20).map(|_| person_name(&mut rng)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn dynasty_names_are_houses() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            assert!(dynasty_name(&mut rng).starts_with("House "));
        }
    }
}
