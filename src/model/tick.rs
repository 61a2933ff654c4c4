use std::fmt;

use serde::{Deserialize, Serialize};

pub const TICKS_PER_YEAR: u64 = 12;

/// Discrete simulation time. One tick is one twelfth of a simulated year.
///
/// Natural `u64` ordering equals chronological ordering. Ages are always
/// derived from a birth tick and the current tick, never stored.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tick(u64);

impl Tick {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Tick at the start of the given simulated year.
    pub fn from_years(years: u64) -> Self {
        Self(years * TICKS_PER_YEAR)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn year(self) -> u64 {
        self.0 / TICKS_PER_YEAR
    }

    /// Month within the year (1–12).
    pub fn month(self) -> u64 {
        self.0 % TICKS_PER_YEAR + 1
    }

    /// Whole ticks elapsed since `earlier` (saturating: never negative).
    pub fn ticks_since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Whole years elapsed since `earlier`: `floor((self - earlier) / 12)`.
    pub fn years_since(self, earlier: Tick) -> u64 {
        self.ticks_since(earlier) / TICKS_PER_YEAR
    }

    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    pub fn advanced_by(self, ticks: u64) -> Tick {
        Tick(self.0 + ticks)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Y{}.M{}", self.year(), self.month())
    }
}
