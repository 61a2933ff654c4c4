//! Character lifecycle and succession engine for a territory-based
//! civilization simulator.
//!
//! The engine creates, ages, and kills characters, derives their
//! priorities from role and circumstance, runs the wound and mortality
//! state machines, and resolves ruler succession. Territory economics,
//! disasters, trade, and persistence are external collaborators that
//! exchange snapshots, mutation calls, and consequence records with it.

pub mod engine;
pub mod error;
pub mod flush;
pub mod id;
pub mod model;
pub mod names;
pub mod testutil;

pub use engine::{LifecycleEngine, TickContext};
pub use error::EngineError;
pub use model::{Character, World};
