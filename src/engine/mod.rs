pub mod context;
pub mod lifecycle;
pub mod mortality;
pub mod mutations;
pub mod priorities;
pub mod succession;
pub mod wounds;

pub use context::TickContext;
pub use lifecycle::LifecycleEngine;
pub use mortality::{
    AccidentKind, CauseOutcome, DisasterKind, DiseaseKind, ExecutionMethod, MortalityCause,
};
pub use priorities::{get_priorities, most_urgent_priority, Priority, PriorityGoal, PriorityLevel};
pub use succession::resolve_succession;
pub use wounds::{MedicationOutcome, MedicationType, PassiveOutcome, WoundOutcome};
