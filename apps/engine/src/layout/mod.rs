// Layout subsystem: Gestalt rule primitives, content grouping, template
// selection, element composition, and rationale scoring, orchestrated by
// `LayoutEngine`.

pub mod composer;
pub mod engine;
pub mod gestalt;
pub mod grouping;
pub mod rationale;
pub mod templates;

// Re-export the public API consumed by the intake service and embedders.
pub use engine::{proposal_id_for, LayoutEngine};
