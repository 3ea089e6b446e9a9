// Intake subsystem: session lifecycle, content normalization, and the
// storage seams behind them.

pub mod normalizer;
pub mod service;
pub mod state_machine;
pub mod store;

// Re-export the public API consumed by embedders.
pub use service::SessionService;
pub use store::{
    IdempotencyRecord, IdempotencyStore, InMemoryIdempotencyStore, InMemorySessionStore,
    InMemorySpecificationStore, SessionStore, SpecificationStore,
};
