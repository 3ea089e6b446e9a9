//! Gestalt layout engine.
//!
//! Converts unstructured content submissions (headings, paragraphs, lists,
//! images) plus declared design intent into a fully specified document
//! layout: a tree of pages or slides with positioned, styled elements, ready
//! for mechanical rendering into Word- or PowerPoint-like artifacts.
//!
//! The crate has two halves:
//!
//! - [`intake`] — the session lifecycle: creation with idempotent retries,
//!   content normalization, submission, and failure isolation, with storage
//!   injected through capability traits.
//! - [`layout`] — the rule-based generation pipeline: content grouping,
//!   template selection, typographic hierarchy via a modular scale,
//!   density-aware spacing, and design-quality scoring, producing the
//!   [`models::lsp::LayoutSpecificationPackage`].
//!
//! Transport, persistence technology, object storage, and binary rendering
//! are left to the embedding application.

pub mod config;
pub mod errors;
pub mod intake;
pub mod layout;
pub mod models;

pub use config::EngineConfig;
pub use errors::EngineError;
pub use intake::SessionService;
pub use layout::LayoutEngine;
