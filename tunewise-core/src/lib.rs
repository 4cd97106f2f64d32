//! Embeddable core library for tunewise.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking
//! into another host process.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`CatalogSource`](ports::CatalogSource): load the modification catalog
//! - [`Enricher`](ports::Enricher): optional free-text annotations
//! - [`WritePort`](ports::WritePort): write files and create directories
//!
//! The [`adapters`] module provides default implementations.
//!
//! # Entry points
//!
//! - [`run_recommend`](pipeline::run_recommend): validate, recommend, enrich
//! - [`write_report_artifacts`](pipeline::write_report_artifacts): persist a run
//! - [`InputValidator`](intake::InputValidator): check raw input and suggest makes/models

pub mod adapters;
pub mod enrich;
pub mod intake;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export the engine surface so callers don't need tunewise-domain directly.
pub use tunewise_domain::{Engine, EngineError, RecommendOptions, report_digest};
