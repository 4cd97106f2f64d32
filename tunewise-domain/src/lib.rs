//! Deterministic recommendation engine.
//!
//! Stages run strictly in order, each consuming the previous stage's full output:
//! eligibility filter, scorer, compatibility resolver, report assembler.
//! Given identical inputs, `recommend` yields byte-identical reports.

pub mod assembler;
pub mod eligibility;
mod engine;
mod error;
pub mod resolver;
pub mod scorer;

pub use engine::{Engine, RecommendOptions, recommend, report_digest, report_id};
pub use error::EngineError;
pub use resolver::{Candidate, Resolution};
