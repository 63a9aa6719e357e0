//! Ports layer: Trait definitions for external operations.
//!
//! The scoring service is the only external collaborator; its contract is
//! defined here and implemented in `adapters::http`.

mod scoring;

pub use scoring::{ClientError, ScoringService};
