//! Orchestrator for running the systematic-literature-review pipeline.
//!
//! This crate wires the `Stage` registry, `ArtifactStore`, LLM drafter, and
//! provider registry into `Controller` — the stable facade every caller
//! (CLI, future HTTP/RPC wrappers) goes through. `Controller` owns nothing
//! stage-specific itself; it resolves which stage to run, checks the HITL
//! gate, invokes the stage, and persists whatever it returns.
//!
//! # Integration rule
//!
//! Outside this crate, use [`Controller`] for every production scenario.
//! It is the only thing that knows how to turn a resolved `Config` into a
//! running pipeline.

mod handle;
mod project_id;

pub use self::handle::{ApproveOutcome, Controller, ProjectSummary};
pub use self::project_id::new_project_id;
