//! Canonical result shapes
//!
//! UI- and transport-independent data structures describing the outcome of
//! one deployment CLI operation. Every shape serializes to flat JSON
//! (primitives, strings, arrays of flat records) per the output contract.

mod deploy;
mod diff;
mod outcome;
mod remove;
mod stage;

pub use deploy::{DeployResult, DeployedUrl, Resource, ResourceStatus, UrlKind};
pub use diff::{DiffAction, DiffResult, PlannedChange};
pub use outcome::{CompletionStatus, OperationKind, Outcome};
pub use remove::{RemoveResult, RemoveStatus, RemovedResource};
pub use stage::StageResult;

use serde::Serialize;

/// One of the four canonical operation results
///
/// Serialized untagged; the embedded `operation` field already names the
/// variant on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationResult {
    Deploy(DeployResult),
    Diff(DiffResult),
    Remove(RemoveResult),
    Stage(StageResult),
}

impl OperationResult {
    /// Access the shared base fields regardless of variant
    pub fn outcome(&self) -> &Outcome {
        match self {
            OperationResult::Deploy(r) => &r.outcome,
            OperationResult::Diff(r) => &r.outcome,
            OperationResult::Remove(r) => &r.outcome,
            OperationResult::Stage(r) => &r.outcome,
        }
    }

    /// Shorthand for `outcome().success`
    pub fn success(&self) -> bool {
        self.outcome().success
    }
}
