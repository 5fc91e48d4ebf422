//! Shared result fields and operation classification

use serde::Serialize;

/// Operation kinds the core can normalize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Deploy,
    Diff,
    Remove,
    Stage,
}

impl OperationKind {
    /// Parse a kind from its lowercase wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "deploy" => Some(OperationKind::Deploy),
            "diff" => Some(OperationKind::Diff),
            "remove" => Some(OperationKind::Remove),
            "stage" => Some(OperationKind::Stage),
            _ => None,
        }
    }

    /// Wire name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Deploy => "deploy",
            OperationKind::Diff => "diff",
            OperationKind::Remove => "remove",
            OperationKind::Stage => "stage",
        }
    }
}

/// Coarse outcome classification, distinct from the raw exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    /// Everything the operation attempted succeeded
    Complete,
    /// Some sub-items succeeded and others did not
    Partial,
    /// The operation failed outright
    Failed,
}

/// Fields shared by every operation result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Overall success, derived from the exit code and text failure markers
    pub success: bool,

    /// Which operation produced this result
    pub operation: OperationKind,

    /// Stage (environment name) the operation targeted
    pub stage: String,

    /// Application name, `"unknown"` when undiscoverable
    pub app: String,

    /// Captured CLI text, possibly truncated
    pub raw_output: String,

    /// Exit code reported by the CLI process
    pub exit_code: i32,

    /// Whether `raw_output` was clipped to the configured size limit
    pub truncated: bool,

    /// Coarse outcome classification
    pub completion_status: CompletionStatus,

    /// First error message found in the output, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Console permalink found in the output, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
}
