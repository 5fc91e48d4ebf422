//! Diff (preview) result data model

use serde::Serialize;

use super::Outcome;

/// Planned action on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAction {
    Create,
    Update,
    Delete,
}

impl DiffAction {
    /// Coerce a raw action word onto the closed enumeration.
    ///
    /// Unrecognized words map to `Update`, the least surprising default for
    /// a planned change.
    pub fn coerce(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "create" | "created" | "creating" | "add" | "added" => DiffAction::Create,
            "delete" | "deleted" | "deleting" | "remove" | "removed" | "destroy"
            | "destroyed" => DiffAction::Delete,
            _ => DiffAction::Update,
        }
    }
}

/// One planned change from a diff/preview run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedChange {
    /// Resource type as printed by the CLI
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Logical resource name
    pub name: String,

    /// Planned action
    pub action: DiffAction,

    /// Extra detail text, when the CLI printed any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Canonical result of a diff (preview) operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    #[serde(flatten)]
    pub outcome: Outcome,

    /// Number of planned changes; always equals `changes.len()`
    pub planned_changes: usize,

    /// One-paragraph synopsis of the planned changes
    pub change_summary: String,

    /// Structured planned changes in output order
    pub changes: Vec<PlannedChange>,

    /// Verbatim change block, preserved for display
    pub diff_text: String,
}
