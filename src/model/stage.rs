//! Stage computation result data model

use serde::Serialize;

use super::Outcome;

/// Canonical result of a stage-name computation
///
/// `raw_output` on the embedded outcome is a descriptive echo of the
/// decision, not CLI text; this operation never runs the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResult {
    #[serde(flatten)]
    pub outcome: Outcome,

    /// The derived, sanitized environment name
    pub computed_stage: String,

    /// Raw version-control ref the derivation consumed
    #[serde(rename = "ref")]
    pub git_ref: String,

    /// Triggering event kind (e.g. `push`, `pull_request`)
    pub event_name: String,

    /// Whether the trigger was a pull request
    pub is_pull_request: bool,
}
