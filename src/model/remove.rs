//! Remove (teardown) result data model

use serde::Serialize;

use super::Outcome;

/// Final status of a resource during teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoveStatus {
    Removed,
    Failed,
    Skipped,
}

impl RemoveStatus {
    /// Coerce a raw status word onto the closed enumeration.
    ///
    /// Unrecognized words map to `Failed`: claiming a resource was removed
    /// when the CLI said something we cannot read would be the worse lie.
    pub fn coerce(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "removed" | "deleted" | "destroyed" => RemoveStatus::Removed,
            "skipped" | "retained" | "unchanged" => RemoveStatus::Skipped,
            _ => RemoveStatus::Failed,
        }
    }
}

/// A resource the teardown acted on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedResource {
    /// Resource type as printed by the CLI
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Logical resource name
    pub name: String,

    /// Final status after the teardown
    pub status: RemoveStatus,
}

/// Canonical result of a remove (teardown) operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResult {
    #[serde(flatten)]
    pub outcome: Outcome,

    /// Count of resources with status `removed`
    pub resources_removed: usize,

    /// Acted-on resources in first-seen order, last observed status each
    pub removed_resources: Vec<RemovedResource>,

    /// Monetary savings figure scanned from the output, absent when the CLI
    /// printed none (absent and zero are distinct)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_status_coerce() {
        assert_eq!(RemoveStatus::coerce("Removed"), RemoveStatus::Removed);
        assert_eq!(RemoveStatus::coerce("deleted"), RemoveStatus::Removed);
        assert_eq!(RemoveStatus::coerce("skipped"), RemoveStatus::Skipped);
        // Unknown words fall back to Failed
        assert_eq!(RemoveStatus::coerce("pending"), RemoveStatus::Failed);
    }
}
