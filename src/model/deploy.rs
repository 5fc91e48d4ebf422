//! Deploy result data model

use serde::Serialize;

use super::Outcome;

/// Final status of a deployed resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Created,
    Updated,
    Deleted,
}

impl ResourceStatus {
    /// Coerce a raw status word onto the closed enumeration.
    ///
    /// Unrecognized words map to `Created` so forward-drifting CLI output
    /// cannot crash the pipeline.
    pub fn coerce(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "updated" | "modified" | "changed" => ResourceStatus::Updated,
            "deleted" | "removed" | "destroyed" => ResourceStatus::Deleted,
            _ => ResourceStatus::Created,
        }
    }
}

/// Rough classification of a deployed endpoint URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlKind {
    Api,
    Web,
    Function,
    Other,
}

impl UrlKind {
    /// Classify a named output URL by its name and host.
    pub fn classify(name: &str, url: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name.contains("api") || url.contains("execute-api") {
            UrlKind::Api
        } else if name.contains("function") || name.contains("lambda") || name.contains("fn") {
            UrlKind::Function
        } else if name.contains("site") || name.contains("web") || name.contains("url") {
            UrlKind::Web
        } else {
            UrlKind::Other
        }
    }
}

/// A named endpoint URL reported at the end of a deploy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployedUrl {
    /// Output name as printed by the CLI
    pub name: String,

    /// The URL itself
    pub url: String,

    /// Classification of the endpoint
    #[serde(rename = "type")]
    pub kind: UrlKind,
}

/// A resource the deploy acted on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Resource type as printed by the CLI (e.g. `Function`, `Bucket`)
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Logical resource name
    pub name: String,

    /// Final status after the deploy
    pub status: ResourceStatus,
}

/// Canonical result of a deploy operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResult {
    #[serde(flatten)]
    pub outcome: Outcome,

    /// Number of resources whose final status was not `unchanged`
    pub resource_changes: usize,

    /// Endpoint URLs in first-seen order
    pub urls: Vec<DeployedUrl>,

    /// Acted-on resources in first-seen order, last observed status each
    pub resources: Vec<Resource>,
}
