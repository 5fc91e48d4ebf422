//! Deployment CLI output parsing
//!
//! Scans the free-form text produced by the deployment CLI into raw,
//! operation-specific accumulations. Scanners never fail and never panic on
//! malformed input; canonicalization (defaults, enum coercion) happens in
//! [`crate::normalize`].

pub mod patterns;

mod deploy;
mod diff;
mod remove;

pub use deploy::DeployScan;
pub use diff::DiffScan;
pub use remove::RemoveScan;


/// Input contract handed over by the CLI-invocation collaborator
///
/// `raw_text` is the concatenation of stdout and stderr in arrival order,
/// possibly already clipped mid-line by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseInput {
    /// Captured CLI text
    pub raw_text: String,

    /// Stage the caller asked the CLI to target
    pub declared_stage: String,

    /// Exit code of the terminated CLI process
    pub exit_code: i32,

    /// Byte limit for the captured text carried into results
    pub max_output_size: Option<usize>,
}

impl ParseInput {
    /// Build an input with no size limit
    pub fn new(
        raw_text: impl Into<String>,
        declared_stage: impl Into<String>,
        exit_code: i32,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            declared_stage: declared_stage.into(),
            exit_code,
            max_output_size: None,
        }
    }

    /// Set the captured-output byte limit
    pub fn with_max_output_size(mut self, limit: usize) -> Self {
        self.max_output_size = Some(limit);
        self
    }
}

/// A resource as scanned, status kept as the raw lowercased word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedResource {
    pub resource_type: String,
    pub name: String,
    pub status: String,
}

/// A named output URL as scanned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedUrl {
    pub name: String,
    pub url: String,
}

/// Parser for deployment CLI output
pub struct Parser;

impl Parser {
    /// Track a resource action: same type+name updates the status in place
    /// (last observed wins), a new pair appends in first-seen order.
    fn track_resource(
        resources: &mut Vec<ScannedResource>,
        resource_type: String,
        name: String,
        status: String,
    ) {
        if let Some(existing) = resources
            .iter_mut()
            .find(|r| r.resource_type == resource_type && r.name == name)
        {
            existing.status = status;
        } else {
            resources.push(ScannedResource {
                resource_type,
                name,
                status,
            });
        }
    }
}
