//! Stage name derivation
//!
//! Derives a normalized environment name from version-control ref/event
//! metadata. This runs independently of any CLI output: the `raw_output`
//! on the result is a descriptive echo of the decision taken.

use thiserror::Error;

use crate::model::{CompletionStatus, OperationKind, Outcome, StageResult};
use crate::truncate;

/// Default maximum length of a computed stage name
pub const DEFAULT_MAX_LENGTH: usize = 26;

/// Default prefix prepended when the sanitized name starts with a digit
pub const DEFAULT_DIGIT_PREFIX: &str = "pr-";

/// Errors from stage derivation
///
/// Never propagated to callers; [`derive_stage`] folds them into a failure
/// result. Silently inventing a stage name risks deploying to the wrong
/// environment, so the missing-candidate case is a real, reported failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StageError {
    #[error(
        "no usable stage name: ref '{git_ref}' yields no candidate and no fallback stage was available"
    )]
    NoCandidate { git_ref: String },
}

/// Inputs for one stage-name derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRequest {
    /// Triggering event kind (e.g. `push`, `pull_request`, `workflow_dispatch`)
    pub event_name: String,

    /// Raw ref (e.g. `refs/heads/main`, `refs/tags/v1.2.0`)
    pub git_ref: String,

    /// Source branch for pull-request events
    pub pr_branch: Option<String>,

    /// Whether the trigger was a pull request
    pub is_pull_request: bool,

    /// Caller-supplied stage used when no candidate can be derived
    pub fallback_stage: String,

    /// Whether falling back to `fallback_stage` is permitted; with `false`
    /// a missing candidate always fails
    pub allow_fallback: bool,

    /// Maximum length of the computed name
    pub max_length: usize,

    /// Prefix for names that would otherwise start with a digit
    pub digit_prefix: String,

    /// Byte limit applied to the descriptive `raw_output` echo
    pub max_output_size: Option<usize>,
}

impl StageRequest {
    /// Build a request with the default length, prefix, and fallback policy.
    pub fn new(event_name: impl Into<String>, git_ref: impl Into<String>) -> Self {
        let event_name = event_name.into();
        let is_pull_request = event_name.starts_with("pull_request");
        Self {
            event_name,
            git_ref: git_ref.into(),
            pr_branch: None,
            is_pull_request,
            fallback_stage: String::new(),
            allow_fallback: true,
            max_length: DEFAULT_MAX_LENGTH,
            digit_prefix: DEFAULT_DIGIT_PREFIX.to_string(),
            max_output_size: None,
        }
    }

    /// Set the pull-request source branch (marks the request as a PR)
    pub fn with_pr_branch(mut self, branch: impl Into<String>) -> Self {
        self.pr_branch = Some(branch.into());
        self.is_pull_request = true;
        self
    }

    /// Set the fallback stage
    pub fn with_fallback_stage(mut self, stage: impl Into<String>) -> Self {
        self.fallback_stage = stage.into();
        self
    }

    /// Allow or forbid the fallback stage
    pub fn with_allow_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = allow;
        self
    }

    /// Set the maximum computed-name length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the digit prefix
    pub fn with_digit_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.digit_prefix = prefix.into();
        self
    }

    /// Set the byte limit on the descriptive echo
    pub fn with_max_output_size(mut self, limit: usize) -> Self {
        self.max_output_size = Some(limit);
        self
    }
}

/// Derive a stage name from version-control context.
///
/// Never fails outward: the missing-candidate case produces a failure
/// result with `exit_code` 1 and a descriptive `error`.
pub fn derive_stage(req: &StageRequest) -> StageResult {
    match compute(req) {
        Ok((stage, echo)) => {
            let (raw_output, truncated) = truncate::clip(&echo, req.max_output_size);
            StageResult {
                outcome: Outcome {
                    success: true,
                    operation: OperationKind::Stage,
                    stage: stage.clone(),
                    app: "unknown".to_string(),
                    raw_output,
                    exit_code: 0,
                    truncated,
                    completion_status: CompletionStatus::Complete,
                    error: None,
                    permalink: None,
                },
                computed_stage: stage,
                git_ref: req.git_ref.clone(),
                event_name: req.event_name.clone(),
                is_pull_request: req.is_pull_request,
            }
        }
        Err(err) => {
            let message = err.to_string();
            let (raw_output, truncated) = truncate::clip(&message, req.max_output_size);
            StageResult {
                outcome: Outcome {
                    success: false,
                    operation: OperationKind::Stage,
                    stage: req.fallback_stage.clone(),
                    app: "unknown".to_string(),
                    raw_output,
                    exit_code: 1,
                    truncated,
                    completion_status: CompletionStatus::Failed,
                    error: Some(message),
                    permalink: None,
                },
                computed_stage: String::new(),
                git_ref: req.git_ref.clone(),
                event_name: req.event_name.clone(),
                is_pull_request: req.is_pull_request,
            }
        }
    }
}

/// Compute the stage name and its descriptive echo.
fn compute(req: &StageRequest) -> Result<(String, String), StageError> {
    let (candidate, source) = candidate(req);

    if let Some(raw) = candidate {
        let stage = sanitize(&raw, req.max_length, &req.digit_prefix);
        if !stage.is_empty() {
            let echo = format!("Computed stage '{stage}' from {source} '{raw}'");
            return Ok((stage, echo));
        }
    }

    let fallback = req.fallback_stage.trim();
    if req.allow_fallback && !fallback.is_empty() {
        let echo = format!("Using fallback stage '{fallback}': no usable ref candidate");
        return Ok((fallback.to_string(), echo));
    }

    Err(StageError::NoCandidate {
        git_ref: req.git_ref.clone(),
    })
}

/// Pick the raw candidate name and a label for the echo.
fn candidate(req: &StageRequest) -> (Option<String>, &'static str) {
    if req.is_pull_request
        && let Some(branch) = req.pr_branch.as_deref()
        && !branch.trim().is_empty()
    {
        return (Some(branch.trim().to_string()), "pull request branch");
    }

    let stripped = strip_ref_namespace(&req.git_ref);
    if stripped.trim().is_empty() {
        (None, "ref")
    } else {
        (Some(stripped.trim().to_string()), "ref")
    }
}

/// Strip the leading namespace segment from a full ref.
fn strip_ref_namespace(git_ref: &str) -> &str {
    git_ref
        .strip_prefix("refs/heads/")
        .or_else(|| git_ref.strip_prefix("refs/tags/"))
        .or_else(|| git_ref.strip_prefix("refs/"))
        .unwrap_or(git_ref)
}

/// Sanitize a raw candidate into a deployable stage name.
///
/// Lowercase; every run of characters outside `[a-z0-9-]` becomes a single
/// hyphen; repeated hyphens collapse; leading/trailing hyphens are stripped;
/// names starting with a digit gain `digit_prefix`; the result is truncated
/// to `max_length` and trailing hyphens from the cut are re-stripped.
/// Returns an empty string when nothing usable remains.
pub fn sanitize(raw: &str, max_length: usize, digit_prefix: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }

    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        return String::new();
    }

    let mut stage = if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{digit_prefix}{trimmed}")
    } else {
        trimmed.to_string()
    };

    // All-ASCII by construction, so byte truncation is safe
    stage.truncate(max_length);
    stage.trim_end_matches('-').to_string()
}
