//! Result normalization and dispatch
//!
//! The one boundary between raw scans and the canonical result shapes.
//! Parsers are invoked through a common dispatch keyed by operation kind;
//! this module fills defaults (`app: "unknown"`, empty lists), coerces
//! status/action words onto the closed enumerations, and contains panics:
//! no code path here returns an error or unwinds into the caller.

use std::panic::{self, AssertUnwindSafe};

use crate::model::{
    CompletionStatus, DeployResult, DeployedUrl, DiffAction, DiffResult, OperationKind,
    OperationResult, Outcome, PlannedChange, RemoveResult, RemoveStatus, RemovedResource,
    Resource, ResourceStatus, StageResult, UrlKind,
};
use crate::parse::{ParseInput, Parser};
use crate::stage::{self, StageRequest};
use crate::truncate;

/// Parse captured CLI output for the given operation kind.
///
/// For [`OperationKind::Stage`] this degrades to a fallback-only derivation
/// (the declared stage with no ref context); callers with real
/// version-control context should use [`compute_stage`] instead.
pub fn parse_operation(kind: OperationKind, input: &ParseInput) -> OperationResult {
    let parsed = panic::catch_unwind(AssertUnwindSafe(|| match kind {
        OperationKind::Deploy => OperationResult::Deploy(normalize_deploy(input)),
        OperationKind::Diff => OperationResult::Diff(normalize_diff(input)),
        OperationKind::Remove => OperationResult::Remove(normalize_remove(input)),
        OperationKind::Stage => {
            let req = StageRequest::new("", "")
                .with_fallback_stage(input.declared_stage.clone());
            let req = match input.max_output_size {
                Some(limit) => req.with_max_output_size(limit),
                None => req,
            };
            OperationResult::Stage(stage::derive_stage(&req))
        }
    }));

    match parsed {
        Ok(result) => result,
        Err(payload) => failure_result(kind, input, panic_message(payload)),
    }
}

/// Derive a stage name from full version-control context.
///
/// Thin wrapper over [`stage::derive_stage`] kept here so every operation
/// kind enters through the same panic-contained boundary.
pub fn compute_stage(req: &StageRequest) -> StageResult {
    let derived = panic::catch_unwind(AssertUnwindSafe(|| stage::derive_stage(req)));
    match derived {
        Ok(result) => result,
        Err(payload) => {
            let input = ParseInput::new("", req.fallback_stage.clone(), 1);
            match failure_result(OperationKind::Stage, &input, panic_message(payload)) {
                OperationResult::Stage(result) => result,
                // failure_result always returns the requested kind
                _ => unreachable!(),
            }
        }
    }
}

/// Overall success: the exit code is authoritative unless the text carries
/// unambiguous failure markers despite exit 0 (the CLI can exit 0 on
/// partial failure).
fn derive_success(exit_code: i32, saw_failure_marker: bool) -> bool {
    exit_code == 0 && !saw_failure_marker
}

fn normalize_deploy(input: &ParseInput) -> DeployResult {
    let (raw_output, truncated) = truncate::clip(&input.raw_text, input.max_output_size);
    let scan = Parser::scan_deploy(&raw_output);

    let success = derive_success(input.exit_code, scan.saw_failure_marker);
    let completion_status = if !success {
        CompletionStatus::Failed
    } else if scan.saw_success_marker && scan.any_resource_failed() {
        CompletionStatus::Partial
    } else {
        CompletionStatus::Complete
    };

    let resources: Vec<Resource> = scan
        .resources
        .iter()
        .filter(|r| r.status != "unchanged")
        .map(|r| Resource {
            resource_type: r.resource_type.clone(),
            name: r.name.clone(),
            status: ResourceStatus::coerce(&r.status),
        })
        .collect();

    let urls: Vec<DeployedUrl> = scan
        .urls
        .iter()
        .map(|u| DeployedUrl {
            kind: UrlKind::classify(&u.name, &u.url),
            name: u.name.clone(),
            url: u.url.clone(),
        })
        .collect();

    DeployResult {
        outcome: Outcome {
            success,
            operation: OperationKind::Deploy,
            stage: scan
                .stage
                .clone()
                .unwrap_or_else(|| input.declared_stage.clone()),
            app: scan.app.clone().unwrap_or_else(|| "unknown".to_string()),
            raw_output,
            exit_code: input.exit_code,
            truncated,
            completion_status,
            error: scan.first_error.clone(),
            permalink: scan.permalink.clone(),
        },
        resource_changes: resources.len(),
        urls,
        resources,
    }
}

fn normalize_diff(input: &ParseInput) -> DiffResult {
    let (raw_output, truncated) = truncate::clip(&input.raw_text, input.max_output_size);
    let scan = Parser::scan_diff(&raw_output);

    let success = derive_success(input.exit_code, scan.saw_failure_marker);
    let completion_status = if success {
        CompletionStatus::Complete
    } else {
        CompletionStatus::Failed
    };

    let changes: Vec<PlannedChange> = scan
        .changes
        .iter()
        .map(|c| PlannedChange {
            resource_type: c.resource_type.clone(),
            name: c.name.clone(),
            action: DiffAction::coerce(&c.status),
            details: None,
        })
        .collect();

    let change_summary = summarize_changes(&changes, scan.cost_line.as_deref());

    DiffResult {
        outcome: Outcome {
            success,
            operation: OperationKind::Diff,
            stage: scan
                .stage
                .clone()
                .unwrap_or_else(|| input.declared_stage.clone()),
            app: scan.app.clone().unwrap_or_else(|| "unknown".to_string()),
            raw_output,
            exit_code: input.exit_code,
            truncated,
            completion_status,
            error: scan.first_error.clone(),
            permalink: scan.permalink.clone(),
        },
        planned_changes: changes.len(),
        change_summary,
        changes,
        diff_text: scan.diff_text,
    }
}

/// Synthesize the count-based summary sentence, appending the source text's
/// own cost line when one was present.
fn summarize_changes(changes: &[PlannedChange], cost_line: Option<&str>) -> String {
    let mut summary = if changes.is_empty() {
        "No changes detected".to_string()
    } else {
        let creations = changes.iter().filter(|c| c.action == DiffAction::Create).count();
        let updates = changes.iter().filter(|c| c.action == DiffAction::Update).count();
        let deletions = changes.iter().filter(|c| c.action == DiffAction::Delete).count();
        format!(
            "Found {} planned changes: {creations} creation(s), {updates} update(s), {deletions} deletion(s)",
            changes.len()
        )
    };

    if let Some(line) = cost_line {
        summary.push_str(". ");
        summary.push_str(line);
    }
    summary
}

fn normalize_remove(input: &ParseInput) -> RemoveResult {
    let (raw_output, truncated) = truncate::clip(&input.raw_text, input.max_output_size);
    let scan = Parser::scan_remove(&raw_output);

    let removed_resources: Vec<RemovedResource> = scan
        .resources
        .iter()
        .map(|r| RemovedResource {
            resource_type: r.resource_type.clone(),
            name: r.name.clone(),
            status: RemoveStatus::coerce(&r.status),
        })
        .collect();

    let removed_count = removed_resources
        .iter()
        .filter(|r| r.status == RemoveStatus::Removed)
        .count();

    let success = derive_success(input.exit_code, scan.saw_failure_marker);
    let completion_status = if !success {
        CompletionStatus::Failed
    } else if removed_resources.is_empty() {
        CompletionStatus::Complete
    } else if removed_count == removed_resources.len() {
        CompletionStatus::Complete
    } else if removed_count > 0 {
        CompletionStatus::Partial
    } else {
        // Nonzero attempted set, nothing removed
        CompletionStatus::Failed
    };

    RemoveResult {
        outcome: Outcome {
            success,
            operation: OperationKind::Remove,
            stage: scan
                .stage
                .clone()
                .unwrap_or_else(|| input.declared_stage.clone()),
            app: scan.app.clone().unwrap_or_else(|| "unknown".to_string()),
            raw_output,
            exit_code: input.exit_code,
            truncated,
            completion_status,
            error: scan.first_error.clone(),
            permalink: scan.permalink.clone(),
        },
        resources_removed: removed_count,
        removed_resources,
        savings: scan.savings,
    }
}

/// Build the all-counts-zero failure result for a contained panic.
fn failure_result(kind: OperationKind, input: &ParseInput, message: String) -> OperationResult {
    let (raw_output, truncated) = truncate::clip(&input.raw_text, input.max_output_size);
    let outcome = Outcome {
        success: false,
        operation: kind,
        stage: input.declared_stage.clone(),
        app: "unknown".to_string(),
        raw_output,
        exit_code: 1,
        truncated,
        completion_status: CompletionStatus::Failed,
        error: Some(message),
        permalink: None,
    };

    match kind {
        OperationKind::Deploy => OperationResult::Deploy(DeployResult {
            outcome,
            resource_changes: 0,
            urls: Vec::new(),
            resources: Vec::new(),
        }),
        OperationKind::Diff => OperationResult::Diff(DiffResult {
            outcome,
            planned_changes: 0,
            change_summary: "No changes detected".to_string(),
            changes: Vec::new(),
            diff_text: String::new(),
        }),
        OperationKind::Remove => OperationResult::Remove(RemoveResult {
            outcome,
            resources_removed: 0,
            removed_resources: Vec::new(),
            savings: None,
        }),
        OperationKind::Stage => OperationResult::Stage(StageResult {
            git_ref: String::new(),
            event_name: String::new(),
            is_pull_request: false,
            computed_stage: String::new(),
            outcome,
        }),
    }
}

/// Extract a human-readable message from a panic payload.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "internal parser error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deploy(input: &ParseInput) -> DeployResult {
        match parse_operation(OperationKind::Deploy, input) {
            OperationResult::Deploy(r) => r,
            other => panic!("expected deploy result, got {other:?}"),
        }
    }

    fn diff(input: &ParseInput) -> DiffResult {
        match parse_operation(OperationKind::Diff, input) {
            OperationResult::Diff(r) => r,
            other => panic!("expected diff result, got {other:?}"),
        }
    }

    fn remove(input: &ParseInput) -> RemoveResult {
        match parse_operation(OperationKind::Remove, input) {
            OperationResult::Remove(r) => r,
            other => panic!("expected remove result, got {other:?}"),
        }
    }

    #[test]
    fn test_deploy_created_and_complete() {
        let input = ParseInput::new("| Created Function my-fn\n✓ Complete\n", "dev", 0);
        let result = deploy(&input);

        assert!(result.outcome.success);
        assert_eq!(result.outcome.completion_status, CompletionStatus::Complete);
        assert_eq!(result.resource_changes, 1);
        assert_eq!(
            result.resources,
            vec![Resource {
                resource_type: "Function".to_string(),
                name: "my-fn".to_string(),
                status: ResourceStatus::Created,
            }]
        );
    }

    #[test]
    fn test_deploy_empty_text_mirrors_exit_code() {
        let ok = deploy(&ParseInput::new("", "dev", 0));
        assert!(ok.outcome.success);
        assert_eq!(ok.resource_changes, 0);
        assert!(ok.outcome.error.is_none());

        let bad = deploy(&ParseInput::new("", "dev", 1));
        assert!(!bad.outcome.success);
        assert_eq!(bad.outcome.completion_status, CompletionStatus::Failed);
    }

    #[test]
    fn test_deploy_error_banner_beats_zero_exit() {
        let input = ParseInput::new("Error: stack rolled back\n", "dev", 0);
        let result = deploy(&input);
        assert!(!result.outcome.success);
        assert_eq!(result.outcome.completion_status, CompletionStatus::Failed);
        assert_eq!(
            result.outcome.error.as_deref(),
            Some("stack rolled back")
        );
    }

    #[test]
    fn test_deploy_partial_on_failed_resource() {
        let text = "| Created Function a\n| Failed Function b\n✓ Complete\n";
        let result = deploy(&ParseInput::new(text, "dev", 0));
        assert!(result.outcome.success);
        assert_eq!(result.outcome.completion_status, CompletionStatus::Partial);
    }

    #[test]
    fn test_deploy_last_status_wins_and_unchanged_excluded() {
        let text = "| Creating Function a\n| Updated Function a\n| Unchanged Bucket b\n";
        let result = deploy(&ParseInput::new(text, "dev", 0));
        assert_eq!(result.resource_changes, 1);
        assert_eq!(result.resources[0].status, ResourceStatus::Updated);
    }

    #[test]
    fn test_deploy_truncation_flag() {
        let text = "App: my-app\nStage: dev\n✓ Complete\n";
        let result = deploy(&ParseInput::new(text, "dev", 0).with_max_output_size(20));
        assert!(result.outcome.truncated);
        assert_eq!(result.outcome.raw_output.len(), 20);
    }

    #[test]
    fn test_diff_no_changes_literal_summary() {
        let input = ParseInput::new("some noise\nmore noise\n", "dev", 0);
        let result = diff(&input);
        assert_eq!(result.planned_changes, 0);
        assert_eq!(result.change_summary, "No changes detected");
    }

    #[test]
    fn test_diff_counts_and_summary() {
        let text = "✓  Generated\n+ Created Function a\n* Updated Bucket b\n- Deleted Queue c\n";
        let result = diff(&ParseInput::new(text, "dev", 0));
        assert_eq!(result.planned_changes, 3);
        assert_eq!(result.planned_changes, result.changes.len());
        assert_eq!(
            result.change_summary,
            "Found 3 planned changes: 1 creation(s), 1 update(s), 1 deletion(s)"
        );
    }

    #[test]
    fn test_diff_appends_cost_line() {
        let text = "✓  Generated\n- Deleted Queue c\nMonthly savings: $4.20\n";
        let result = diff(&ParseInput::new(text, "dev", 0));
        assert_eq!(
            result.change_summary,
            "Found 1 planned changes: 0 creation(s), 0 update(s), 1 deletion(s). Monthly savings: $4.20"
        );
    }

    #[test]
    fn test_diff_verbatim_block() {
        let text = "App: my-app\n✓  Generated\n+ Created Function a\ndone\n";
        let result = diff(&ParseInput::new(text, "dev", 0));
        assert_eq!(result.diff_text, "+ Created Function a\ndone");
    }

    #[test]
    fn test_remove_partial_mix() {
        let text = "| Removed Function a\n| Removed Bucket b\n| Failed Queue c\n";
        let result = remove(&ParseInput::new(text, "dev", 0));
        assert!(result.outcome.success);
        assert_eq!(result.resources_removed, 2);
        assert_eq!(result.outcome.completion_status, CompletionStatus::Partial);
    }

    #[test]
    fn test_remove_all_removed_complete() {
        let text = "| Removed Function a\n| Removed Bucket b\n";
        let result = remove(&ParseInput::new(text, "dev", 0));
        assert_eq!(result.resources_removed, 2);
        assert_eq!(result.outcome.completion_status, CompletionStatus::Complete);
    }

    #[test]
    fn test_remove_none_removed_is_failed() {
        let text = "| Failed Function a\n| Skipped Bucket b\n";
        let result = remove(&ParseInput::new(text, "dev", 0));
        assert_eq!(result.resources_removed, 0);
        assert_eq!(result.outcome.completion_status, CompletionStatus::Failed);
    }

    #[test]
    fn test_remove_savings_absent_vs_present() {
        let none = remove(&ParseInput::new("| Removed Function a\n", "dev", 0));
        assert_eq!(none.savings, None);

        let some = remove(&ParseInput::new(
            "| Removed Function a\nMonthly savings: $12.34\n",
            "dev",
            0,
        ));
        assert_eq!(some.savings.as_deref(), Some("$12.34"));
    }

    #[test]
    fn test_stage_kind_uses_declared_stage_as_fallback() {
        let input = ParseInput::new("", "staging", 0);
        let result = parse_operation(OperationKind::Stage, &input);
        match result {
            OperationResult::Stage(r) => {
                assert!(r.outcome.success);
                assert_eq!(r.computed_stage, "staging");
            }
            other => panic!("expected stage result, got {other:?}"),
        }
    }

    #[test]
    fn test_idempotent() {
        let input = ParseInput::new(
            "App: my-app\n| Created Function my-fn\n✓ Complete\n",
            "dev",
            0,
        );
        let first = parse_operation(OperationKind::Deploy, &input);
        let second = parse_operation(OperationKind::Deploy, &input);
        assert_eq!(first, second);
    }
}
