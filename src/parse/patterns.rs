//! Line-level pattern library
//!
//! One classification point shared by every scanner so the regexes cannot
//! drift apart between operations. Each rule is a compiled regex plus an
//! extractor; a line that matches no rule is simply ignored.
//!
//! Matchers are anchored defensively (leading whitespace, optional marker
//! glyphs, optional punctuation) because the CLI's formatting varies by
//! version.

use regex::Regex;
use std::sync::LazyLock;

/// Resource action line
/// Formats: `| Created Function my-fn`, `+  Created  Function my-fn`,
/// `✓ Removed Bucket assets`, `Updated StaticSite web`
///
/// Groups:
/// 1. action word (Created/Updated/.../Skipped, including -ing forms)
/// 2. resource type
/// 3. logical name
static RESOURCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*[|+*~✓✔✕✖×-]?\s*(Created|Creating|Updated|Updating|Deleted|Deleting|Removed|Removing|Failed|Skipped|Unchanged)\s+([A-Za-z][A-Za-z0-9:._-]*)\s+(\S+)\s*$",
    )
    .expect("Invalid resource line regex")
});

/// App identifier line: `App: my-app` (optionally `➜ App: my-app`)
static APP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:➜\s*)?app:\s*(\S+)\s*$").expect("Invalid app line regex")
});

/// Stage identifier line: `Stage: production`
static STAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:➜\s*)?stage:\s*(\S+)\s*$").expect("Invalid stage line regex")
});

/// Permalink line: `Permalink: https://console...` or `↗ Permalink https://...`
static PERMALINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:↗\s*)?permalink:?\s*(https?://\S+)\s*$")
        .expect("Invalid permalink line regex")
});

/// Bare console URL on its own line also counts as a permalink
static CONSOLE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(https?://console\.\S+)\s*$").expect("Invalid console URL regex")
});

/// Named output line: `ApiEndpoint: https://...`
static OUTPUT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_]*):\s*(https?://\S+)\s*$")
        .expect("Invalid output line regex")
});

/// Completion-success marker: `✓ Complete`, `Completed`, `✔ Success`
static COMPLETE_OK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[✓✔]?\s*(?:complete[d]?|success)[.!]?\s*$")
        .expect("Invalid completion marker regex")
});

/// Completion-failure marker: `✕ Failed`, `✖ Failure`
static COMPLETE_FAILED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[✕✖×]?\s*(?:failed|failure)[.!]?\s*$")
        .expect("Invalid failure marker regex")
});

/// Generic error line: `Error: message`, `[error] message`
static ERROR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:\[error\]|error:)\s*(.+?)\s*$").expect("Invalid error line regex")
});

/// Diff-begin marker delimiting the verbatim change block:
/// `✓ Generated`, `Planned changes:`, `Diff:`
static DIFF_BEGIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[✓✔]?\s*(?:generated|planned changes:?|diff:)\s*$")
        .expect("Invalid diff marker regex")
});

/// Explicit no-changes marker
static NO_CHANGES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:no changes|nothing to deploy|nothing changed|no updates)\b")
        .expect("Invalid no-changes regex")
});

/// Cost/savings line, several known phrasings
///
/// Group 1 is the monetary figure with its `$` sign.
static SAVINGS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:monthly savings|estimated savings|you will save|cost reduction)[^$]*(\$\s?[0-9][0-9,]*(?:\.[0-9]+)?)",
    )
    .expect("Invalid savings line regex")
});

/// Semantic category of a single CLI output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// App identifier
    App(String),
    /// Stage identifier
    Stage(String),
    /// Resource action with type and logical name; `action` is the raw
    /// lowercased word from the output
    ResourceAction {
        action: String,
        resource_type: String,
        name: String,
    },
    /// Named output URL
    Output { name: String, url: String },
    /// Console permalink
    Permalink(String),
    /// Completion-success marker
    CompleteOk,
    /// Completion-failure marker
    CompleteFailed,
    /// Generic error line with its message
    ErrorLine(String),
    /// Start of the verbatim diff block
    DiffBegin,
    /// Explicit no-changes marker
    NoChanges,
    /// Cost/savings line; carries the monetary figure (e.g. `$12.34`)
    Savings(String),
}

/// Classify a single line of CLI output.
///
/// Returns `None` for lines matching no rule; callers ignore those. Rule
/// order matters: resource actions are checked before completion markers so
/// `Failed Function my-fn` is an action, not a failure banner.
pub fn classify(line: &str) -> Option<LineEvent> {
    if let Some(caps) = RESOURCE_REGEX.captures(line) {
        return Some(LineEvent::ResourceAction {
            action: final_status(&caps[1]),
            resource_type: caps[2].to_string(),
            name: caps[3].to_string(),
        });
    }
    if COMPLETE_OK_REGEX.is_match(line) {
        return Some(LineEvent::CompleteOk);
    }
    if COMPLETE_FAILED_REGEX.is_match(line) {
        return Some(LineEvent::CompleteFailed);
    }
    if let Some(caps) = ERROR_REGEX.captures(line) {
        return Some(LineEvent::ErrorLine(caps[1].to_string()));
    }
    if let Some(caps) = PERMALINK_REGEX.captures(line) {
        return Some(LineEvent::Permalink(caps[1].to_string()));
    }
    if let Some(caps) = CONSOLE_URL_REGEX.captures(line) {
        return Some(LineEvent::Permalink(caps[1].to_string()));
    }
    if let Some(caps) = APP_REGEX.captures(line) {
        return Some(LineEvent::App(caps[1].to_string()));
    }
    if let Some(caps) = STAGE_REGEX.captures(line) {
        return Some(LineEvent::Stage(caps[1].to_string()));
    }
    if let Some(caps) = OUTPUT_REGEX.captures(line) {
        return Some(LineEvent::Output {
            name: caps[1].to_string(),
            url: caps[2].to_string(),
        });
    }
    if DIFF_BEGIN_REGEX.is_match(line) {
        return Some(LineEvent::DiffBegin);
    }
    if NO_CHANGES_REGEX.is_match(line) {
        return Some(LineEvent::NoChanges);
    }
    if let Some(caps) = SAVINGS_REGEX.captures(line) {
        return Some(LineEvent::Savings(caps[1].to_string()));
    }
    None
}

/// Fold an in-progress verb onto its final-state word, lowercased.
///
/// `Creating` and `Created` both track as `created`; the last observed
/// status per resource wins downstream.
pub fn final_status(action: &str) -> String {
    match action.to_ascii_lowercase().as_str() {
        "creating" => "created".to_string(),
        "updating" => "updated".to_string(),
        "deleting" => "deleted".to_string(),
        "removing" => "removed".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_resource_action_pipe_prefix() {
        let event = classify("| Created Function my-fn").unwrap();
        assert_eq!(
            event,
            LineEvent::ResourceAction {
                action: "created".to_string(),
                resource_type: "Function".to_string(),
                name: "my-fn".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_resource_action_plain() {
        let event = classify("Updated StaticSite web").unwrap();
        assert_eq!(
            event,
            LineEvent::ResourceAction {
                action: "updated".to_string(),
                resource_type: "StaticSite".to_string(),
                name: "web".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_in_progress_verb_folds_to_final() {
        let event = classify("|  Creating  Function worker").unwrap();
        assert!(matches!(
            event,
            LineEvent::ResourceAction { action, .. } if action == "created"
        ));
    }

    #[test]
    fn test_classify_failed_resource_is_action_not_banner() {
        let event = classify("✕ Failed Function my-fn").unwrap();
        assert!(matches!(event, LineEvent::ResourceAction { action, .. } if action == "failed"));
    }

    #[test]
    fn test_classify_completion_markers() {
        assert_eq!(classify("✓ Complete"), Some(LineEvent::CompleteOk));
        assert_eq!(classify("  Complete"), Some(LineEvent::CompleteOk));
        assert_eq!(classify("✕ Failed"), Some(LineEvent::CompleteFailed));
        assert_eq!(classify("Failure."), Some(LineEvent::CompleteFailed));
    }

    #[test]
    fn test_classify_app_and_stage() {
        assert_eq!(classify("App: my-app"), Some(LineEvent::App("my-app".to_string())));
        assert_eq!(
            classify("➜  App: my-app"),
            Some(LineEvent::App("my-app".to_string()))
        );
        assert_eq!(
            classify("Stage: production"),
            Some(LineEvent::Stage("production".to_string()))
        );
    }

    #[test]
    fn test_classify_permalink_beats_output() {
        assert_eq!(
            classify("Permalink: https://console.example.dev/run/42"),
            Some(LineEvent::Permalink(
                "https://console.example.dev/run/42".to_string()
            ))
        );
        assert_eq!(
            classify("https://console.example.dev/run/42"),
            Some(LineEvent::Permalink(
                "https://console.example.dev/run/42".to_string()
            ))
        );
    }

    #[test]
    fn test_classify_output_line() {
        assert_eq!(
            classify("ApiEndpoint: https://abc.execute-api.us-east-1.amazonaws.com"),
            Some(LineEvent::Output {
                name: "ApiEndpoint".to_string(),
                url: "https://abc.execute-api.us-east-1.amazonaws.com".to_string(),
            })
        );
    }

    #[test]
    fn test_classify_error_line() {
        assert_eq!(
            classify("Error: stack update rolled back"),
            Some(LineEvent::ErrorLine("stack update rolled back".to_string()))
        );
        assert_eq!(
            classify("[error] boom"),
            Some(LineEvent::ErrorLine("boom".to_string()))
        );
    }

    #[test]
    fn test_classify_diff_begin_and_no_changes() {
        assert_eq!(classify("✓  Generated"), Some(LineEvent::DiffBegin));
        assert_eq!(classify("Planned changes:"), Some(LineEvent::DiffBegin));
        assert_eq!(classify("No changes"), Some(LineEvent::NoChanges));
    }

    #[test]
    fn test_classify_savings_phrasings() {
        assert_eq!(
            classify("Monthly savings: $12.34"),
            Some(LineEvent::Savings("$12.34".to_string()))
        );
        assert_eq!(
            classify("You will save $1,200 per month"),
            Some(LineEvent::Savings("$1,200".to_string()))
        );
        assert_eq!(
            classify("Estimated savings of $7"),
            Some(LineEvent::Savings("$7".to_string()))
        );
    }

    #[test]
    fn test_classify_noise_is_ignored() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
        assert_eq!(classify("Uploading 14 files..."), None);
        assert_eq!(classify("~~~~~~~~"), None);
    }
}
