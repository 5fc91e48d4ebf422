//! Diff (preview) output scanner
//!
//! Two-phase scan keyed on the diff-begin marker: lines before it are run
//! metadata, lines from the marker onward form the verbatim change block.

use super::patterns::{self, LineEvent};
use super::{Parser, ScannedResource};

/// Raw accumulation from one pass over diff output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffScan {
    /// App name from the first app-identifier line
    pub app: Option<String>,

    /// Stage name from the first stage-identifier line
    pub stage: Option<String>,

    /// First permalink seen
    pub permalink: Option<String>,

    /// Planned changes in output order; `status` holds the raw action word
    pub changes: Vec<ScannedResource>,

    /// Verbatim change block (lines after the diff-begin marker)
    pub diff_text: String,

    /// An explicit no-changes marker was present
    pub saw_no_changes: bool,

    /// A completion-failure marker or error banner was present
    pub saw_failure_marker: bool,

    /// First error message seen
    pub first_error: Option<String>,

    /// Verbatim cost/savings line, preserved for the summary
    pub cost_line: Option<String>,
}

impl Parser {
    /// Scan diff output in a single pass.
    ///
    /// Resource-action lines are collected as planned changes wherever they
    /// appear, so output from CLI versions that never print a diff-begin
    /// marker still yields structured changes; the verbatim block is only
    /// captured once a marker has been seen.
    pub fn scan_diff(text: &str) -> DiffScan {
        let mut scan = DiffScan::default();
        let mut in_change_block = false;
        let mut block_lines: Vec<&str> = Vec::new();

        for line in text.lines() {
            if in_change_block {
                block_lines.push(line);
            }

            match patterns::classify(line) {
                Some(LineEvent::App(name)) => {
                    if scan.app.is_none() {
                        scan.app = Some(name);
                    }
                }
                Some(LineEvent::Stage(name)) => {
                    if scan.stage.is_none() {
                        scan.stage = Some(name);
                    }
                }
                Some(LineEvent::DiffBegin) => {
                    in_change_block = true;
                }
                Some(LineEvent::ResourceAction {
                    action,
                    resource_type,
                    name,
                }) => {
                    // Duplicate mentions keep the last action, same as deploy
                    Self::track_resource(&mut scan.changes, resource_type, name, action);
                }
                Some(LineEvent::Permalink(url)) => {
                    if scan.permalink.is_none() {
                        scan.permalink = Some(url);
                    }
                }
                Some(LineEvent::NoChanges) => {
                    scan.saw_no_changes = true;
                }
                Some(LineEvent::Savings(_)) => {
                    if scan.cost_line.is_none() {
                        scan.cost_line = Some(line.trim().to_string());
                    }
                }
                Some(LineEvent::CompleteFailed) => {
                    scan.saw_failure_marker = true;
                }
                Some(LineEvent::ErrorLine(message)) => {
                    scan.saw_failure_marker = true;
                    if scan.first_error.is_none() {
                        scan.first_error = Some(message);
                    }
                }
                _ => {}
            }
        }

        scan.diff_text = block_lines.join("\n");
        scan
    }
}
