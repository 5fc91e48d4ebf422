//! Remove (teardown) output scanner

use super::patterns::{self, LineEvent};
use super::{Parser, ScannedResource};

/// Raw accumulation from one pass over remove output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveScan {
    /// App name from the first app-identifier line
    pub app: Option<String>,

    /// Stage name from the first stage-identifier line
    pub stage: Option<String>,

    /// First permalink seen
    pub permalink: Option<String>,

    /// Resources in first-seen order, last observed status each
    pub resources: Vec<ScannedResource>,

    /// A completion-success marker was present
    pub saw_success_marker: bool,

    /// A completion-failure marker or error banner was present
    pub saw_failure_marker: bool,

    /// First error message seen
    pub first_error: Option<String>,

    /// Monetary savings figure from a dedicated savings line, if any
    ///
    /// `None` means the CLI printed no savings line; that is distinct from
    /// a printed `$0`.
    pub savings: Option<String>,
}

impl Parser {
    /// Scan remove output in a single pass.
    pub fn scan_remove(text: &str) -> RemoveScan {
        let mut scan = RemoveScan::default();

        for line in text.lines() {
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
                Some(LineEvent::ResourceAction {
                    action,
                    resource_type,
                    name,
                }) => {
                    Self::track_resource(&mut scan.resources, resource_type, name, action);
                }
                Some(LineEvent::Permalink(url)) => {
                    if scan.permalink.is_none() {
                        scan.permalink = Some(url);
                    }
                }
                Some(LineEvent::CompleteOk) => {
                    scan.saw_success_marker = true;
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
                Some(LineEvent::Savings(amount)) => {
                    if scan.savings.is_none() {
                        scan.savings = Some(amount);
                    }
                }
                _ => {}
            }
        }

        scan
    }
}
