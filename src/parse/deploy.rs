//! Deploy output scanner

use super::patterns::{self, LineEvent};
use super::{Parser, ScannedResource, ScannedUrl};

/// Raw accumulation from one pass over deploy output
///
/// Statuses are kept verbatim (lowercased) as scanned; coercion onto the
/// canonical enumerations happens in the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployScan {
    /// App name from the first app-identifier line
    pub app: Option<String>,

    /// Stage name from the first stage-identifier line
    pub stage: Option<String>,

    /// First permalink seen
    pub permalink: Option<String>,

    /// Resources in first-seen order, last observed status each
    pub resources: Vec<ScannedResource>,

    /// Output URLs, first-seen, order-preserving
    pub urls: Vec<ScannedUrl>,

    /// A completion-success marker was present
    pub saw_success_marker: bool,

    /// A completion-failure marker or error banner was present
    pub saw_failure_marker: bool,

    /// First error message seen
    pub first_error: Option<String>,
}

impl DeployScan {
    /// True when any tracked resource's last status is a failure word
    pub fn any_resource_failed(&self) -> bool {
        self.resources.iter().any(|r| r.status == "failed")
    }
}

impl Parser {
    /// Scan deploy output in a single pass.
    ///
    /// Lines matching no pattern are ignored; an empty input yields the
    /// default scan.
    pub fn scan_deploy(text: &str) -> DeployScan {
        let mut scan = DeployScan::default();

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
                Some(LineEvent::Output { name, url }) => {
                    if !scan.urls.iter().any(|u| u.name == name && u.url == url) {
                        scan.urls.push(ScannedUrl { name, url });
                    }
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
                _ => {}
            }
        }

        scan
    }
}
