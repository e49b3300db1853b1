//! Replay scripts: asynchronous feed growth, simulated offline.
//!
//! A script is a JSON list of insertions. Each step appends an HTML fragment
//! to the first element matching `parent`, then delivers the resulting
//! change batch to the rewriter.
//!
//! Only a batch that renders a duration badge triggers a rescan. An item
//! appended with its badge already filled in is not picked up; to replay a
//! "load more", append the item with an empty badge, then fill the badge:
//!
//! ```json
//! { "steps": [
//!     { "parent": "#contents", "html": "<ytd-item-section-renderer id=\"more\">…</ytd-item-section-renderer>" },
//!     { "parent": "#more ytd-thumbnail-overlay-time-status-renderer",
//!       "html": "<span class=\"ytd-thumbnail-overlay-time-status-renderer\">3:04</span>" }
//! ] }
//! ```

use std::path::Path;

use scraper::Selector;
use serde::{Deserialize, Serialize};

use bookmark_titles::{Page, Rewriter, ScanReport};

/// An ordered list of host-side insertions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayScript {
    pub steps: Vec<ReplayStep>,
}

/// One insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayStep {
    /// CSS selector for the element receiving the fragment.
    pub parent: String,
    /// Markup to append.
    pub html: String,
}

/// What a replay did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub steps_applied: usize,
    pub steps_skipped: usize,
    pub rescans: usize,
    /// Totals over all rescans triggered by the replay.
    pub report: ScanReport,
}

/// Errors loading or replaying a script.
#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Step {step}: invalid parent selector {selector:?}")]
    InvalidSelector { step: usize, selector: String },
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Apply every step to `page`, pumping `rewriter` after each one.
    pub fn replay(&self, page: &mut Page, rewriter: &Rewriter) -> Result<ReplaySummary, ScriptError> {
        let mut summary = ReplaySummary::default();

        for (idx, step) in self.steps.iter().enumerate() {
            let parent_sel =
                Selector::parse(&step.parent).map_err(|_| ScriptError::InvalidSelector {
                    step: idx,
                    selector: step.parent.clone(),
                })?;

            let Some(parent) = page.query(&parent_sel) else {
                tracing::warn!(step = idx, parent = %step.parent, "No element matches parent, step skipped");
                summary.steps_skipped += 1;
                continue;
            };

            let added = page.append_html(parent, &step.html);
            summary.steps_applied += 1;
            tracing::debug!(step = idx, nodes = added.len(), "Fragment appended");

            if let Some(report) = rewriter.pump(page) {
                summary.rescans += 1;
                summary.report.absorb(&report);
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = ReplayScript::from_json(
            r##"{ "steps": [ { "parent": "#contents", "html": "<p>x</p>" } ] }"##,
        )
        .unwrap();
        assert_eq!(script.steps.len(), 1);
        assert_eq!(script.steps[0].parent, "#contents");
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            ReplayScript::from_json("{ \"steps\": 3 }"),
            Err(ScriptError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_parent_selector() {
        let script = ReplayScript {
            steps: vec![ReplayStep {
                parent: "div[".to_string(),
                html: "<p>x</p>".to_string(),
            }],
        };
        let mut page = Page::parse("<html><body></body></html>");
        let rewriter = Rewriter::default();
        assert!(matches!(
            script.replay(&mut page, &rewriter),
            Err(ScriptError::InvalidSelector { step: 0, .. })
        ));
    }

    #[test]
    fn test_unmatched_parent_is_skipped() {
        let script = ReplayScript {
            steps: vec![ReplayStep {
                parent: "#missing".to_string(),
                html: "<p>x</p>".to_string(),
            }],
        };
        let mut page = Page::parse("<html><body></body></html>");
        let rewriter = Rewriter::default();
        let summary = script.replay(&mut page, &rewriter).unwrap();
        assert_eq!(summary.steps_applied, 0);
        assert_eq!(summary.steps_skipped, 1);
        assert_eq!(summary.rescans, 0);
    }
}
