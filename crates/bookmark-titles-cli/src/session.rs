//! Rewrite session: one saved page, one rewriter, from load to output.

use std::path::Path;

use serde::Serialize;

use bookmark_titles::{Page, Rewriter, RewriterOptions, Role, ScanReport, StructuralMode};

use crate::config::read_page;
use crate::script::{ReplayScript, ReplaySummary, ScriptError};

/// Locator in effect for one role.
#[derive(Debug, Clone, Serialize)]
pub struct RoleLocator {
    pub role: Role,
    pub locator: Option<&'static str>,
}

/// Detected mode and the locators it selects.
#[derive(Debug, Clone, Serialize)]
pub struct ModeInfo {
    pub mode: StructuralMode,
    pub label: String,
    pub locators: Vec<RoleLocator>,
}

/// What a full rewrite did.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub mode: StructuralMode,
    pub watching: bool,
    /// Initial scan; `None` when the page had no feed container.
    pub initial: Option<ScanReport>,
    pub replay: Option<ReplaySummary>,
}

/// A saved page being rewritten.
pub struct RewriteSession {
    page: Page,
    rewriter: Rewriter,
}

impl RewriteSession {
    pub fn from_html(html: &str, options: RewriterOptions) -> Self {
        Self {
            page: Page::parse(html),
            rewriter: Rewriter::new(options),
        }
    }

    pub fn open(path: &Path, options: RewriterOptions) -> anyhow::Result<Self> {
        let html = read_page(path)?;
        tracing::info!("Loaded {} ({} bytes)", path.display(), html.len());
        Ok(Self::from_html(&html, options))
    }

    /// Detected mode and resolved locator per role.
    pub fn inspect(&self) -> ModeInfo {
        let mode = self.rewriter.mode(&self.page);
        ModeInfo {
            mode,
            label: mode.to_string(),
            locators: Role::ALL
                .into_iter()
                .map(|role| RoleLocator {
                    role,
                    locator: self.rewriter.resolve(&self.page, role),
                })
                .collect(),
        }
    }

    /// Start watching, run the initial scan, then replay `script` if given.
    pub fn run(&mut self, script: Option<&ReplayScript>) -> Result<RunSummary, ScriptError> {
        let initial = self.rewriter.start(&mut self.page);
        if initial.is_none() {
            tracing::warn!("No feed container found; page left unchanged");
        }

        let replay = match script {
            Some(script) if self.rewriter.is_watching() => {
                Some(script.replay(&mut self.page, &self.rewriter)?)
            }
            Some(_) => {
                tracing::warn!("Replay script ignored: nothing to watch");
                None
            }
            None => None,
        };

        Ok(RunSummary {
            mode: self.rewriter.mode(&self.page),
            watching: self.rewriter.is_watching(),
            initial,
            replay,
        })
    }

    pub fn html(&self) -> String {
        self.page.html()
    }
}

impl RunSummary {
    /// Items rewritten across the initial scan and every replay rescan.
    pub fn total_rewritten(&self) -> usize {
        self.initial.as_ref().map_or(0, |r| r.rewritten)
            + self.replay.as_ref().map_or(0, |r| r.report.rewritten)
    }
}
