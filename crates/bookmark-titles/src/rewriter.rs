//! Rewriter session: ties mode detection, selectors, scanning, processing
//! and change watching together for one page.
//!
//! Everything runs on the caller's thread. A scan runs to completion before
//! the next batch of notifications is looked at, so no two scans overlap and
//! the processed marker alone is enough to keep rewrites idempotent.

use std::cell::OnceCell;

use crate::dom::Page;
use crate::mode::ModeDetector;
use crate::processor::ItemProcessor;
use crate::scanner::FeedScanner;
use crate::selectors::{Locators, SelectorRegistry};
use crate::types::{Outcome, RewriteError, RewriterOptions, Role, ScanReport, StructuralMode};
use crate::watcher::ChangeWatcher;

/// Rewrites feed titles on one page for the lifetime of that page.
pub struct Rewriter {
    registry: SelectorRegistry,
    options: RewriterOptions,
    detector: ModeDetector,
    locators: OnceCell<Locators>,
    watcher: Option<ChangeWatcher>,
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new(RewriterOptions::default())
    }
}

impl Rewriter {
    pub fn new(options: RewriterOptions) -> Self {
        Self::with_registry(SelectorRegistry::builtin(), options)
    }

    pub fn with_registry(registry: SelectorRegistry, options: RewriterOptions) -> Self {
        Self {
            registry,
            options,
            detector: ModeDetector::new(),
            locators: OnceCell::new(),
            watcher: None,
        }
    }

    /// Structural mode of the page, detected on first call.
    pub fn mode(&self, page: &Page) -> StructuralMode {
        self.detector.mode(page)
    }

    /// Locator currently in effect for `role`.
    pub fn resolve(&self, page: &Page, role: Role) -> Option<&'static str> {
        self.registry.resolve(role, self.mode(page))
    }

    /// Attach the change watcher to the feed container, then run an initial
    /// scan. Returns `None` without watching if the page has no container.
    pub fn start(&mut self, page: &mut Page) -> Option<ScanReport> {
        if self.watcher.is_none() {
            let container = {
                let locators = self.locators(page);
                FeedScanner::new(locators).locate_container(page)
            };
            match container {
                Ok(container) => {
                    self.watcher = Some(ChangeWatcher::start(page, container));
                    tracing::debug!("Change watcher bound to feed container");
                }
                Err(e) => {
                    self.diagnose(&e, "No feed container to watch");
                    return None;
                }
            }
        }
        Some(self.run(page))
    }

    /// Whether a watcher is attached.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// One full scan over the feed. Items already processed are skipped;
    /// items that fail are left for the next scan.
    pub fn run(&self, page: &mut Page) -> ScanReport {
        let locators = self.locators(page);
        let scanner = FeedScanner::new(locators);
        let mut report = ScanReport::default();

        let container = match scanner.locate_container(page) {
            Ok(c) => c,
            Err(e) => {
                self.diagnose(&e, "Scan aborted");
                return report;
            }
        };
        report.container_found = true;

        let items = scanner.list_items(page, container);
        report.items = items.len();

        let processor = ItemProcessor::new(locators);
        for item in items {
            match processor.try_process(page, item) {
                Ok(Outcome::Rewritten(label)) => {
                    report.rewritten += 1;
                    if self.options.diagnostics {
                        tracing::trace!(%label, "Item rewritten");
                    }
                }
                Ok(Outcome::AlreadyProcessed) => report.already_processed += 1,
                Err(e) => {
                    report.failed += 1;
                    self.diagnose(&e, "Item skipped");
                }
            }
        }

        tracing::debug!(
            mode = %locators.mode(),
            items = report.items,
            rewritten = report.rewritten,
            already_processed = report.already_processed,
            failed = report.failed,
            "Scan complete"
        );
        report
    }

    /// Deliver the pending change notifications as one batch. Runs a single
    /// rescan if the batch qualifies; returns `None` otherwise.
    pub fn pump(&self, page: &mut Page) -> Option<ScanReport> {
        let watcher = self.watcher.as_ref()?;
        let batch = watcher.next_batch(page);
        if batch.is_empty() {
            return None;
        }

        let duration = match self.locators(page).get(Role::Duration) {
            Ok(sel) => sel,
            Err(e) => {
                self.diagnose(&e, "Change batch ignored");
                return None;
            }
        };
        if !ChangeWatcher::should_rescan(page, &batch, duration) {
            tracing::trace!(records = batch.len(), "Change batch ignored");
            return None;
        }

        tracing::debug!(records = batch.len(), "Change batch triggered rescan");
        Some(self.run(page))
    }

    fn locators(&self, page: &Page) -> &Locators {
        self.locators
            .get_or_init(|| Locators::compile(&self.registry, self.detector.mode(page)))
    }

    fn diagnose(&self, error: &RewriteError, context: &str) {
        if self.options.diagnostics {
            tracing::debug!(error = %error, "{context}");
        }
    }
}
