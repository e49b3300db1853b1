//! Change notifications on the feed container.
//!
//! The watcher listens to every change kind below the container but only
//! asks for a rescan when a batch contains a newly rendered duration badge.
//! Title rewrites and marker attributes never pass the filter, so the
//! rewriter cannot trigger itself.

use ego_tree::NodeId;
use scraper::Selector;

use crate::dom::{MutationRecord, ObserveOptions, ObserverId, Page};

/// Subscription on one feed container.
#[derive(Debug)]
pub struct ChangeWatcher {
    container: NodeId,
    observer: ObserverId,
}

impl ChangeWatcher {
    /// Subscribe to child-list, attribute and text changes anywhere below
    /// `container`. The subscription lives as long as the page.
    pub fn start(page: &mut Page, container: NodeId) -> Self {
        let observer = page.observe(container, ObserveOptions::all());
        Self {
            container,
            observer,
        }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Next batch of pending notifications, oldest first. Empty when nothing
    /// changed since the last call.
    pub fn next_batch(&self, page: &mut Page) -> Vec<MutationRecord> {
        page.take_records(self.observer)
    }

    /// Whether any record in `batch` warrants a rescan.
    pub fn should_rescan(page: &Page, batch: &[MutationRecord], duration: &Selector) -> bool {
        batch.iter().any(|record| qualifies(page, record, duration))
    }
}

/// A record qualifies when it inserted nodes into a duration badge, or into
/// a node holding a duration badge as a direct child.
pub fn qualifies(page: &Page, record: &MutationRecord, duration: &Selector) -> bool {
    if !record.is_insertion() {
        return false;
    }
    page.matches(record.target, duration)
        || page
            .element_children(record.target)
            .into_iter()
            .any(|child| page.matches(child, duration))
}
