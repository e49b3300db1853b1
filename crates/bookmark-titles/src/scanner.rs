//! Feed container lookup and item enumeration.

use ego_tree::NodeId;

use crate::dom::Page;
use crate::selectors::Locators;
use crate::types::{RewriteError, RewriteResult, Role};

/// Finds the feed and its entries using the page's compiled locators.
pub struct FeedScanner<'a> {
    locators: &'a Locators,
}

impl<'a> FeedScanner<'a> {
    pub fn new(locators: &'a Locators) -> Self {
        Self { locators }
    }

    /// The feed container, if the page has one right now.
    pub fn locate_container(&self, page: &Page) -> RewriteResult<NodeId> {
        let sel = self.locators.get(Role::Container)?;
        page.query(sel).ok_or(RewriteError::MissingContainer)
    }

    /// Feed items below `container`, in document order. Empty when the item
    /// locator is missing or matches nothing.
    pub fn list_items(&self, page: &Page, container: NodeId) -> Vec<NodeId> {
        match self.locators.get(Role::ItemList) {
            Ok(sel) => page.query_all_within(container, sel),
            Err(_) => Vec::new(),
        }
    }
}
