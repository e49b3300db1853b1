//! Structural mode detection.

use std::cell::OnceCell;

use scraper::Selector;

use crate::dom::Page;
use crate::types::StructuralMode;

/// Present only on pages built from `ytd-*` components.
pub const COMPONENT_FAMILY_MARKER: &str = "ytd-app";

/// Present only when the feed is laid out as a grid, in either family.
pub const GRID_LAYOUT_MARKER: &str = "ytd-grid-renderer, .yt-shelf-grid-item";

/// Detects the structural mode of a page, once.
///
/// Each flag is computed on first request and then frozen for the lifetime
/// of the detector, with no way to reset it. Assumes the page's structural
/// family does not change after load. Use one detector per page.
#[derive(Debug, Default)]
pub struct ModeDetector {
    component_based: OnceCell<bool>,
    grid_layout: OnceCell<bool>,
}

impl ModeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_component_based(&self, page: &Page) -> bool {
        *self
            .component_based
            .get_or_init(|| has_marker(page, COMPONENT_FAMILY_MARKER))
    }

    pub fn is_grid_layout(&self, page: &Page) -> bool {
        *self
            .grid_layout
            .get_or_init(|| has_marker(page, GRID_LAYOUT_MARKER))
    }

    pub fn mode(&self, page: &Page) -> StructuralMode {
        StructuralMode {
            component_based: self.is_component_based(page),
            grid_layout: self.is_grid_layout(page),
        }
    }
}

fn has_marker(page: &Page, marker: &str) -> bool {
    match Selector::parse(marker) {
        Ok(sel) => page.exists(&sel),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_list() {
        let page = Page::parse("<div id=\"browse-items-primary\"></div>");
        let mode = ModeDetector::new().mode(&page);
        assert!(!mode.component_based);
        assert!(!mode.grid_layout);
    }

    #[test]
    fn test_legacy_grid() {
        let page = Page::parse("<ul><li class=\"yt-shelf-grid-item\"></li></ul>");
        let mode = ModeDetector::new().mode(&page);
        assert!(!mode.component_based);
        assert!(mode.grid_layout);
    }

    #[test]
    fn test_component_grid() {
        let page = Page::parse("<ytd-app><ytd-grid-renderer></ytd-grid-renderer></ytd-app>");
        let detector = ModeDetector::new();
        assert!(detector.is_component_based(&page));
        assert!(detector.is_grid_layout(&page));
    }

    #[test]
    fn test_memo_survives_page_changes() {
        let mut page = Page::parse("<body><div id=\"root\"></div></body>");
        let detector = ModeDetector::new();
        assert!(!detector.is_component_based(&page));

        let root = page.query(&Selector::parse("#root").unwrap()).unwrap();
        page.append_html(root, "<ytd-app></ytd-app><ytd-grid-renderer></ytd-grid-renderer>");

        assert!(!detector.is_component_based(&page));
        // never asked before the change, so this one sees the grid marker
        assert!(detector.is_grid_layout(&page));
        assert!(ModeDetector::new().is_component_based(&page));
    }
}
