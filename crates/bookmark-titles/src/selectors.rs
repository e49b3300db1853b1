//! Selector table keyed by role and structural mode.
//!
//! Every role has a family-wide locator; a family+layout entry overrides it
//! for one layout. Resolution tries the override first, then the family
//! entry, and reports `None` when the page configuration is not covered.

use std::collections::HashMap;

use scraper::Selector;

use crate::types::{ModeKey, Role, RewriteError, RewriteResult, StructuralMode};

use crate::types::Family::{Component, Legacy};
use crate::types::Layout::{Grid, List};
use crate::types::ModeKey::{Family as F, FamilyLayout as FL};

/// Built-in locators for the four supported page variants.
const BUILTIN: &[(Role, ModeKey, &str)] = &[
    // ── Legacy markup ────────────────────
    (Role::Container, F(Legacy), "#browse-items-primary"),
    (Role::ItemList, F(Legacy), ".expanded-shelf-content-item"),
    (Role::ItemList, FL(Legacy, Grid), ".yt-shelf-grid-item"),
    (Role::Duration, F(Legacy), ".video-time"),
    (Role::ChannelName, F(Legacy), ".yt-lockup-byline > a"),
    (Role::Title, F(Legacy), ".yt-lockup-title > a"),
    // ── Component markup ─────────────────
    (Role::Container, F(Component), ".ytd-browse > #primary > #contents"),
    (Role::ItemList, F(Component), "ytd-item-section-renderer"),
    (Role::ItemList, FL(Component, Grid), "ytd-grid-video-renderer"),
    (
        Role::Duration,
        F(Component),
        "ytd-thumbnail-overlay-time-status-renderer .ytd-thumbnail-overlay-time-status-renderer",
    ),
    (Role::ChannelName, F(Component), "ytd-video-meta-block #byline > a"),
    (Role::ChannelName, FL(Component, Grid), "#byline-container #byline > a"),
    (Role::Title, F(Component), "#video-title"),
    (Role::Title, FL(Component, List), "#meta h3 #video-title"),
    (Role::Title, FL(Component, Grid), "#details h3 #video-title"),
];

/// Static mapping from `(role, mode key)` to a CSS locator.
#[derive(Debug, Clone)]
pub struct SelectorRegistry {
    table: HashMap<(Role, ModeKey), &'static str>,
}

impl Default for SelectorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SelectorRegistry {
    /// The compiled-in table.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN.iter().copied())
    }

    /// Build a registry from explicit entries. Later entries replace earlier
    /// ones with the same key.
    pub fn from_entries(entries: impl IntoIterator<Item = (Role, ModeKey, &'static str)>) -> Self {
        Self {
            table: entries
                .into_iter()
                .map(|(role, key, locator)| ((role, key), locator))
                .collect(),
        }
    }

    /// Locator for `role` under `mode`: layout override first, then the
    /// family-wide entry.
    pub fn resolve(&self, role: Role, mode: StructuralMode) -> Option<&'static str> {
        mode.keys()
            .into_iter()
            .find_map(|key| self.table.get(&(role, key)).copied())
    }

    /// Resolve and parse the locator for `role`.
    pub fn selector(&self, role: Role, mode: StructuralMode) -> RewriteResult<Selector> {
        let locator = self
            .resolve(role, mode)
            .ok_or(RewriteError::UnresolvedSelector { role, mode })?;
        Selector::parse(locator).map_err(|_| RewriteError::InvalidSelector {
            role,
            selector: locator.to_string(),
        })
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Selectors for one page, compiled once for the page's mode.
///
/// A role that failed to resolve or parse keeps its error, which is handed
/// back every time the role is asked for.
#[derive(Debug)]
pub struct Locators {
    mode: StructuralMode,
    compiled: HashMap<Role, RewriteResult<Selector>>,
}

impl Locators {
    pub fn compile(registry: &SelectorRegistry, mode: StructuralMode) -> Self {
        let compiled = Role::ALL
            .into_iter()
            .map(|role| (role, registry.selector(role, mode)))
            .collect();
        Self { mode, compiled }
    }

    pub fn mode(&self) -> StructuralMode {
        self.mode
    }

    pub fn get(&self, role: Role) -> RewriteResult<&Selector> {
        match self.compiled.get(&role) {
            Some(Ok(sel)) => Ok(sel),
            Some(Err(e)) => Err(e.clone()),
            None => Err(RewriteError::UnresolvedSelector {
                role,
                mode: self.mode,
            }),
        }
    }
}
