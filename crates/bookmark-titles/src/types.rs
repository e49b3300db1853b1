//! Core data types for structural modes, selector roles, and scan results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural family of the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Older server-rendered markup.
    Legacy,
    /// Newer custom-element markup (`ytd-*` components).
    Component,
}

/// Feed layout within a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    List,
    Grid,
}

/// Which structural variant of the host page is present.
///
/// Detected once per page and never invalidated: the host's structural
/// family is assumed to stay fixed after load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuralMode {
    pub component_based: bool,
    pub grid_layout: bool,
}

impl StructuralMode {
    pub fn new(family: Family, layout: Layout) -> Self {
        Self {
            component_based: family == Family::Component,
            grid_layout: layout == Layout::Grid,
        }
    }

    pub fn family(&self) -> Family {
        if self.component_based {
            Family::Component
        } else {
            Family::Legacy
        }
    }

    pub fn layout(&self) -> Layout {
        if self.grid_layout {
            Layout::Grid
        } else {
            Layout::List
        }
    }

    /// Table keys to try for this mode, most specific first.
    pub fn keys(&self) -> [ModeKey; 2] {
        [
            ModeKey::FamilyLayout(self.family(), self.layout()),
            ModeKey::Family(self.family()),
        ]
    }
}

impl fmt::Display for StructuralMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family(), self.layout())
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Component => write!(f, "component"),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Grid => write!(f, "grid"),
        }
    }
}

/// What a locator in the selector table points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Root of the feed.
    Container,
    /// One feed entry, relative to the container.
    ItemList,
    /// Duration badge, relative to an item.
    Duration,
    /// Channel link, relative to an item.
    ChannelName,
    /// Title slot, relative to an item. This is the only slot rewritten.
    Title,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Container,
        Role::ItemList,
        Role::Duration,
        Role::ChannelName,
        Role::Title,
    ];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container => write!(f, "container"),
            Self::ItemList => write!(f, "item_list"),
            Self::Duration => write!(f, "duration"),
            Self::ChannelName => write!(f, "channel_name"),
            Self::Title => write!(f, "title"),
        }
    }
}

/// Second half of a selector table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKey {
    /// Applies to every layout of the family.
    Family(Family),
    /// Override for one layout of the family.
    FamilyLayout(Family, Layout),
}

/// Fields pulled out of one item during a single processing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub duration_raw: String,
    pub channel_name: String,
    pub title: String,
}

/// Result of processing a single feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The title slot was rewritten to this label and the marker set.
    Rewritten(String),
    /// The marker was already present; nothing was touched.
    AlreadyProcessed,
}

/// Summary of one full scan over the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub container_found: bool,
    pub items: usize,
    pub rewritten: usize,
    pub already_processed: usize,
    pub failed: usize,
}

impl ScanReport {
    /// Fold a later scan into this one. Rewrites accumulate; the remaining
    /// counts describe the feed as of the later scan.
    pub fn absorb(&mut self, other: &ScanReport) {
        self.container_found |= other.container_found;
        self.items = self.items.max(other.items);
        self.rewritten += other.rewritten;
        self.already_processed = other.already_processed;
        self.failed = other.failed;
    }
}

/// Options for the rewriter session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriterOptions {
    /// Emit soft failures (missing container, unresolved selectors, missing
    /// elements) as debug events. Has no effect on control flow.
    pub diagnostics: bool,
}

/// Errors raised while locating or processing feed content.
///
/// None of these escape a scan: each one means "leave the page as is and try
/// again on the next trigger".
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("Feed container not found")]
    MissingContainer,

    #[error("No selector for role {role} in mode {mode}")]
    UnresolvedSelector { role: Role, mode: StructuralMode },

    #[error("Invalid selector for role {role}: {selector}")]
    InvalidSelector { role: Role, selector: String },

    #[error("Element not found for role {0}")]
    MissingElement(Role),
}

/// Convenience result type.
pub type RewriteResult<T> = Result<T, RewriteError>;
