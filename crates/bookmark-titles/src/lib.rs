//! Bookmark Titles: prefixes feed entry titles with the channel name and a
//! zero-padded duration, e.g. `Channel [04:20] Title`, so bookmarks made from
//! the feed carry that context.

pub mod dom;
pub mod mode;
pub mod processor;
pub mod rewriter;
pub mod scanner;
pub mod selectors;
pub mod types;
pub mod watcher;

pub use dom::{MutationKind, MutationRecord, ObserveOptions, ObserverId, Page};
pub use ego_tree::NodeId;
pub use mode::ModeDetector;
pub use processor::{compose_label, format_duration, ItemProcessor, PROCESSED_MARKER};
pub use rewriter::Rewriter;
pub use scanner::FeedScanner;
pub use selectors::{Locators, SelectorRegistry};
pub use types::*;
pub use watcher::ChangeWatcher;
