//! Bookmark Titles CLI: offline host for rewriting saved feed pages.

pub mod config;
pub mod script;
pub mod session;

pub use config::resolve_output_path;
pub use script::{ReplayScript, ReplayStep, ReplaySummary, ScriptError};
pub use session::{ModeInfo, RewriteSession, RunSummary};
