//! Per-item extraction and title rewrite.
//!
//! An item moves from unprocessed to processed exactly once. Every lookup
//! happens before the first write, so an attempt that fails on any field
//! leaves the item untouched and eligible for the next scan.

use ego_tree::NodeId;

use crate::dom::Page;
use crate::selectors::Locators;
use crate::types::{ExtractedFields, Outcome, RewriteError, RewriteResult, Role};

/// Attribute set on an item once its title has been rewritten.
pub const PROCESSED_MARKER: &str = "data-ytsbtp-processed";

const MARKER_VALUE: &str = "1";

/// Rewrites the title slot of feed items.
pub struct ItemProcessor<'a> {
    locators: &'a Locators,
}

impl<'a> ItemProcessor<'a> {
    pub fn new(locators: &'a Locators) -> Self {
        Self { locators }
    }

    /// Process one item. Returns `true` only if the item was rewritten by
    /// this call.
    pub fn process(&self, page: &mut Page, item: NodeId) -> bool {
        matches!(self.try_process(page, item), Ok(Outcome::Rewritten(_)))
    }

    /// Process one item, reporting why nothing happened when it didn't.
    pub fn try_process(&self, page: &mut Page, item: NodeId) -> RewriteResult<Outcome> {
        if is_processed(page, item) {
            return Ok(Outcome::AlreadyProcessed);
        }

        let (fields, title_el) = self.locate(page, item)?;

        let label = compose_label(&fields.channel_name, &fields.duration_raw, &fields.title);
        page.set_inner_html(title_el, &label);
        page.set_attr(item, PROCESSED_MARKER, MARKER_VALUE);

        Ok(Outcome::Rewritten(label))
    }

    /// Pull the three fields out of `item` without touching it.
    pub fn extract(&self, page: &Page, item: NodeId) -> RewriteResult<ExtractedFields> {
        self.locate(page, item).map(|(fields, _)| fields)
    }

    /// Fields plus the title slot they will be written back to. Fails on the
    /// first missing piece, in duration, channel, title order.
    fn locate(&self, page: &Page, item: NodeId) -> RewriteResult<(ExtractedFields, NodeId)> {
        let duration_el = self.find(page, item, Role::Duration)?;
        let duration_raw = duration_text(&page.inner_html(duration_el).unwrap_or_default());

        let channel_el = self.find(page, item, Role::ChannelName)?;
        let channel_name = page.inner_html(channel_el).unwrap_or_default();

        let title_el = self.find(page, item, Role::Title)?;
        let title = page
            .inner_html(title_el)
            .unwrap_or_default()
            .trim()
            .to_string();

        let fields = ExtractedFields {
            duration_raw,
            channel_name,
            title,
        };
        Ok((fields, title_el))
    }

    fn find(&self, page: &Page, item: NodeId, role: Role) -> RewriteResult<NodeId> {
        let sel = self.locators.get(role)?;
        page.query_within(item, sel)
            .ok_or(RewriteError::MissingElement(role))
    }
}

/// Whether `item` already carries the processed marker.
pub fn is_processed(page: &Page, item: NodeId) -> bool {
    page.attr(item, PROCESSED_MARKER) == Some(MARKER_VALUE)
}

/// Duration badge content up to the first nested tag. Half-rendered badges
/// can carry their own markup after the time.
pub fn duration_text(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.find('<') {
        Some(idx) => trimmed[..idx].trim_end().to_string(),
        None => trimmed.to_string(),
    }
}

/// Zero-pad every `:`-separated segment to two characters.
pub fn format_duration(duration: &str) -> String {
    if duration.is_empty() {
        return String::new();
    }

    duration
        .split(':')
        .map(|seg| {
            if seg.chars().count() < 2 {
                format!("0{seg}")
            } else {
                seg.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(":")
}

/// `Channel [mm:ss] Title`, or `Channel | Title` without a duration.
pub fn compose_label(channel_name: &str, duration: &str, title: &str) -> String {
    let sep = if duration.is_empty() {
        " | ".to_string()
    } else {
        format!(" [{}] ", format_duration(duration))
    };
    format!("{channel_name}{sep}{title}").trim().to_string()
}
