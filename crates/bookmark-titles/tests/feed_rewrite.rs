//! End-to-end rewrite tests across the four supported page variants.

use bookmark_titles::*;
use scraper::Selector;

// ─────────────────────── fixtures ───────────────────────

const LEGACY_LIST: &str = r#"<html><body>
<ol id="browse-items-primary">
  <li class="expanded-shelf-content-item">
    <span class="video-time">5:3</span>
    <div class="yt-lockup-byline"><a href="/user/foo">Foo</a></div>
    <h3 class="yt-lockup-title"><a href="/watch?v=1">Bar</a></h3>
  </li>
  <li class="expanded-shelf-content-item">
    <span class="video-time"></span>
    <div class="yt-lockup-byline"><a href="/user/foo">Foo</a></div>
    <h3 class="yt-lockup-title"><a href="/watch?v=2">Live now</a></h3>
  </li>
</ol>
</body></html>"#;

const LEGACY_GRID: &str = r#"<html><body>
<div id="browse-items-primary"><ul>
  <li class="yt-shelf-grid-item">
    <span class="video-time">1:02:03</span>
    <div class="yt-lockup-byline"><a>Foo</a></div>
    <h3 class="yt-lockup-title"><a>Bar</a></h3>
  </li>
</ul></div>
</body></html>"#;

const COMPONENT_LIST: &str = r#"<html><body><ytd-app><ytd-browse>
<div class="ytd-browse"><div id="primary"><div id="contents">
  <ytd-item-section-renderer>
    <ytd-thumbnail-overlay-time-status-renderer>
      <span class="style-scope ytd-thumbnail-overlay-time-status-renderer">
        5:3
      </span>
    </ytd-thumbnail-overlay-time-status-renderer>
    <div id="meta">
      <h3><a id="video-title"> Bar </a></h3>
      <ytd-video-meta-block><div id="byline"><a>Foo</a></div></ytd-video-meta-block>
    </div>
  </ytd-item-section-renderer>
</div></div></div>
</ytd-browse></ytd-app></body></html>"#;

const COMPONENT_GRID: &str = r#"<html><body><ytd-app><ytd-browse>
<div class="ytd-browse"><div id="primary"><div id="contents">
  <ytd-grid-renderer><div id="items">
    <ytd-grid-video-renderer>
      <ytd-thumbnail-overlay-time-status-renderer>
        <span class="ytd-thumbnail-overlay-time-status-renderer">12:34</span>
      </ytd-thumbnail-overlay-time-status-renderer>
      <div id="details">
        <h3><a id="video-title">Baz</a></h3>
        <div id="byline-container"><div id="byline"><a>Qux</a></div></div>
      </div>
    </ytd-grid-video-renderer>
  </div></ytd-grid-renderer>
</div></div></div>
</ytd-browse></ytd-app></body></html>"#;

/// An item whose duration badge has not been filled in yet.
const PENDING_COMPONENT_ITEM: &str = r#"<ytd-item-section-renderer class="late">
  <ytd-thumbnail-overlay-time-status-renderer>
    <span class="ytd-thumbnail-overlay-time-status-renderer"></span>
  </ytd-thumbnail-overlay-time-status-renderer>
  <div id="meta">
    <h3><a id="video-title">Fresh</a></h3>
    <ytd-video-meta-block><div id="byline"><a>Late Channel</a></div></ytd-video-meta-block>
  </div>
</ytd-item-section-renderer>"#;

// ─────────────────────── helpers ───────────────────────

fn sel(s: &str) -> Selector {
    Selector::parse(s).unwrap()
}

fn texts(page: &Page, selector: &str) -> Vec<String> {
    let root = page.query(&sel("html")).unwrap();
    page.query_all_within(root, &sel(selector))
        .into_iter()
        .map(|id| page.text(id).unwrap())
        .collect()
}

// ─────────────────────── modes ───────────────────────

#[test]
fn legacy_list_rewrites_both_separators() {
    let mut page = Page::parse(LEGACY_LIST);
    let rewriter = Rewriter::default();
    assert_eq!(
        rewriter.mode(&page),
        StructuralMode::new(Family::Legacy, Layout::List)
    );

    let report = rewriter.run(&mut page);
    assert!(report.container_found);
    assert_eq!(report.items, 2);
    assert_eq!(report.rewritten, 2);
    assert_eq!(
        texts(&page, ".yt-lockup-title > a"),
        vec!["Foo [05:03] Bar", "Foo | Live now"]
    );
}

#[test]
fn legacy_grid_uses_grid_item_locator() {
    let mut page = Page::parse(LEGACY_GRID);
    let rewriter = Rewriter::default();
    assert_eq!(
        rewriter.mode(&page),
        StructuralMode::new(Family::Legacy, Layout::Grid)
    );

    assert_eq!(rewriter.run(&mut page).rewritten, 1);
    assert_eq!(texts(&page, ".yt-lockup-title > a"), vec!["Foo [01:02:03] Bar"]);
}

#[test]
fn component_list_trims_badge_whitespace() {
    let mut page = Page::parse(COMPONENT_LIST);
    let rewriter = Rewriter::default();
    assert_eq!(
        rewriter.mode(&page),
        StructuralMode::new(Family::Component, Layout::List)
    );

    assert_eq!(rewriter.run(&mut page).rewritten, 1);
    assert_eq!(texts(&page, "#video-title"), vec!["Foo [05:03] Bar"]);
}

#[test]
fn component_grid_uses_layout_overrides() {
    let mut page = Page::parse(COMPONENT_GRID);
    let rewriter = Rewriter::default();
    assert_eq!(
        rewriter.mode(&page),
        StructuralMode::new(Family::Component, Layout::Grid)
    );

    assert_eq!(rewriter.run(&mut page).rewritten, 1);
    assert_eq!(texts(&page, "#video-title"), vec!["Qux [12:34] Baz"]);
}

// ─────────────────────── idempotence ───────────────────────

#[test]
fn second_run_changes_nothing() {
    let mut page = Page::parse(LEGACY_LIST);
    let rewriter = Rewriter::default();
    rewriter.run(&mut page);
    let after_first = page.html();

    let report = rewriter.run(&mut page);
    assert_eq!(report.rewritten, 0);
    assert_eq!(report.already_processed, 2);
    assert_eq!(page.html(), after_first);
    assert_eq!(texts(&page, "[data-ytsbtp-processed=\"1\"]").len(), 2);
}

#[test]
fn mode_is_frozen_after_first_use() {
    let mut page = Page::parse(LEGACY_LIST);
    let rewriter = Rewriter::default();
    let before = rewriter.mode(&page);

    let body = page.query(&sel("body")).unwrap();
    page.append_html(body, "<ytd-app></ytd-app><ytd-grid-renderer></ytd-grid-renderer>");
    assert_eq!(rewriter.mode(&page), before);
    assert_eq!(rewriter.run(&mut page).rewritten, 2);
}

// ─────────────────────── change watching ───────────────────────

#[test]
fn late_badge_triggers_single_rescan() {
    let mut page = Page::parse(COMPONENT_LIST);
    let mut rewriter = Rewriter::default();
    assert_eq!(rewriter.start(&mut page).unwrap().rewritten, 1);
    assert!(rewriter.pump(&mut page).is_none());

    let contents = page.query(&sel("#contents")).unwrap();
    page.append_html(contents, PENDING_COMPONENT_ITEM);
    // item shell alone does not qualify
    assert!(rewriter.pump(&mut page).is_none());
    assert_eq!(texts(&page, ".late #video-title"), vec!["Fresh"]);

    let badge = page
        .query(&sel(".late .ytd-thumbnail-overlay-time-status-renderer"))
        .unwrap();
    page.append_html(badge, "7:5");

    let report = rewriter.pump(&mut page).unwrap();
    assert_eq!(report.items, 2);
    assert_eq!(report.rewritten, 1);
    assert_eq!(report.already_processed, 1);
    assert_eq!(texts(&page, ".late #video-title"), vec!["Late Channel [07:05] Fresh"]);

    // the rescan's own writes are filtered out
    assert!(rewriter.pump(&mut page).is_none());
}

#[test]
fn many_qualifying_records_one_rescan() {
    let mut page = Page::parse(COMPONENT_LIST);
    let mut rewriter = Rewriter::default();
    rewriter.start(&mut page);
    rewriter.pump(&mut page);

    let contents = page.query(&sel("#contents")).unwrap();
    page.append_html(contents, PENDING_COMPONENT_ITEM);
    page.append_html(contents, PENDING_COMPONENT_ITEM);
    let badges = page.query_all_within(
        contents,
        &sel(".late .ytd-thumbnail-overlay-time-status-renderer"),
    );
    assert_eq!(badges.len(), 2);
    for badge in badges {
        page.append_html(badge, "0:42");
    }

    let report = rewriter.pump(&mut page).unwrap();
    assert_eq!(report.rewritten, 2);
    assert!(rewriter.pump(&mut page).is_none());
    assert_eq!(
        texts(&page, ".late #video-title"),
        vec!["Late Channel [00:42] Fresh", "Late Channel [00:42] Fresh"]
    );
}

#[test]
fn changes_outside_container_are_not_seen() {
    let mut page = Page::parse(COMPONENT_LIST);
    let mut rewriter = Rewriter::default();
    rewriter.start(&mut page);
    rewriter.pump(&mut page);

    let body = page.query(&sel("body")).unwrap();
    page.append_html(
        body,
        r#"<div><span class="ytd-thumbnail-overlay-time-status-renderer"></span></div>"#,
    );
    let stray = page
        .query_all_within(body, &sel("div > .ytd-thumbnail-overlay-time-status-renderer"))
        .pop()
        .unwrap();
    page.append_html(stray, "1:00");
    assert!(rewriter.pump(&mut page).is_none());
}
