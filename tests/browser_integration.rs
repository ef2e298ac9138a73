use std::time::Duration;
use toc_navigator::{BrowserSession, LaunchOptions, Locator, Navigator, NavigatorConfig, RenderContext, TocTarget};

/// Sidebar with two nested collapsed groups; clicking a chevron opens its group,
/// clicking a leaf fills the documentation pane
const SIDEBAR_PAGE: &str = concat!(
    "data:text/html,<html><body>",
    "<div class='filter-api-sidebar-wrapper'><ul>",
    "<li id='intro' class='toc-item-highlight' onclick='show(\"Welcome to the storage API reference documentation.\")'>Introduction</li>",
    "<li class='toc-item-highlight'><div><i class='dds__icon dds__icon--chevron-right' onclick='openGroup(this)'>&gt;</i>",
    "<div class='align-middle dds__text-truncate'>Chapter 1</div></div>",
    "<ul style='display:none'>",
    "<li class='toc-item-highlight'><div><i class='dds__icon dds__icon--chevron-right' onclick='openGroup(this)'>&gt;</i>",
    "<div class='align-middle dds__text-truncate'>Chapter 1.2</div></div>",
    "<ul style='display:none'>",
    "<li id='install' class='toc-item-highlight' onclick='show(\"<h2>Install Guide</h2><p>Run the installer on every storage node before joining the cluster.</p>\")'>Install <b>Guide</b> (v2)</li>",
    "</ul></li></ul></li></ul></div>",
    "<div id='documentation'></div>",
    "<script>",
    "function openGroup(el) { el.className = 'dds__icon dds__icon--chevron-down'; el.parentElement.nextElementSibling.style.display = 'block'; }",
    "function show(html) { document.getElementById('documentation').innerHTML = html; }",
    "</script>",
    "</body></html>"
);

fn launch() -> BrowserSession {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");
    session.navigate(SIDEBAR_PAGE).expect("Failed to navigate");
    session
        .wait_for_element("div.filter-api-sidebar-wrapper", Duration::from_secs(5))
        .expect("Sidebar did not render");
    session
}

fn config() -> NavigatorConfig {
    let mut config = NavigatorConfig::new().without_delays();
    config.content_wait_timeout_ms = 2_000;
    config.min_content_length = 20;
    config
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_expansion_path_in_live_page() {
    let session = launch();
    let navigator = Navigator::new(&session, config()).expect("Failed to create navigator");

    let lookup = navigator.find_expansion_path(&TocTarget::by_id("install"));
    let labels: Vec<_> = lookup.expansions().iter().map(|e| e.menu_text.as_str()).collect();

    assert!(lookup.found());
    assert!(!lookup.already_visible());
    assert_eq!(labels, vec!["Chapter 1", "Chapter 1.2"]);
}

#[test]
#[ignore]
fn test_open_nested_entry() {
    let session = launch();
    let mut navigator = Navigator::new(&session, config()).expect("Failed to create navigator");

    let text = navigator
        .open(&TocTarget::by_text("Install Guide"))
        .expect("Navigation failed")
        .expect("No content");

    assert!(text.contains("Install Guide"));
    assert!(text.contains("Run the installer"));
    assert!(session.is_visible(&Locator::id("install")).unwrap());
    assert!(navigator.cache().is_expanded("Chapter 1.2"));
}

#[test]
#[ignore]
fn test_text_match_spans_inline_markup() {
    let session = launch();
    let navigator = Navigator::new(&session, config()).expect("Failed to create navigator");

    let lookup = navigator.find_expansion_path(&TocTarget::by_text("Install Guide (v2)"));
    assert_eq!(lookup.target(), Some(&Locator::id("install")));
}

#[test]
#[ignore]
fn test_missing_entry() {
    let session = launch();
    let mut navigator = Navigator::new(&session, config()).expect("Failed to create navigator");

    let content = navigator.open(&TocTarget::by_id("does-not-exist")).expect("Navigation failed");
    assert_eq!(content, None);
}
