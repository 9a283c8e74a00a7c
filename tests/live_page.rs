//! Integration tests against a live Chrome instance.
//!
//! All tests are ignored by default; run with `cargo test -- --ignored`
//! on a machine with Chrome installed.

use darklens::locator::PatternDescriptor;
use darklens::{BrowserSession, LaunchOptions};
use serde_json::json;

fn data_url(html: &str) -> String {
    format!("data:text/html,{}", urlencoding::encode(html))
}

fn launch() -> BrowserSession {
    BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser")
}

const SHOP_HTML: &str = r#"
    <html>
    <head><title>Deals</title></head>
    <body>
        <h1>Super Deals Outlet</h1>
        <p>Only 2 items left in stock! Buy now before they're gone.</p>
        <div style="display:none">You should never see this text</div>
        <button id="accept-offer">Yes, I want to save money</button>
        <span>No thanks, I prefer paying full price</span>
    </body>
    </html>
"#;

#[test]
#[ignore] // Requires Chrome to be installed
fn test_get_page_content_extracts_visible_text() {
    let session = launch();
    session.navigate(&data_url(SHOP_HTML)).expect("Failed to navigate");
    session.wait_for_navigation().expect("Navigation timeout");

    std::thread::sleep(std::time::Duration::from_millis(500));

    let result = session
        .execute_tool("get_page_content", json!({}))
        .expect("Failed to execute get_page_content");

    assert!(result.success);
    let data = result.data.expect("get_page_content returned no data");
    let content = data["content"].as_str().unwrap();

    assert!(content.contains("Only 2 items left in stock!"));
    // Hidden elements are excluded from extraction
    assert!(!content.contains("You should never see this text"));
    assert!(data["element_count"].as_u64().unwrap() > 0);
}

#[test]
#[ignore]
fn test_highlight_lifecycle_on_live_page() {
    let session = launch();
    session.navigate(&data_url(SHOP_HTML)).expect("Failed to navigate");
    session.wait_for_navigation().expect("Navigation timeout");

    std::thread::sleep(std::time::Duration::from_millis(500));

    let pattern = PatternDescriptor::new(
        "Only 2 items left in stock!",
        "Urgency",
        "False scarcity pressures an immediate purchase",
    );

    let result = session
        .execute_tool("add_highlight", json!({"pattern": pattern, "index": 0}))
        .expect("Failed to execute add_highlight");
    assert!(result.success);
    assert_eq!(result.data.unwrap()["matched"], true);

    // The marker class is present in the live DOM
    let tab = session.tab().expect("No active tab");
    let marked = tab
        .evaluate("document.querySelectorAll('.dark-pattern-highlight').length", false)
        .expect("Failed to evaluate");
    assert_eq!(marked.value.unwrap().as_u64().unwrap(), 1);

    let result = session
        .execute_tool("remove_highlight", json!({"index": 0}))
        .expect("Failed to execute remove_highlight");
    assert_eq!(result.data.unwrap()["removed"], true);

    let marked = tab
        .evaluate("document.querySelectorAll('.dark-pattern-highlight').length", false)
        .expect("Failed to evaluate");
    assert_eq!(marked.value.unwrap().as_u64().unwrap(), 0);
}

#[test]
#[ignore]
fn test_add_all_then_remove_all() {
    let session = launch();
    session.navigate(&data_url(SHOP_HTML)).expect("Failed to navigate");
    session.wait_for_navigation().expect("Navigation timeout");

    std::thread::sleep(std::time::Duration::from_millis(500));

    let patterns = vec![
        PatternDescriptor::new(
            "Only 2 items left in stock!",
            "Urgency",
            "False scarcity pressures an immediate purchase",
        ),
        PatternDescriptor::new(
            "No thanks, I prefer paying full price",
            "Confirmshaming",
            "Guilt-laden opt-out wording",
        ),
    ];

    let result = session
        .execute_tool("add_all_highlights", json!({"patterns": patterns}))
        .expect("Failed to execute add_all_highlights");
    assert!(result.success);
    assert_eq!(result.data.unwrap()["highlighted"], 2);

    let result = session
        .execute_tool("remove_all_highlights", json!({}))
        .expect("Failed to execute remove_all_highlights");
    assert!(result.success);

    let tab = session.tab().expect("No active tab");
    let marked = tab
        .evaluate("document.querySelectorAll('.dark-pattern-highlight').length", false)
        .expect("Failed to evaluate");
    assert_eq!(marked.value.unwrap().as_u64().unwrap(), 0);
}

#[test]
#[ignore]
fn test_remove_skips_wrong_element_after_dom_shift() {
    let session = launch();
    session.navigate(&data_url(SHOP_HTML)).expect("Failed to navigate");
    session.wait_for_navigation().expect("Navigation timeout");

    std::thread::sleep(std::time::Duration::from_millis(500));

    let pattern = PatternDescriptor::new(
        "Only 2 items left in stock!",
        "Urgency",
        "False scarcity pressures an immediate purchase",
    );
    session
        .execute_tool("add_highlight", json!({"pattern": pattern, "index": 0}))
        .expect("Failed to execute add_highlight");

    // Shift every recorded nth-child path by prepending a sibling
    let tab = session.tab().expect("No active tab");
    tab.evaluate(
        "document.body.insertBefore(document.createElement('div'), document.body.firstChild) && true",
        false,
    )
    .expect("Failed to mutate page");

    // The recorded path now addresses an undecorated node; removal must not
    // strip anything from it, and the real highlight stays in place
    session
        .execute_tool("remove_highlight", json!({"index": 0}))
        .expect("Failed to execute remove_highlight");

    let marked = tab
        .evaluate("document.querySelectorAll('.dark-pattern-highlight').length", false)
        .expect("Failed to evaluate");
    assert_eq!(marked.value.unwrap().as_u64().unwrap(), 1);

    // The sweep still cleans up regardless of the drift
    session
        .execute_tool("remove_all_highlights", json!({}))
        .expect("Failed to execute remove_all_highlights");
    let marked = tab
        .evaluate("document.querySelectorAll('.dark-pattern-highlight').length", false)
        .expect("Failed to evaluate");
    assert_eq!(marked.value.unwrap().as_u64().unwrap(), 0);
}

#[test]
#[ignore]
fn test_navigation_invalidates_highlights() {
    let session = launch();
    session.navigate(&data_url(SHOP_HTML)).expect("Failed to navigate");
    session.wait_for_navigation().expect("Navigation timeout");

    std::thread::sleep(std::time::Duration::from_millis(500));

    let pattern = PatternDescriptor::new(
        "Only 2 items left in stock!",
        "Urgency",
        "False scarcity",
    );
    session
        .execute_tool("add_highlight", json!({"pattern": pattern.clone(), "index": 0}))
        .expect("Failed to execute add_highlight");

    session
        .navigate(&data_url("<html><body><p>Nothing to see here</p></body></html>"))
        .expect("Failed to navigate");
    session.wait_for_navigation().expect("Navigation timeout");
    assert!(session.page_state().unwrap().snapshot().is_none());

    std::thread::sleep(std::time::Duration::from_millis(500));

    // The same pattern no longer matches on the new page
    let result = session
        .execute_tool("add_highlight", json!({"pattern": pattern, "index": 0}))
        .expect("Failed to execute add_highlight");
    assert!(result.success);
    assert_eq!(result.data.unwrap()["matched"], false);
}
