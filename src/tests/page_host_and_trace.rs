use super::*;

const SIMPLE_HTML: &str = r#"
    <div id="box" class="panel"><span id="label">Hello <b>world</b></span></div>
    <div id="banner" hidden><p id="inner">hidden text</p></div>
    <input id="qty" value="3">
    "#;

#[test]
fn assertions_report_the_failing_selector_and_snippet() -> Result<()> {
    let page = Page::from_html(SIMPLE_HTML)?;
    page.assert_text("#label", "Hello world")?;
    page.assert_value("#qty", "3")?;

    match page.assert_text("#label", "Bye") {
        Err(Error::AssertionFailed {
            selector,
            expected,
            actual,
            dom_snippet,
        }) => {
            assert_eq!(selector, "#label");
            assert_eq!(expected, "Bye");
            assert_eq!(actual, "Hello world");
            assert!(dom_snippet.starts_with("<span id=\"label\">"));
        }
        other => panic!("unexpected assertion result: {other:?}"),
    }
    Ok(())
}

#[test]
fn visibility_follows_hidden_ancestors() -> Result<()> {
    let mut page = Page::from_html(SIMPLE_HTML)?;
    page.assert_visible("#box", true)?;
    page.assert_visible("#inner", false)?;

    let banner = page.select_one("#banner")?;
    page.set_visible(banner, true)?;
    page.assert_visible("#inner", true)?;
    page.set_visible(banner, false)?;
    page.assert_visible("#banner", false)?;
    Ok(())
}

#[test]
fn only_id_selectors_are_supported() -> Result<()> {
    let page = Page::from_html(SIMPLE_HTML)?;
    assert_eq!(
        page.assert_exists(".panel"),
        Err(Error::UnsupportedSelector(".panel".into()))
    );
    assert_eq!(
        page.assert_exists("#box span"),
        Err(Error::UnsupportedSelector("#box span".into()))
    );
    assert_eq!(
        page.assert_exists("#nope"),
        Err(Error::ElementNotFound("#nope".into()))
    );
    page.assert_missing("#nope")?;
    assert!(matches!(
        page.assert_missing("#box"),
        Err(Error::AssertionFailed { .. })
    ));
    Ok(())
}

#[test]
fn malformed_markup_is_rejected() {
    assert!(matches!(
        Page::from_html(r#"<div id="a"#),
        Err(Error::HtmlParse(_))
    ));
}

#[test]
fn trace_logs_capture_dom_and_network_when_enabled() -> Result<()> {
    let mut page = Page::from_html(SIMPLE_HTML)?;
    let boxed = page.select_one("#box")?;
    page.add_class(boxed, "quiet")?;
    assert!(page.take_trace_logs().is_empty());

    page.enable_trace(true);
    page.add_class(boxed, "busy")?;
    page.set_fetch_mock("/ping", "pong");
    let request = page.begin_get("/ping");
    let response = page.poll_response();

    let logs = page.take_trace_logs();
    assert!(logs.iter().any(|line| line == "[dom] add_class #box class=busy"));
    assert!(logs.iter().any(|line| line.starts_with("[fetch] GET /ping")));
    assert!(logs.iter().any(|line| line.starts_with("[fetch] response /ping")));
    assert!(page.take_trace_logs().is_empty());
    assert_eq!(response.map(|response| response.request), Some(request));
    Ok(())
}

#[test]
fn trace_categories_can_be_disabled() -> Result<()> {
    let mut page = Page::from_html(SIMPLE_HTML)?;
    page.enable_trace(true);
    page.set_trace_dom(false);
    let boxed = page.select_one("#box")?;
    page.add_class(boxed, "busy")?;
    page.begin_get("/missing");

    let logs = page.take_trace_logs();
    assert!(logs.iter().all(|line| !line.starts_with("[dom]")));
    assert!(logs.iter().any(|line| line.starts_with("[fetch]")));

    page.set_trace_dom(true);
    page.set_trace_network(false);
    page.begin_get("/missing");
    page.remove_class(boxed, "busy")?;
    let logs = page.take_trace_logs();
    assert!(logs.iter().all(|line| !line.starts_with("[fetch]")));
    assert!(logs.iter().any(|line| line.starts_with("[dom] remove_class")));
    Ok(())
}

#[test]
fn trace_log_limit_keeps_the_newest_lines() -> Result<()> {
    let mut page = Page::from_html(SIMPLE_HTML)?;
    assert!(matches!(
        page.set_trace_log_limit(0),
        Err(Error::Runtime(_))
    ));

    page.enable_trace(true);
    for class_name in ["a", "b", "c", "d"] {
        let boxed = page.select_one("#box")?;
        page.add_class(boxed, class_name)?;
    }
    page.set_trace_log_limit(2)?;

    assert_eq!(
        page.take_trace_logs(),
        vec![
            "[dom] add_class #box class=c".to_string(),
            "[dom] add_class #box class=d".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn responses_arrive_by_due_time_then_issue_order() -> Result<()> {
    let mut page = Page::from_html(SIMPLE_HTML)?;
    page.set_fetch_mock_with_delay("/slow", "s", 30);
    page.set_fetch_mock_with_delay("/fast", "f", 10);
    page.set_fetch_mock_with_delay("/also-fast", "a", 10);

    page.begin_get("/slow");
    page.begin_get("/fast");
    page.begin_get("/also-fast");
    assert!(page.poll_response().is_none());
    assert_eq!(page.pending_fetch_count(), 3);

    page.advance_time(30)?;
    let mut urls = Vec::new();
    while let Some(response) = page.poll_response() {
        urls.push(response.url);
    }
    assert_eq!(urls, vec!["/fast", "/also-fast", "/slow"]);
    assert_eq!(
        page.take_fetch_calls(),
        vec!["/slow".to_string(), "/fast".into(), "/also-fast".into()]
    );
    Ok(())
}

#[test]
fn negative_time_is_rejected() -> Result<()> {
    let mut page = Page::from_html(SIMPLE_HTML)?;
    assert!(matches!(page.advance_time(-1), Err(Error::Runtime(_))));
    assert_eq!(page.now_ms(), 0);
    Ok(())
}

#[test]
fn inner_html_replacement_updates_the_id_index() -> Result<()> {
    let mut page = Page::from_html(SIMPLE_HTML)?;
    let boxed = page.select_one("#box")?;

    page.set_inner_html(boxed, r#"<em id="fresh">new</em>"#)?;

    page.assert_missing("#label")?;
    page.assert_text("#fresh", "new")?;
    page.assert_text("#box", "new")?;
    Ok(())
}

#[test]
fn select_rejects_non_select_targets() -> Result<()> {
    let mut page = Page::from_html(SIMPLE_HTML)?;
    assert!(matches!(
        page.select("#qty", "4"),
        Err(Error::TypeMismatch { .. })
    ));
    Ok(())
}
