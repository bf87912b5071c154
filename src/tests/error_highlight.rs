use super::*;
use crate::highlight::{clear_error, has_error, highlight_errors, set_error};

const FIELDS_HTML: &str = r#"
    <div id="title_row" class="field"><input id="title"></div>
    <div id="price_row" class="field"><input id="price"></div>
    "#;

#[test]
fn set_error_marks_the_direct_container() -> Result<()> {
    let mut page = Page::from_html(FIELDS_HTML)?;
    let settings = Settings::default();

    assert!(set_error(&mut page, &settings, "title")?);

    page.assert_has_class("#title_row", "has-error", true)?;
    page.assert_has_class("#title_row", "field", true)?;
    page.assert_has_class("#title", "has-error", false)?;
    page.assert_has_class("#price_row", "has-error", false)?;
    assert!(has_error(&page, &settings, "title")?);
    Ok(())
}

#[test]
fn marking_twice_keeps_a_single_class_token() -> Result<()> {
    let mut page = Page::from_html(FIELDS_HTML)?;
    let settings = Settings::default();

    set_error(&mut page, &settings, "title")?;
    set_error(&mut page, &settings, "title")?;

    let row = page.dump_dom("#title_row")?;
    assert_eq!(row.matches("has-error").count(), 1, "{row}");
    Ok(())
}

#[test]
fn clear_error_removes_only_the_error_class() -> Result<()> {
    let mut page = Page::from_html(FIELDS_HTML)?;
    let settings = Settings::default();
    set_error(&mut page, &settings, "price")?;

    assert!(clear_error(&mut page, &settings, "price")?);
    assert!(clear_error(&mut page, &settings, "price")?);

    page.assert_has_class("#price_row", "has-error", false)?;
    page.assert_has_class("#price_row", "field", true)?;
    Ok(())
}

#[test]
fn unknown_ids_are_skipped() -> Result<()> {
    let mut page = Page::from_html(FIELDS_HTML)?;
    let settings = Settings::default();

    assert!(!set_error(&mut page, &settings, "ghost")?);
    assert!(!clear_error(&mut page, &settings, "ghost")?);
    assert!(!has_error(&page, &settings, "ghost")?);
    Ok(())
}

#[test]
fn highlight_errors_counts_fields_it_found() -> Result<()> {
    let mut page = Page::from_html(FIELDS_HTML)?;
    let settings = Settings::default();

    let marked = highlight_errors(&mut page, &settings, ["title", "missing", "price"])?;

    assert_eq!(marked, 2);
    page.assert_has_class("#title_row", "has-error", true)?;
    page.assert_has_class("#price_row", "has-error", true)?;
    Ok(())
}

#[test]
fn error_class_is_configurable() -> Result<()> {
    let mut page = Page::from_html(FIELDS_HTML)?;
    let settings = Settings::default().with_error_class("is-invalid");

    set_error(&mut page, &settings, "title")?;

    page.assert_has_class("#title_row", "is-invalid", true)?;
    page.assert_has_class("#title_row", "has-error", false)?;
    Ok(())
}
