use super::*;
use crate::navigation::{confirm_and_navigate, confirm_delete, confirm_multi_delete};
use crate::settings::{DEFAULT_DELETE_MESSAGE, DEFAULT_MULTI_DELETE_MESSAGE};

#[test]
fn accepted_delete_navigates_to_the_destination() -> Result<()> {
    let mut page = Page::from_html("<p>items</p>")?;
    page.enqueue_confirm_response(true);

    assert!(confirm_delete(&mut page, &Settings::default(), "/admin/items/3/delete/"));

    assert_eq!(page.take_confirm_messages(), vec![DEFAULT_DELETE_MESSAGE.to_string()]);
    assert_eq!(
        page.take_navigations(),
        vec![Navigation {
            to: "/admin/items/3/delete/".into(),
            at_ms: 0,
        }]
    );
    Ok(())
}

#[test]
fn declined_prompt_does_not_navigate() -> Result<()> {
    let mut page = Page::from_html("<p>items</p>")?;
    page.enqueue_confirm_response(false);

    assert!(!confirm_and_navigate(&mut page, "Leave this page?", "/elsewhere"));

    assert_eq!(page.take_confirm_messages(), vec!["Leave this page?".to_string()]);
    assert!(page.take_navigations().is_empty());
    Ok(())
}

#[test]
fn queued_answers_run_out_into_the_default() -> Result<()> {
    let mut page = Page::from_html("<p>items</p>")?;
    page.set_default_confirm_response(true);
    page.enqueue_confirm_response(false);

    assert!(!confirm_and_navigate(&mut page, "first", "/a"));
    assert!(confirm_and_navigate(&mut page, "second", "/b"));

    let destinations = page
        .take_navigations()
        .into_iter()
        .map(|navigation| navigation.to)
        .collect::<Vec<_>>();
    assert_eq!(destinations, vec!["/b"]);
    Ok(())
}

#[test]
fn multi_delete_only_asks() -> Result<()> {
    let mut page = Page::from_html("<p>items</p>")?;
    let settings = Settings::default();

    assert!(!confirm_multi_delete(&mut page, &settings));
    page.enqueue_confirm_response(true);
    assert!(confirm_multi_delete(&mut page, &settings));

    assert_eq!(
        page.take_confirm_messages(),
        vec![
            DEFAULT_MULTI_DELETE_MESSAGE.to_string(),
            DEFAULT_MULTI_DELETE_MESSAGE.to_string()
        ]
    );
    assert!(page.take_navigations().is_empty());
    Ok(())
}

#[test]
fn custom_delete_message_is_shown() -> Result<()> {
    let mut page = Page::from_html("<p>items</p>")?;
    page.enqueue_confirm_response(true);
    let settings = Settings::default().with_delete_messages("Remove user?", "Remove users?");

    assert!(confirm_delete(&mut page, &settings, "/users/9/delete/"));
    assert_eq!(page.take_confirm_messages(), vec!["Remove user?".to_string()]);
    Ok(())
}

#[test]
fn navigation_records_the_virtual_clock() -> Result<()> {
    let mut page = Page::from_html("<p>items</p>")?;
    page.set_default_confirm_response(true);
    page.advance_time(1_500)?;

    assert!(confirm_and_navigate(&mut page, "go?", "/later"));
    assert_eq!(page.take_navigations()[0].at_ms, 1_500);
    Ok(())
}
