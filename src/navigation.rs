//! Confirmation prompts in front of destructive links and batch actions.

use crate::capabilities::{Dialogs, Navigator};
use crate::settings::Settings;

/// Navigates to `destination` only when the user accepts `message`.
/// Returns whether navigation happened.
pub fn confirm_and_navigate<H>(host: &mut H, message: &str, destination: &str) -> bool
where
    H: Dialogs + Navigator + ?Sized,
{
    if !host.confirm(message) {
        log::debug!("navigation to {destination} declined");
        return false;
    }
    host.navigate(destination);
    true
}

pub fn confirm_delete<H>(host: &mut H, settings: &Settings, destination: &str) -> bool
where
    H: Dialogs + Navigator + ?Sized,
{
    confirm_and_navigate(host, &settings.delete_message, destination)
}

/// Asks before a batch delete. The caller decides whether to submit.
pub fn confirm_multi_delete<H: Dialogs + ?Sized>(host: &mut H, settings: &Settings) -> bool {
    host.confirm(&settings.multi_delete_message)
}
