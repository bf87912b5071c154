//! Error marker on a field's container.
//!
//! Ids may be passed speculatively: a missing element, or one without a
//! container, is skipped without error.

use crate::capabilities::DomQuery;
use crate::settings::Settings;
use crate::{NodeId, Result};

pub fn set_error<H: DomQuery + ?Sized>(
    host: &mut H,
    settings: &Settings,
    field_id: &str,
) -> Result<bool> {
    let Some(container) = container_of(host, field_id) else {
        log::debug!("set_error skipped, no container for #{field_id}");
        return Ok(false);
    };
    host.add_class(container, &settings.error_class)?;
    Ok(true)
}

pub fn clear_error<H: DomQuery + ?Sized>(
    host: &mut H,
    settings: &Settings,
    field_id: &str,
) -> Result<bool> {
    let Some(container) = container_of(host, field_id) else {
        return Ok(false);
    };
    host.remove_class(container, &settings.error_class)?;
    Ok(true)
}

pub fn has_error<H: DomQuery + ?Sized>(
    host: &H,
    settings: &Settings,
    field_id: &str,
) -> Result<bool> {
    match container_of(host, field_id) {
        Some(container) => host.has_class(container, &settings.error_class),
        None => Ok(false),
    }
}

/// Marks every id reported by server-side validation. Returns how many
/// fields were found and marked.
pub fn highlight_errors<H, I, S>(host: &mut H, settings: &Settings, field_ids: I) -> Result<usize>
where
    H: DomQuery + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut marked = 0;
    for field_id in field_ids {
        if set_error(host, settings, field_id.as_ref())? {
            marked += 1;
        }
    }
    Ok(marked)
}

fn container_of<H: DomQuery + ?Sized>(host: &H, field_id: &str) -> Option<NodeId> {
    let field = host.element_by_id(field_id)?;
    host.parent_element(field)
}
