//! Checkbox groups scoped to a container element.

use crate::capabilities::DomQuery;
use crate::{Error, NodeId, Result};

/// Checks or unchecks every checkbox below `container_id` and returns how
/// many checkboxes were visited.
pub fn set_all<H: DomQuery + ?Sized>(
    host: &mut H,
    container_id: &str,
    checked: bool,
) -> Result<usize> {
    let boxes = checkboxes_in(host, container_id)?;
    for node in &boxes {
        host.set_checked(*node, checked)?;
    }
    Ok(boxes.len())
}

pub fn count_checked<H: DomQuery + ?Sized>(host: &H, container_id: &str) -> Result<usize> {
    let mut count = 0;
    for node in checkboxes_in(host, container_id)? {
        if host.checked(node)? {
            count += 1;
        }
    }
    Ok(count)
}

fn checkboxes_in<H: DomQuery + ?Sized>(host: &H, container_id: &str) -> Result<Vec<NodeId>> {
    let container = host
        .element_by_id(container_id)
        .ok_or_else(|| Error::ContainerNotFound(container_id.to_string()))?;
    let mut boxes = Vec::new();
    for input in host.descendant_inputs(container) {
        if host.input_type(input)? == "checkbox" {
            boxes.push(input);
        }
    }
    Ok(boxes)
}
