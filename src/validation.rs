//! Advisory required-field check for forms.
//!
//! This only improves feedback in the page; the server must still enforce
//! every constraint.

use crate::capabilities::{DomQuery, Viewport};
use crate::highlight::{clear_error, set_error};
use crate::html::escape_text;
use crate::membership::Value;
use crate::required_fields::RequiredFields;
use crate::settings::Settings;
use crate::{Error, Result};

/// Recognized control kinds. Anything new must be added here deliberately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Text,
    Password,
    SelectOne,
    TextArea,
    Checkbox,
    Other,
}

impl InputKind {
    /// Kind for an element tag plus its `type` attribute (for inputs) or
    /// `multiple` flag (for selects).
    pub fn classify(tag: &str, input_type: Option<&str>, multiple: bool) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "input" => match input_type
                .map(str::to_ascii_lowercase)
                .as_deref()
                .unwrap_or("text")
            {
                "text" | "" => Self::Text,
                "password" => Self::Password,
                "checkbox" => Self::Checkbox,
                _ => Self::Other,
            },
            "select" if !multiple => Self::SelectOne,
            "textarea" => Self::TextArea,
            _ => Self::Other,
        }
    }

    /// Kinds whose emptiness the validator checks.
    pub fn is_validated(self) -> bool {
        match self {
            Self::Text | Self::Password | Self::SelectOne | Self::TextArea => true,
            Self::Checkbox | Self::Other => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControl {
    pub id: String,
    pub kind: InputKind,
    pub value: String,
}

impl FormControl {
    pub fn new(id: &str, kind: InputKind, value: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            value: value.to_string(),
        }
    }
}

/// Ids that the last validation run flagged, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub missing: Vec<String>,
    pub checked: usize,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Validates the controls of the form `form_id`.
///
/// Returns `Ok(false)` when a required field is empty, after revealing the
/// alert banner and scrolling to the top. A form id that does not resolve is
/// an [`Error::ElementNotFound`]; settings with blank names are an
/// [`Error::Config`].
pub fn validate<H>(
    host: &mut H,
    settings: &Settings,
    form_id: &str,
    required: &RequiredFields,
    alert_message: Option<&str>,
) -> Result<bool>
where
    H: DomQuery + Viewport + ?Sized,
{
    settings.validate()?;
    let form = host
        .element_by_id(form_id)
        .ok_or_else(|| Error::ElementNotFound(form_id.to_string()))?;
    let controls = host.form_controls(form)?;
    validate_controls(host, settings, &controls, required, alert_message)
}

pub fn validate_controls<H>(
    host: &mut H,
    settings: &Settings,
    controls: &[FormControl],
    required: &RequiredFields,
    alert_message: Option<&str>,
) -> Result<bool>
where
    H: DomQuery + Viewport + ?Sized,
{
    let report = scan_controls(host, settings, controls, required)?;
    if report.passed() {
        return Ok(true);
    }

    let message = alert_message.unwrap_or(&settings.default_alert_message);
    log::debug!(
        "validation failed: {} empty of {} checked ({})",
        report.missing.len(),
        report.checked,
        report.missing.join(",")
    );
    show_alert(host, settings, message)?;
    host.scroll_to(0, 0);
    Ok(false)
}

/// Marks or clears each required control without touching the banner.
pub fn scan_controls<H>(
    host: &mut H,
    settings: &Settings,
    controls: &[FormControl],
    required: &RequiredFields,
) -> Result<ValidationReport>
where
    H: DomQuery + ?Sized,
{
    let mut report = ValidationReport::default();
    for control in controls {
        if control.id.is_empty() || !control.kind.is_validated() {
            continue;
        }
        if !required.contains_value(&Value::from(&control.id)) {
            continue;
        }

        report.checked += 1;
        if control.value.is_empty() {
            set_error(host, settings, &control.id)?;
            report.missing.push(control.id.clone());
        } else {
            clear_error(host, settings, &control.id)?;
        }
    }
    Ok(report)
}

fn show_alert<H: DomQuery + ?Sized>(
    host: &mut H,
    settings: &Settings,
    message: &str,
) -> Result<()> {
    if let Some(container) = host.element_by_id(&settings.alert_container_id) {
        host.set_visible(container, true)?;
    }
    let Some(target) = host.element_by_id(&settings.alert_message_id) else {
        return Ok(());
    };
    if let Err(err) = host.set_inner_html(target, message) {
        log::warn!("alert message is not valid markup, showing it as text: {err}");
        host.set_inner_html(target, &escape_text(message))?;
    }
    Ok(())
}
