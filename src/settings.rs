use crate::{Error, Result};

pub const DEFAULT_ALERT_MESSAGE: &str = "Fill in all required fields!";
pub const DEFAULT_DELETE_MESSAGE: &str = "Are you sure you want to delete this item?";
pub const DEFAULT_MULTI_DELETE_MESSAGE: &str = "Are you sure you want to delete selected items?";

/// Names and messages shared by the helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub error_class: String,
    pub alert_container_id: String,
    pub alert_message_id: String,
    pub default_alert_message: String,
    pub delete_message: String,
    pub multi_delete_message: String,
    /// Appended to the child select's id to form the loading indicator's id.
    pub indicator_id_suffix: String,
    pub indicator_class: String,
    pub indicator_transition_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            error_class: "has-error".to_string(),
            alert_container_id: "global_alert".to_string(),
            alert_message_id: "global_alert_msg".to_string(),
            default_alert_message: DEFAULT_ALERT_MESSAGE.to_string(),
            delete_message: DEFAULT_DELETE_MESSAGE.to_string(),
            multi_delete_message: DEFAULT_MULTI_DELETE_MESSAGE.to_string(),
            indicator_id_suffix: "_loader".to_string(),
            indicator_class: "loader".to_string(),
            indicator_transition_ms: 200,
        }
    }
}

impl Settings {
    pub fn with_error_class(mut self, class_name: &str) -> Self {
        self.error_class = class_name.to_string();
        self
    }

    pub fn with_alert_ids(mut self, container_id: &str, message_id: &str) -> Self {
        self.alert_container_id = container_id.to_string();
        self.alert_message_id = message_id.to_string();
        self
    }

    pub fn with_default_alert_message(mut self, message: &str) -> Self {
        self.default_alert_message = message.to_string();
        self
    }

    pub fn with_delete_messages(mut self, single: &str, multiple: &str) -> Self {
        self.delete_message = single.to_string();
        self.multi_delete_message = multiple.to_string();
        self
    }

    pub fn with_indicator_transition_ms(mut self, duration_ms: u32) -> Self {
        self.indicator_transition_ms = duration_ms;
        self
    }

    pub fn indicator_id(&self, child_id: &str) -> String {
        format!("{child_id}{}", self.indicator_id_suffix)
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("error_class", &self.error_class),
            ("alert_container_id", &self.alert_container_id),
            ("alert_message_id", &self.alert_message_id),
            ("indicator_id_suffix", &self.indicator_id_suffix),
        ];
        for (name, value) in checks {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{name} must not be empty")));
            }
            if value.chars().any(char::is_whitespace) {
                return Err(Error::Config(format!(
                    "{name} must not contain whitespace: {value:?}"
                )));
            }
        }
        Ok(())
    }
}
