//! Widget configuration.
//!
//! Every field has a default, so a partial JSON object (or `{}`) is a valid
//! configuration.

use serde::{Deserialize, Serialize};

use crate::types::SelectionMode;

/// Who owns the dropdown's open flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenControl {
    /// The controller flips the flag itself.
    #[default]
    Uncontrolled,
    /// The caller owns the flag: the controller only requests changes through
    /// `on_dropdown_toggle` and waits for `set_open`.
    Controlled,
}

/// Wrap-around flags for the field's chips/input/clear row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldKeyboardConfig {
    pub loop_left: bool,
    pub loop_right: bool,
}

/// Wrap-around flags for the dropdown's vertical list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropdownKeyboardConfig {
    pub loop_up: bool,
    pub loop_down: bool,
}

impl Default for DropdownKeyboardConfig {
    fn default() -> Self {
        Self {
            loop_up: true,
            loop_down: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    pub field: FieldKeyboardConfig,
    pub dropdown: DropdownKeyboardConfig,
}

/// Footer visibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    /// A footer component is rendered at all.
    pub enabled: bool,
    pub show_when_searching: bool,
    pub show_when_no_items: bool,
}

/// Complete widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSelectConfig {
    pub mode: SelectionMode,
    pub searchable: bool,
    pub with_select_all: bool,
    pub with_clear_all: bool,
    pub close_on_select: bool,
    /// Render the search input as a sticky row inside the dropdown.
    pub with_dropdown_input: bool,
    /// Maximum dropdown height in pixels.
    pub dropdown_height: f32,
    /// Estimated row height in pixels before measurement.
    pub row_height: f32,
    /// Extra pixels rendered above and below the viewport.
    pub overscan: f32,
    pub keyboard: KeyboardConfig,
    pub footer: FooterConfig,
    pub input_placeholder: String,
    pub no_data_text: String,
    pub no_matches_text: String,
    pub disabled: bool,
    pub open: OpenControl,
}

impl Default for TreeSelectConfig {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Tree,
            searchable: true,
            with_select_all: false,
            with_clear_all: true,
            close_on_select: false,
            with_dropdown_input: false,
            dropdown_height: 300.0,
            row_height: 24.0,
            overscan: 100.0,
            keyboard: KeyboardConfig::default(),
            footer: FooterConfig::default(),
            input_placeholder: "Search...".to_string(),
            no_data_text: "No data".to_string(),
            no_matches_text: "No matches".to_string(),
            disabled: false,
            open: OpenControl::Uncontrolled,
        }
    }
}

impl TreeSelectConfig {
    /// Parses a configuration from JSON, falling back to defaults per field.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = TreeSelectConfig::from_json("{}").unwrap();
        assert_eq!(config, TreeSelectConfig::default());
        assert!(config.keyboard.dropdown.loop_down);
        assert!(!config.keyboard.field.loop_left);
    }

    #[test]
    fn test_partial_override() {
        let config = TreeSelectConfig::from_json(
            r#"{ "mode": "single", "keyboard": { "dropdown": { "loop_up": false } }, "footer": { "enabled": true } }"#,
        )
        .unwrap();
        assert_eq!(config.mode, SelectionMode::Single);
        assert!(!config.keyboard.dropdown.loop_up);
        assert!(config.keyboard.dropdown.loop_down);
        assert!(config.footer.enabled);
        assert_eq!(config.no_matches_text, "No matches");
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(TreeSelectConfig::from_json("{ mode: ").is_err());
    }
}
