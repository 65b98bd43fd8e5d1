//! Props handed to presentation components.
//!
//! Every component receives the same envelope: root attributes that must be
//! applied to its outermost element, its own computed state, and the static
//! custom props the caller configured for the slot.

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::controller::WidgetEvent;

/// Custom props of a slot nobody configured.
pub static EMPTY_CUSTOM_PROPS: Lazy<Value> = Lazy::new(|| Value::Object(Map::new()));

/// Wiring for a component's outermost element.
///
/// The host dispatches `on_activate` when the outermost element reports
/// activation; a component that hides its outer response breaks this.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RootAttributes {
    /// Stable identity among siblings.
    pub key: String,
    /// Focus tag (see [`crate::FocusTarget::tag`]) for focusable elements.
    pub focus_tag: Option<String>,
    /// The element holds the logical keyboard focus.
    pub focused: bool,
    pub on_activate: Option<WidgetEvent>,
}

impl RootAttributes {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn focusable(mut self, tag: String, focused: bool) -> Self {
        self.focus_tag = Some(tag);
        self.focused = focused;
        self
    }

    pub fn on_activate(mut self, event: WidgetEvent) -> Self {
        self.on_activate = Some(event);
        self
    }
}

/// Attributes plus own props, before custom props are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementProps<P> {
    pub attributes: RootAttributes,
    pub own: P,
}

impl<P> ElementProps<P> {
    pub fn new(attributes: RootAttributes, own: P) -> Self {
        Self { attributes, own }
    }

    /// Pairs with a slot's custom props.
    pub fn with_custom<'c>(&self, custom: &'c Value) -> ComponentProps<'c, P>
    where
        P: Clone,
    {
        ComponentProps {
            attributes: self.attributes.clone(),
            own: self.own.clone(),
            custom,
        }
    }

    /// Pairs with empty custom props.
    pub fn bare(&self) -> ComponentProps<'static, P>
    where
        P: Clone,
    {
        self.with_custom(&EMPTY_CUSTOM_PROPS)
    }
}

/// The full envelope a component renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentProps<'c, P> {
    pub attributes: RootAttributes,
    pub own: P,
    pub custom: &'c Value,
}

// ===== Own props per slot =====

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldProps {
    pub disabled: bool,
    pub open: bool,
    pub has_focus: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipProps {
    pub label: String,
    pub path: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipClearProps {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldClearProps {
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputProps {
    pub value: String,
    pub placeholder: String,
    pub disabled: bool,
    /// Rendered as a sticky dropdown row rather than inside the field.
    pub in_dropdown: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectAllProps {
    pub label: String,
    pub checked: bool,
    pub partial: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowProps {
    pub label: String,
    pub path: String,
    pub depth: usize,
    pub checked: bool,
    pub partial: bool,
    pub disabled: bool,
    pub expanded: bool,
    pub expandable: bool,
    pub matched: bool,
    /// Radio semantics (`Single` mode) instead of a checkbox.
    pub single: bool,
    /// The row sits in a tree (`Tree`/`TreeFlat`); leaves reserve the
    /// toggle's width so labels line up.
    pub hierarchical: bool,
    /// Tree branch guides: for each ancestor level, whether more siblings follow.
    pub branch_context: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandToggleProps {
    pub expanded: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FooterProps {
    pub searching: bool,
    pub empty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderProps {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_props_have_empty_custom() {
        let element = ElementProps::new(RootAttributes::new("footer"), FooterProps::default());
        let props = element.bare();
        assert_eq!(props.custom, &json!({}));
        assert!(props.attributes.on_activate.is_none());
    }

    #[test]
    fn test_with_custom_keeps_attributes() {
        let element = ElementProps::new(
            RootAttributes::new("clear")
                .focusable("field:clear".to_string(), true)
                .on_activate(WidgetEvent::ClearAll),
            FieldClearProps::default(),
        );
        let custom = json!({ "tooltip": "Remove everything" });
        let props = element.with_custom(&custom);
        assert_eq!(props.custom["tooltip"], "Remove everything");
        assert_eq!(props.attributes.on_activate, Some(WidgetEvent::ClearAll));
        assert!(props.attributes.focused);
    }
}
