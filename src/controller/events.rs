//! Inbound events.
//!
//! Hosts translate their platform input into these values and feed them to
//! [`crate::TreeSelectController::dispatch`]. Paths identify nodes.

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Backspace,
    Escape,
    Tab { shift: bool },
}

/// A user interaction with the widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetEvent {
    /// Click on the field body (toggles the dropdown).
    FieldClick,
    KeyDown(Key),
    /// Pointer press outside the field and the dropdown.
    OutsideClick,
    /// The host lost platform focus.
    Blur,
    RowClick(String),
    ChipClick(String),
    ChipClear(String),
    ClearAll,
    SelectAllClick,
    ExpandClick(String),
    SearchInput(String),
    FooterClick,
}

impl WidgetEvent {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            WidgetEvent::FieldClick => "field-click",
            WidgetEvent::KeyDown(_) => "key-down",
            WidgetEvent::OutsideClick => "outside-click",
            WidgetEvent::Blur => "blur",
            WidgetEvent::RowClick(_) => "row-click",
            WidgetEvent::ChipClick(_) => "chip-click",
            WidgetEvent::ChipClear(_) => "chip-clear",
            WidgetEvent::ClearAll => "clear-all",
            WidgetEvent::SelectAllClick => "select-all-click",
            WidgetEvent::ExpandClick(_) => "expand-click",
            WidgetEvent::SearchInput(_) => "search-input",
            WidgetEvent::FooterClick => "footer-click",
        }
    }
}

/// Result of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// The controller consumed the event; the host should suppress the
    /// platform default (focus traversal on Tab, caret moves on arrows).
    pub handled: bool,
}

impl DispatchOutcome {
    pub const HANDLED: Self = Self { handled: true };
    pub const IGNORED: Self = Self { handled: false };
}
