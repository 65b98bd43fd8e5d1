//! Keyboard focus state.
//!
//! This module tracks the single logical focus pointer and whether the
//! widget as a whole currently holds focus.

use crate::domain::focus::FocusTarget;

/// State related to keyboard focus.
///
/// Responsibilities:
/// - Tracking the focused target (field-side or dropdown-side, never both)
/// - Tracking widget-level focus for focus/blur notifications
#[derive(Debug, Clone, Default)]
pub struct FocusState {
    /// Currently focused target
    target: Option<FocusTarget>,
    /// Whether the widget holds focus at all
    has_focus: bool,
}

impl FocusState {
    pub fn new() -> Self {
        Self {
            target: None,
            has_focus: false,
        }
    }

    // ===== Queries =====

    pub fn target(&self) -> Option<&FocusTarget> {
        self.target.as_ref()
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// True if focus is on a field-side target.
    pub fn is_field(&self) -> bool {
        self.target.as_ref().is_some_and(FocusTarget::is_field)
    }

    /// True if focus is on a dropdown-side target.
    pub fn is_dropdown(&self) -> bool {
        self.target.as_ref().is_some_and(FocusTarget::is_dropdown)
    }

    // ===== Mutations =====

    /// Focuses `target`.
    ///
    /// # Returns
    /// `true` if the widget gained focus with this call.
    pub fn focus(&mut self, target: FocusTarget) -> bool {
        self.target = Some(target);
        let gained = !self.has_focus;
        self.has_focus = true;
        gained
    }

    /// Replaces the target without touching widget-level focus.
    pub fn retarget(&mut self, target: Option<FocusTarget>) {
        self.target = target;
    }

    /// Drops focus entirely.
    ///
    /// # Returns
    /// `true` if the widget had focus before this call.
    pub fn clear(&mut self) -> bool {
        self.target = None;
        let lost = self.has_focus;
        self.has_focus = false;
        lost
    }
}
