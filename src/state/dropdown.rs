//! Dropdown open/closed state.

use crate::config::OpenControl;

/// State of the dropdown.
///
/// Responsibilities:
/// - Tracking whether the dropdown is open
/// - Deciding who owns the flag (controller or caller)
#[derive(Debug, Clone, Default)]
pub struct DropdownState {
    open: bool,
    control: OpenControl,
}

impl DropdownState {
    pub fn new(control: OpenControl) -> Self {
        Self {
            open: false,
            control,
        }
    }

    // ===== Queries =====

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn control(&self) -> OpenControl {
        self.control
    }

    pub fn is_controlled(&self) -> bool {
        self.control == OpenControl::Controlled
    }

    // ===== Mutations =====

    pub fn set_control(&mut self, control: OpenControl) {
        self.control = control;
    }

    /// Requests the dropdown to open or close.
    ///
    /// Uncontrolled: the flag flips immediately. Controlled: the flag is left
    /// alone and the caller is expected to answer through [`Self::set_open`].
    ///
    /// # Returns
    /// `Some(open)` when the request differs from the current state and a
    /// toggle notification is due, `None` otherwise.
    pub fn request(&mut self, open: bool) -> Option<bool> {
        if self.open == open {
            return None;
        }
        if !self.is_controlled() {
            self.open = open;
        }
        Some(open)
    }

    /// Writes the flag directly. Returns true if it changed.
    pub fn set_open(&mut self, open: bool) -> bool {
        let changed = self.open != open;
        self.open = open;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncontrolled_flips_itself() {
        let mut dropdown = DropdownState::new(OpenControl::Uncontrolled);
        assert_eq!(dropdown.request(true), Some(true));
        assert!(dropdown.is_open());
        assert_eq!(dropdown.request(true), None);
    }

    #[test]
    fn test_controlled_waits_for_caller() {
        let mut dropdown = DropdownState::new(OpenControl::Controlled);
        assert_eq!(dropdown.request(true), Some(true));
        assert!(!dropdown.is_open());

        assert!(dropdown.set_open(true));
        assert!(dropdown.is_open());
        assert_eq!(dropdown.request(false), Some(false));
        assert!(dropdown.is_open());
    }
}
