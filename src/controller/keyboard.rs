//! Keyboard handling.
//!
//! Focus lives either on the field side (chips, input, clear-all) or on the
//! dropdown side (select-all, rows, footer). Left/Right walk the field;
//! Up/Down walk the dropdown and also cross from the field into it.

use super::{DispatchOutcome, Key, TreeSelectController};
use crate::domain::focus::{step, Direction, FocusRegion, FocusTarget};

impl TreeSelectController {
    pub(super) fn handle_key(&mut self, key: Key) -> DispatchOutcome {
        let target = match self.focus.target() {
            Some(target) => target.clone(),
            None => {
                self.focus_target(FocusTarget::FieldInput);
                FocusTarget::FieldInput
            }
        };

        match target.region() {
            FocusRegion::Field => self.field_key(key, target),
            FocusRegion::Dropdown => self.dropdown_key(key, target),
        }
    }

    fn field_key(&mut self, key: Key, target: FocusTarget) -> DispatchOutcome {
        match key {
            Key::ArrowLeft | Key::ArrowRight => {
                // The caret owns the arrows while there is text to move through.
                if target == FocusTarget::FieldInput && self.search.is_active() {
                    return DispatchOutcome::IGNORED;
                }
                let (direction, wrap) = if key == Key::ArrowLeft {
                    (Direction::Prev, self.config.keyboard.field.loop_left)
                } else {
                    (Direction::Next, self.config.keyboard.field.loop_right)
                };
                let targets = self.field_targets();
                if let Some(next) = step(&targets, Some(&target), direction, wrap) {
                    self.focus_target(next);
                }
                DispatchOutcome::HANDLED
            }
            Key::ArrowUp | Key::ArrowDown => {
                if !self.dropdown.is_open() {
                    self.request_open(true);
                }
                if self.dropdown.is_open() {
                    let targets = self.dropdown_targets();
                    let entry = if key == Key::ArrowDown {
                        targets.first()
                    } else {
                        targets.last()
                    };
                    if let Some(entry) = entry.cloned() {
                        self.focus_dropdown_target(entry);
                    }
                }
                self.rederive();
                DispatchOutcome::HANDLED
            }
            Key::Enter => match target {
                FocusTarget::FieldChip(path) => self.on_chip_click(path),
                FocusTarget::FieldClear => self.on_clear_all(),
                _ => {
                    if !self.dropdown.is_open() {
                        self.request_open(true);
                        self.rederive();
                    }
                    DispatchOutcome::HANDLED
                }
            },
            Key::Backspace => match target {
                FocusTarget::FieldChip(path) => self.remove_focused_chip(&path),
                FocusTarget::FieldClear => self.on_clear_all(),
                _ => DispatchOutcome::IGNORED,
            },
            Key::Escape => self.close_from_key(),
            Key::Tab { shift } => match (shift, &target) {
                (false, FocusTarget::FieldInput) if self.show_clear_all() => {
                    self.focus_target(FocusTarget::FieldClear);
                    DispatchOutcome::HANDLED
                }
                (true, FocusTarget::FieldClear) => {
                    self.focus_target(FocusTarget::FieldInput);
                    DispatchOutcome::HANDLED
                }
                _ => self.leave_on_tab(),
            },
        }
    }

    fn dropdown_key(&mut self, key: Key, target: FocusTarget) -> DispatchOutcome {
        match key {
            Key::ArrowLeft | Key::ArrowRight => {
                let FocusTarget::DropdownRow(path) = &target else {
                    return DispatchOutcome::IGNORED;
                };
                if let Some(id) = self.tree.id_of(path) {
                    self.set_expanded(id, key == Key::ArrowRight);
                }
                DispatchOutcome::HANDLED
            }
            Key::ArrowUp | Key::ArrowDown => {
                let (direction, wrap) = if key == Key::ArrowUp {
                    (Direction::Prev, self.config.keyboard.dropdown.loop_up)
                } else {
                    (Direction::Next, self.config.keyboard.dropdown.loop_down)
                };
                let targets = self.dropdown_targets();
                if let Some(next) = step(&targets, Some(&target), direction, wrap) {
                    self.focus_dropdown_target(next);
                }
                DispatchOutcome::HANDLED
            }
            Key::Enter => match target {
                FocusTarget::DropdownRow(path) => self.on_row_click(path),
                FocusTarget::DropdownSelectAll => self.on_select_all(),
                FocusTarget::DropdownFooter => self.on_footer_click(),
                _ => DispatchOutcome::IGNORED,
            },
            Key::Backspace => DispatchOutcome::IGNORED,
            Key::Escape => self.close_from_key(),
            Key::Tab { .. } => self.leave_on_tab(),
        }
    }

    /// Escape closes an open dropdown and parks focus on the input.
    fn close_from_key(&mut self) -> DispatchOutcome {
        if !self.dropdown.is_open() {
            return DispatchOutcome::IGNORED;
        }
        self.request_open(false);
        self.focus_target(FocusTarget::FieldInput);
        self.rederive();
        DispatchOutcome::HANDLED
    }

    /// Tab out of the widget: reset like an outside click and let the host
    /// move platform focus.
    fn leave_on_tab(&mut self) -> DispatchOutcome {
        self.reset();
        DispatchOutcome::IGNORED
    }

    /// Removes the chip under focus and moves focus to the chip before it,
    /// or to the input when none is left.
    fn remove_focused_chip(&mut self, path: &str) -> DispatchOutcome {
        let chips = self.chip_paths();
        let previous = chips
            .iter()
            .position(|&chip| chip == path)
            .and_then(|i| i.checked_sub(1))
            .map(|i| chips[i].to_string());

        if !self.unselect_path(path) {
            return DispatchOutcome::IGNORED;
        }

        let next = previous
            .map(FocusTarget::FieldChip)
            .filter(|t| self.field_targets().contains(t))
            .unwrap_or(FocusTarget::FieldInput);
        self.focus_target(next);
        DispatchOutcome::HANDLED
    }
}
