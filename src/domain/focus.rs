//! Keyboard focus targets and next/prev traversal.
//!
//! Focus is one logical pointer tagged by region (field or dropdown) and
//! element. The focusable lists are rebuilt on demand from current state;
//! traversal never crosses regions on its own.

use std::fmt;

/// Which half of the widget a target lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusRegion {
    Field,
    Dropdown,
}

/// A single focusable element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    FieldInput,
    FieldClear,
    FieldChip(String),
    DropdownSelectAll,
    DropdownRow(String),
    DropdownFooter,
}

const FIELD_PREFIX: &str = "field:";
const DROPDOWN_PREFIX: &str = "dropdown:";

impl FocusTarget {
    pub fn region(&self) -> FocusRegion {
        match self {
            FocusTarget::FieldInput | FocusTarget::FieldClear | FocusTarget::FieldChip(_) => {
                FocusRegion::Field
            }
            FocusTarget::DropdownSelectAll
            | FocusTarget::DropdownRow(_)
            | FocusTarget::DropdownFooter => FocusRegion::Dropdown,
        }
    }

    pub fn is_field(&self) -> bool {
        self.region() == FocusRegion::Field
    }

    pub fn is_dropdown(&self) -> bool {
        self.region() == FocusRegion::Dropdown
    }

    /// Node path carried by chip and row targets.
    pub fn path(&self) -> Option<&str> {
        match self {
            FocusTarget::FieldChip(path) | FocusTarget::DropdownRow(path) => Some(path),
            _ => None,
        }
    }

    /// String tag, e.g. `field:chip:0.1` or `dropdown:row:2`.
    pub fn tag(&self) -> String {
        match self {
            FocusTarget::FieldInput => format!("{FIELD_PREFIX}input"),
            FocusTarget::FieldClear => format!("{FIELD_PREFIX}clear"),
            FocusTarget::FieldChip(path) => format!("{FIELD_PREFIX}chip:{path}"),
            FocusTarget::DropdownSelectAll => format!("{DROPDOWN_PREFIX}select-all"),
            FocusTarget::DropdownRow(path) => format!("{DROPDOWN_PREFIX}row:{path}"),
            FocusTarget::DropdownFooter => format!("{DROPDOWN_PREFIX}footer"),
        }
    }

    /// Parses a tag produced by [`FocusTarget::tag`].
    pub fn parse(tag: &str) -> Option<Self> {
        if let Some(rest) = tag.strip_prefix(FIELD_PREFIX) {
            return match rest {
                "input" => Some(FocusTarget::FieldInput),
                "clear" => Some(FocusTarget::FieldClear),
                _ => rest
                    .strip_prefix("chip:")
                    .filter(|path| !path.is_empty())
                    .map(|path| FocusTarget::FieldChip(path.to_string())),
            };
        }
        if let Some(rest) = tag.strip_prefix(DROPDOWN_PREFIX) {
            return match rest {
                "select-all" => Some(FocusTarget::DropdownSelectAll),
                "footer" => Some(FocusTarget::DropdownFooter),
                _ => rest
                    .strip_prefix("row:")
                    .filter(|path| !path.is_empty())
                    .map(|path| FocusTarget::DropdownRow(path.to_string())),
            };
        }
        None
    }
}

impl fmt::Display for FocusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

/// Traversal direction within one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Field focusables: chips in display order, the input, then clear-all.
pub fn field_focusables<'a>(
    chip_paths: impl IntoIterator<Item = &'a str>,
    show_clear: bool,
) -> Vec<FocusTarget> {
    let mut out: Vec<FocusTarget> = chip_paths
        .into_iter()
        .map(|path| FocusTarget::FieldChip(path.to_string()))
        .collect();
    out.push(FocusTarget::FieldInput);
    if show_clear {
        out.push(FocusTarget::FieldClear);
    }
    out
}

/// Dropdown focusables: select-all, rows in display order, then the footer.
pub fn dropdown_focusables<'a>(
    show_select_all: bool,
    row_paths: impl IntoIterator<Item = &'a str>,
    show_footer: bool,
) -> Vec<FocusTarget> {
    let mut out = Vec::new();
    if show_select_all {
        out.push(FocusTarget::DropdownSelectAll);
    }
    out.extend(
        row_paths
            .into_iter()
            .map(|path| FocusTarget::DropdownRow(path.to_string())),
    );
    if show_footer {
        out.push(FocusTarget::DropdownFooter);
    }
    out
}

/// Moves one step through `targets`.
///
/// A `current` that is not in the list enters at the first (next) or last
/// (prev) target. At either end the step wraps when `wrap` is set and stays
/// put otherwise. An empty list yields `None`.
pub fn step(
    targets: &[FocusTarget],
    current: Option<&FocusTarget>,
    direction: Direction,
    wrap: bool,
) -> Option<FocusTarget> {
    if targets.is_empty() {
        return None;
    }
    let last = targets.len() - 1;
    let position = current.and_then(|c| targets.iter().position(|t| t == c));

    let index = match (position, direction) {
        (None, Direction::Next) => 0,
        (None, Direction::Prev) => last,
        (Some(i), Direction::Next) if i < last => i + 1,
        (Some(_), Direction::Next) => {
            if wrap {
                0
            } else {
                last
            }
        }
        (Some(i), Direction::Prev) if i > 0 => i - 1,
        (Some(_), Direction::Prev) => {
            if wrap {
                last
            } else {
                0
            }
        }
    };
    targets.get(index).cloned()
}
