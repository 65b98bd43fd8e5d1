//! Render models assembled by the controller.

use super::props::{
    ChipClearProps, ChipProps, ElementProps, ExpandToggleProps, FieldClearProps, FieldProps,
    FooterProps, InputProps, PlaceholderProps, RowProps, SelectAllProps,
};

/// One chip with its optional remove button.
#[derive(Debug, Clone, PartialEq)]
pub struct ChipModel {
    pub chip: ElementProps<ChipProps>,
    /// Absent for disabled nodes and a disabled widget.
    pub clear: Option<ElementProps<ChipClearProps>>,
}

/// Everything the field renders.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldModel {
    pub field: ElementProps<FieldProps>,
    pub chips: Vec<ChipModel>,
    /// Absent when search is off or the input lives in the dropdown.
    pub input: Option<ElementProps<InputProps>>,
    /// Present only while something is selected.
    pub clear: Option<ElementProps<FieldClearProps>>,
}

/// One dropdown row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowModel {
    Input(ElementProps<InputProps>),
    SelectAll(ElementProps<SelectAllProps>),
    Node {
        row: ElementProps<RowProps>,
        toggle: Option<ElementProps<ExpandToggleProps>>,
    },
    Placeholder(ElementProps<PlaceholderProps>),
    Footer(ElementProps<FooterProps>),
}

impl RowModel {
    pub fn key(&self) -> &str {
        match self {
            RowModel::Input(p) => &p.attributes.key,
            RowModel::SelectAll(p) => &p.attributes.key,
            RowModel::Node { row, .. } => &row.attributes.key,
            RowModel::Placeholder(p) => &p.attributes.key,
            RowModel::Footer(p) => &p.attributes.key,
        }
    }
}
