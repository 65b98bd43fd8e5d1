//! Shared data-exchange types for the tree-select engine.
//!
//! `TreeRecord` is the caller's shape: it goes in through the tree builder and
//! comes back out through every callback, with the current
//! `selected`/`expanded`/`disabled` state written into it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Delimiter between sibling indices in a node path (`"0.2.1"`).
pub const PATH_DELIMITER: char = '.';

/// Index of a node inside a [`crate::NodeTree`] arena.
///
/// Ids are only meaningful for the tree that produced them; a rebuild hands out
/// fresh ids. Paths are the stable identifier across rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Selection semantics of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// Hierarchical: selection propagates to descendants and ancestors.
    #[default]
    Tree,
    /// Hierarchical display, but every node is selected independently.
    TreeFlat,
    /// Flat multi-select over the root records.
    Multi,
    /// At most one selected node across the whole set.
    Single,
}

impl SelectionMode {
    /// True for the modes that flatten the whole tree into the working list.
    pub fn is_hierarchical(self) -> bool {
        matches!(self, SelectionMode::Tree | SelectionMode::TreeFlat)
    }

    /// True if select/unselect/disable cascade to relatives.
    pub fn propagates(self) -> bool {
        self == SelectionMode::Tree
    }

    pub fn label(self) -> &'static str {
        match self {
            SelectionMode::Tree => "Tree",
            SelectionMode::TreeFlat => "Tree (flat)",
            SelectionMode::Multi => "Multi",
            SelectionMode::Single => "Single",
        }
    }

    pub const ALL: [SelectionMode; 4] = [
        SelectionMode::Tree,
        SelectionMode::TreeFlat,
        SelectionMode::Multi,
        SelectionMode::Single,
    ];
}

/// Aggregate tri-state of the select-all control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectAllState {
    Selected,
    Partial,
    Unselected,
}

/// One caller-supplied record.
///
/// Malformed input is normalized rather than rejected: a missing or non-string
/// `label` becomes text (or `""`), non-array `children` become empty, and
/// non-boolean flags read as `false`. Unknown keys are kept in `extra` and
/// round-trip in their original order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TreeRecord {
    #[serde(default, deserialize_with = "lenient_label")]
    pub label: String,

    #[serde(default, deserialize_with = "lenient_children", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeRecord>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub selected: bool,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub expanded: bool,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub disabled: bool,

    /// Children are supplied later by the load-children hook.
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "std::ops::Not::not")]
    pub lazy: bool,

    /// Arbitrary passthrough keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TreeRecord {
    /// Creates a leaf record with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_children(mut self, children: Vec<TreeRecord>) -> Self {
        self.children = children;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Shallow copy without children; what a node retains as its source record.
    pub fn shallow(&self) -> Self {
        Self {
            label: self.label.clone(),
            children: Vec::new(),
            selected: self.selected,
            expanded: self.expanded,
            disabled: self.disabled,
            lazy: self.lazy,
            extra: self.extra.clone(),
        }
    }
}

/// Current selection plus a rebuilt copy of the full tree, handed to callbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreeSnapshot {
    pub selected: Vec<TreeRecord>,
    pub tree: Vec<TreeRecord>,
}

fn lenient_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(matches!(value, Value::Bool(true)))
}

fn lenient_children<'de, D>(deserializer: D) -> Result<Vec<TreeRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(records_from_value(value))
}

/// Normalizes an arbitrary JSON value into a record list.
///
/// Arrays yield one record per object element; anything else is empty.
pub fn records_from_value(value: Value) -> Vec<TreeRecord> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_label_defaults_to_empty() {
        let record: TreeRecord = serde_json::from_value(json!({ "selected": true })).unwrap();
        assert_eq!(record.label, "");
        assert!(record.selected);
        assert!(record.children.is_empty());
    }

    #[test]
    fn test_non_array_children_normalized() {
        let record: TreeRecord =
            serde_json::from_value(json!({ "label": "a", "children": "oops" })).unwrap();
        assert!(record.children.is_empty());

        let record: TreeRecord =
            serde_json::from_value(json!({ "label": "a", "children": [ { "label": "b" }, 3 ] })).unwrap();
        assert_eq!(record.children.len(), 1);
        assert_eq!(record.children[0].label, "b");
    }

    #[test]
    fn test_non_bool_flags_read_false() {
        let record: TreeRecord =
            serde_json::from_value(json!({ "label": 7, "selected": "yes", "disabled": 1 })).unwrap();
        assert_eq!(record.label, "7");
        assert!(!record.selected);
        assert!(!record.disabled);
    }

    #[test]
    fn test_passthrough_keys_preserved_in_order() {
        let record: TreeRecord =
            serde_json::from_value(json!({ "label": "a", "zeta": 1, "alpha": { "x": 2 } })).unwrap();
        let keys: Vec<_> = record.extra.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta".to_string(), "alpha".to_string()]);

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["zeta"], 1);
        assert_eq!(back["alpha"]["x"], 2);
    }

    #[test]
    fn test_records_from_non_array_is_empty() {
        assert!(records_from_value(json!({ "label": "a" })).is_empty());
        assert_eq!(records_from_value(json!([{ "label": "a" }, null])).len(), 1);
    }

    #[test]
    fn test_shallow_drops_children() {
        let record = TreeRecord::new("p").with_children(vec![TreeRecord::new("c")]);
        assert!(record.shallow().children.is_empty());
        assert_eq!(record.shallow().label, "p");
    }
}
