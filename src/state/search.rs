//! Search input state.

/// The current search value.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    value: String,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// A non-empty value puts the tree in search mode.
    pub fn is_active(&self) -> bool {
        !self.value.is_empty()
    }

    /// Returns true if the value changed.
    pub fn set(&mut self, value: &str) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value.to_string();
        true
    }

    /// Returns true if there was anything to clear.
    pub fn clear(&mut self) -> bool {
        let had = self.is_active();
        self.value.clear();
        had
    }
}
