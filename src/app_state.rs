use fltr_filters::RowId;
use fltr_ui::{Picker, TextInput};

/// Which half of the screen receives navigation keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Filters,
    Results,
}

impl Focus {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Filters => Self::Results,
            Self::Results => Self::Filters,
        }
    }
}

/// What an open picker chooses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Field(RowId),
    Condition(RowId),
    Value(RowId),
    PageSize,
}

/// A popup or inline editor capturing keys
#[derive(Debug, Default)]
pub enum Overlay {
    #[default]
    None,
    Picker(PickerKind, Picker),
    Editing(RowId, TextInput),
}

/// Gateway work queued by a key press, run on the next loop turn so the
/// busy marker is drawn first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Activate,
    Apply,
}
