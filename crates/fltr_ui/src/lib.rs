pub mod handlers;
pub mod widgets;

pub use handlers::{
    EditorAction, PickerAction, TableNavigationHandler, handle_picker_input,
    handle_value_input,
};
pub use widgets::*;
