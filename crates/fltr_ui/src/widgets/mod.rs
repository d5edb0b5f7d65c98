pub mod filter_rows;
pub mod hotkey;
pub mod hotkey_view;
pub mod pagination_bar;
pub mod picker;
pub mod status_line;
pub mod table;
pub mod text_input;
pub mod top_bar_view;

pub use filter_rows::{EditColumn, FilterRowsView};
pub use pagination_bar::PaginationBar;
pub use picker::{Picker, PickerOption};
pub use status_line::StatusLine;
pub use table::ResultsTable;
pub use text_input::TextInput;
pub use top_bar_view::TopBarView;
