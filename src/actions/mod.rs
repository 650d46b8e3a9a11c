pub mod file_picker;
pub mod generate;
pub mod query;
pub mod visualize;

// Re-exports so the menu wiring can use crate::actions::XYZ
pub use file_picker::{file_menu, pick_file, PickFile};
pub use generate::SaveReturnsTsv;
pub use query::{QueryFromFile, QueryManual};
pub use visualize::ShowColumns;
