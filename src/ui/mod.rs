pub mod console;
pub mod style;
