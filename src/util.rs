// src/util.rs
pub mod list_files;

pub use list_files::{list_files, ListError};
