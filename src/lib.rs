//! Interactive menu for fetching, inspecting and exporting market prices.
//!
//! The navigation engine lives in [`menu`] and [`keys`]; [`app`] wires the
//! Yahoo Finance menu tree on top of the collaborators in [`market`] and
//! [`util`].

pub mod actions;
pub mod app;
pub mod cli;
pub mod defaults;
pub mod keys;
pub mod market;
pub mod menu;
pub mod ui;
pub mod util;
