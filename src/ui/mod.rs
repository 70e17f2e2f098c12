//! egui presentation layer. Reads [`crate::state::AppState`] and its derived
//! views; all mutation goes through `AppState` methods.

pub mod panels;
pub mod plot;
pub mod table;
