//! Interactive survival dashboard over a passenger table.
//!
//! The data path is `loader` → `PassengerDataset` → `filter` → `aggregate`,
//! driven per session by [`state::AppState`]. The `app` and `ui` modules draw
//! the result with egui; `report` prints it for headless use.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod report;
pub mod state;
pub mod ui;
