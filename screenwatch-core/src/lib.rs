pub mod config;
pub mod format;
pub mod keymap;
pub mod model;
pub mod payload;
pub mod reducer;
pub mod state;

// Derived figures over a snapshot
pub mod aggregate;

// Load lifecycle and the current snapshot
pub mod source;
pub mod store;

// Drill-down overlays with history
pub mod navigation;
