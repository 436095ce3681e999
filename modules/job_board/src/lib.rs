// === PUBLIC CONTRACT ===
pub mod contract;

pub use contract::model;

// === MODULE DEFINITION ===
pub mod module;
pub use module::JobBoard;

// === INTERNAL MODULES ===
// Exposed for the server binary and integration tests.
pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
