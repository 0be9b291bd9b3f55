// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod archetypes;
pub mod config;
pub mod engine;
pub mod io;
pub mod pipeline;
pub mod table;
