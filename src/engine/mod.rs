// Core engines: pure, in-memory table transforms.
//
// Nothing in this module performs I/O or reads global state. Each operation
// takes immutable inputs and returns a new Table, so independent pipeline
// runs can share nothing and never interfere.

pub mod classify;
pub mod combine;
pub mod join;
