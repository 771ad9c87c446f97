// src/data/mod.rs

//! The data that is derived from a log: positions within it, parsed entries,
//! and correlated search events.

pub mod cursor;
pub mod entry;
pub mod event;
