// src/readers/mod.rs

//! The engines that derive [`data`] from a log: raw positional access,
//! forward and backward entry readers, the pagination navigator, and the
//! incremental scanner.
//!
//! [`data`]: crate::data

pub mod backward;
pub mod entryreader;
pub mod navigator;
pub mod rawaccess;
pub mod scanner;
pub mod source;
pub mod textreader;
