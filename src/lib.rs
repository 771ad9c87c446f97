// src/lib.rs

//! Page through and search an append-only log using opaque, serializable
//! cursors ("marks"), without loading the log into memory.
//!
//! The engine is built from small layered parts, leaf-first:
//!
//! * [`LogCursor`] and [`LogRawAccess`] — positions within one log and
//!   arithmetic between them,
//! * [`LogEntryReader`] — forward entry traversal, with
//!   [`BackwardReader`]/[`FluentBackwardReader`] decorators for backward
//!   traversal over forward-only storage,
//! * [`BufferedConsumer`] — a fixed-capacity in-order sink,
//! * [`LogNavigator`] — forward/backward pages and random-access windows,
//! * [`Scanner`] — time-bounded incremental pattern search with a resumable
//!   progress token.
//!
//! [`LogCursor`]: crate::data::cursor::LogCursor
//! [`LogRawAccess`]: crate::readers::rawaccess::LogRawAccess
//! [`LogEntryReader`]: crate::readers::entryreader::LogEntryReader
//! [`BackwardReader`]: crate::readers::backward::BackwardReader
//! [`FluentBackwardReader`]: crate::readers::backward::FluentBackwardReader
//! [`BufferedConsumer`]: crate::readers::entryreader::BufferedConsumer
//! [`LogNavigator`]: crate::readers::navigator::LogNavigator
//! [`Scanner`]: crate::readers::scanner::Scanner

pub mod common;
pub mod data;
pub mod readers;
#[cfg(test)]
pub mod tests;
