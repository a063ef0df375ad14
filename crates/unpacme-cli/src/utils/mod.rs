//! Small helpers shared by command handlers.

pub mod files;
