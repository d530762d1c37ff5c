//! Expose coursedoc's command layer for use in integration tests. The
//! libraries (`coursedoc-commonmark`, `coursedoc-html`) are the supported API.
pub mod cli;
pub mod commands;
pub mod config;
