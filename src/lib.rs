//! `sales-report` library crate.
//!
//! The binary (`sales`) is a thin wrapper around this library so that the
//! validation and aggregation pipeline is testable without spawning processes.
//!
//! Data flow:
//!
//! raw rows -> [`io::ingest`] -> [`aggregate`] -> [`select`] -> [`report`] / [`plot`]

pub mod aggregate;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod select;
