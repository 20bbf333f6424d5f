//! Lakeops Core
//!
//! Core types and abstractions for the lakeops operator tool.
//!
//! This crate contains:
//! - Domain types: jobs, runs and catalog objects
//! - The selector model used to filter the job inventory
//!
//! Everything here is pure: no I/O, no async, no workspace API knowledge.

pub mod domain;
pub mod error;
pub mod selector;
