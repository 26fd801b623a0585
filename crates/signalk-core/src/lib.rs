//! # signalk-core
//!
//! Core SignalK data model.
//!
//! This crate provides the delta message types (Delta, Update, PathValue,
//! Source) exchanged between plugins and the host.
//!
//! This crate is intentionally runtime-agnostic and contains no async code.

pub mod model;

pub use model::*;
