//! # dispatch-core
//!
//! Core types, state machine, and error taxonomy for dispatch assignment.
//!
//! This crate provides the foundational types shared across all dispatch crates:
//! - Entity structs for dispatches, vehicles, and history entries
//! - Status enums with state machine transitions
//! - ID prefix constants
//! - The assignment error taxonomy and its wire mapping
//! - Request validation and the pure assignment decision
//! - History replay
//!
//! Nothing here performs I/O. Storage lives in `dispatch-db`.

pub mod assignment;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod history;
pub mod ids;
pub mod requests;
pub mod responses;
