//! Repository modules for dispatch entities.
//!
//! Each module adds methods to `DispatchDb` via `impl DispatchDb` blocks, and
//! exposes connection-level fetch helpers the store reuses inside its
//! transactions.

pub mod dispatch;
pub mod history;
pub mod vehicle;
