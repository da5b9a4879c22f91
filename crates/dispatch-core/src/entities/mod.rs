//! Entity structs for the dispatch domain.
//!
//! Each entity maps to a table in the libSQL database (see
//! `dispatch-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema`; JSON field names are camelCase.

mod dispatch;
mod history;
mod vehicle;

pub use dispatch::Dispatch;
pub use history::DispatchHistoryEntry;
pub use vehicle::Vehicle;
