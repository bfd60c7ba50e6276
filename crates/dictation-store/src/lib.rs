//! File-backed persistence for dictation practice.
//!
//! Implements the repository ports from `dictation-core` on top of small
//! JSON files under the data root, plus the session-based [`FileSessionAuth`]
//! gate. Adapters should go through [`StoreFactory::open`] rather than
//! constructing repositories one by one.

pub mod factory;
pub mod repositories;
pub mod session;

pub use factory::{StoreFactory, Stores};
pub use repositories::{JsonSettingsRepository, JsonWordListRepository};
pub use session::{FileSessionAuth, Session};
