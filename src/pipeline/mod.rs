//! Pipeline orchestration: session store, stage machine and the
//! operations the HTTP layer exposes.

pub mod analyzer;
pub mod orchestrator;
pub mod store;

pub use orchestrator::{Confirmation, Orchestrator, StageInfo};
pub use store::SessionStore;
