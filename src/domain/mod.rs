//! Domain types and DTOs
//!
//! These types define the data structures for the outfit-planning
//! pipeline: sessions, event descriptors, weather context, the
//! per-session context file, outfit plans, and the clothing catalog.

pub mod catalog;
pub mod context;
pub mod event;
pub mod outfit;
pub mod session;
pub mod weather;

// Re-export commonly used types
pub use catalog::*;
pub use context::*;
pub use event::*;
pub use outfit::*;
pub use session::*;
pub use weather::*;
