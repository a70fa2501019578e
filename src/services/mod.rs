//! External collaborators and derived-data services.

pub mod catalog;
pub mod context;
pub mod llm;
pub mod weather;
