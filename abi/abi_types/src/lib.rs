//! ABI Type Definitions
//!
//! This crate contains the core data model for MultiversX contract ABIs.
//! It provides pure data structures for ABI documents, the textual type
//! expression grammar, the resolved type model and decode strategy selection,
//! without any file I/O or code generation logic.

pub mod document;
pub mod expr;
pub mod strategy;
pub mod types;

// Re-export commonly used types at the crate root
pub use document::*;
pub use expr::*;
pub use strategy::*;
pub use types::*;
